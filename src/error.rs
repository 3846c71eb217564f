//! Configuration errors
//!
//! Gameplay itself never fails: wins, losses and timeouts are ordinary state
//! transitions. The only fallible surface is loading and validating tuning.

use core::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum TuningError {
    /// Tuning JSON could not be parsed
    Parse(String),
    /// Tuning file could not be read
    Io(String),
    /// Board or entity dimensions are not strictly positive
    InvalidBoard { field: &'static str, value: f32 },
    /// A percentage placement lies outside [0, 100]
    PercentOutOfRange { field: &'static str, value: f32 },
    /// A timer cadence or count is zero
    ZeroCadence { field: &'static str },
    /// Round time budget is zero
    ZeroRoundTime,
    /// A probability lies outside [0, 1]
    ProbabilityOutOfRange { field: &'static str, value: f64 },
    /// A speed is zero, negative or not finite
    NonPositiveSpeed { field: &'static str, value: f32 },
    /// Controls strip and guard buffer leave no legal obstacle slot
    NoObstacleSpace,
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid tuning JSON: {msg}"),
            Self::Io(msg) => write!(f, "could not read tuning: {msg}"),
            Self::InvalidBoard { field, value } => {
                write!(f, "board dimension `{field}` must be positive, got {value}")
            }
            Self::PercentOutOfRange { field, value } => {
                write!(f, "`{field}` must lie in [0, 100] percent, got {value}")
            }
            Self::ZeroCadence { field } => write!(f, "`{field}` must be non-zero"),
            Self::ZeroRoundTime => write!(f, "round time budget must be non-zero"),
            Self::ProbabilityOutOfRange { field, value } => {
                write!(f, "`{field}` must lie in [0, 1], got {value}")
            }
            Self::NonPositiveSpeed { field, value } => {
                write!(f, "`{field}` must be a positive speed, got {value}")
            }
            Self::NoObstacleSpace => {
                write!(f, "no obstacle placement avoids the controls strip and guard buffer")
            }
        }
    }
}

impl std::error::Error for TuningError {}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_field() {
        let err = TuningError::ZeroCadence {
            field: "light_interval_ms",
        };
        assert_eq!(err.to_string(), "`light_interval_ms` must be non-zero");

        let err = TuningError::ProbabilityOutOfRange {
            field: "sneak_move_chance",
            value: 1.5,
        };
        assert!(err.to_string().contains("sneak_move_chance"));
    }

    #[test]
    fn test_from_serde_error() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let err: TuningError = parse.unwrap_err().into();
        assert!(matches!(err, TuningError::Parse(_)));
    }
}
