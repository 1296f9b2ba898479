use std::path::PathBuf;

/// An input outside its documented range. Raised once, when parameters are
/// constructed; the numeric core never sees an invalid value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("{field} must be a probability in [0, 1], got {value}")]
    NotAProbability { field: &'static str, value: f64 },

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be strictly positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be at least {min}, got {value}")]
    BelowMinimum { field: &'static str, min: u64, value: u64 },

    #[error("{field} must be at most {max}, got {value}")]
    AboveMaximum { field: &'static str, max: u64, value: u64 },

    #[error("{field} {reason}")]
    Inconsistent { field: &'static str, reason: &'static str },

    #[error("invalid loss-ratio distribution: {0}")]
    LossDistribution(String),
}

/// Failure to load an assumptions override file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read assumptions file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed assumptions file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("assumptions file {} is out of range: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ParameterError,
    },
}

pub(crate) fn check_probability(field: &'static str, value: f64) -> Result<f64, ParameterError> {
    if !value.is_finite() {
        return Err(ParameterError::NotFinite { field, value });
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(ParameterError::NotAProbability { field, value });
    }
    Ok(value)
}

pub(crate) fn check_finite(field: &'static str, value: f64) -> Result<f64, ParameterError> {
    if value.is_finite() { Ok(value) } else { Err(ParameterError::NotFinite { field, value }) }
}

pub(crate) fn check_positive(field: &'static str, value: f64) -> Result<f64, ParameterError> {
    let value = check_finite(field, value)?;
    if value > 0.0 { Ok(value) } else { Err(ParameterError::NotPositive { field, value }) }
}

pub(crate) fn check_at_least(field: &'static str, min: u64, value: u64) -> Result<u64, ParameterError> {
    if value >= min { Ok(value) } else { Err(ParameterError::BelowMinimum { field, min, value }) }
}

/// `min <= value <= max`.
pub(crate) fn check_between(field: &'static str, min: u64, max: u64, value: u64) -> Result<u64, ParameterError> {
    let value = check_at_least(field, min, value)?;
    if value <= max { Ok(value) } else { Err(ParameterError::AboveMaximum { field, max, value }) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_bounds_are_inclusive() {
        assert_eq!(check_probability("p", 0.0), Ok(0.0));
        assert_eq!(check_probability("p", 1.0), Ok(1.0));
        assert!(matches!(
            check_probability("p", -0.01),
            Err(ParameterError::NotAProbability { field: "p", .. })
        ));
        assert!(matches!(check_probability("p", f64::NAN), Err(ParameterError::NotFinite { .. })));
    }

    #[test]
    fn positive_rejects_zero_and_infinity() {
        assert!(check_positive("severity", 0.0).is_err());
        assert!(matches!(
            check_positive("severity", f64::INFINITY),
            Err(ParameterError::NotFinite { .. })
        ));
        assert_eq!(check_positive("severity", 1e-9), Ok(1e-9));
    }

    #[test]
    fn between_is_inclusive_at_both_ends() {
        assert_eq!(check_between("num_years", 1, 100, 1), Ok(1));
        assert_eq!(check_between("num_years", 1, 100, 100), Ok(100));
        assert!(matches!(check_between("num_years", 1, 100, 0), Err(ParameterError::BelowMinimum { .. })));
        assert_eq!(
            check_between("num_years", 1, 100, 101),
            Err(ParameterError::AboveMaximum { field: "num_years", max: 100, value: 101 })
        );
    }

    #[test]
    fn error_message_names_the_field() {
        let err = check_at_least("num_years", 1, 0).unwrap_err();
        assert_eq!(err.to_string(), "num_years must be at least 1, got 0");
    }
}
