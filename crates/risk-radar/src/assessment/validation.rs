use crate::config::Signal;
use crate::scoring::{SCORE_MAX, SCORE_MIN};

use super::domain::RiskInput;

/// Client-side faults detected before the engines run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("malformed request: {0}")]
    Malformed(String),
    #[error("{field} must be a number between 0 and 100 (found {value})")]
    OutOfRange { field: Signal, value: f64 },
}

impl RiskInput {
    /// Rejects signals that are not finite or fall outside `[0, 100]`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let signals = [
            (Signal::Severity, self.severity),
            (Signal::Confidence, self.confidence),
            (Signal::Frequency, self.frequency),
        ];

        for (field, value) in signals {
            if !value.is_finite() || !(SCORE_MIN..=SCORE_MAX).contains(&value) {
                return Err(ValidationError::OutOfRange { field, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_inclusive_bounds() {
        assert!(RiskInput::new(0.0, 100.0, 50.5).validate().is_ok());
    }

    #[test]
    fn rejects_first_out_of_range_signal() {
        let err = RiskInput::new(50.0, 150.0, -1.0)
            .validate()
            .expect_err("confidence out of range");
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: Signal::Confidence,
                value: 150.0
            }
        );
        assert_eq!(
            err.to_string(),
            "confidence must be a number between 0 and 100 (found 150)"
        );
    }

    #[test]
    fn rejects_negative_and_non_finite_signals() {
        assert!(matches!(
            RiskInput::new(-10.0, 50.0, 50.0).validate(),
            Err(ValidationError::OutOfRange {
                field: Signal::Severity,
                ..
            })
        ));
        assert!(RiskInput::new(50.0, 50.0, f64::NAN).validate().is_err());
        assert!(RiskInput::new(f64::INFINITY, 50.0, 50.0)
            .validate()
            .is_err());
    }
}
