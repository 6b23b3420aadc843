//! Closed-form circuit calculators.
//!
//! Each calculator is a pure function of a typed input record. Inputs are
//! validated up front; anything that would produce NaN, infinity or a
//! physically meaningless result is reported as a [`CalcError`] which the
//! display layer renders as the sentinel.

pub mod adc;
pub mod divider;
pub mod filter;
pub mod i2c;
pub mod led;
pub mod microstrip;
pub mod power;

pub use adc::{AdcInput, AdcMetrics, AdcReading, DacInput, DacReading};
pub use divider::{DividerInput, DividerResult};
pub use filter::{FrequencyUnit, LcInput, RcInput, WaveInput, WaveResult};
pub use i2c::{I2cBusMode, I2cPullupInput, I2cPullupRange};
pub use led::{LedInput, LedResult};
pub use microstrip::{MicrostripInput, MicrostripResult};
pub use power::{PowerBudget, PowerModule, PowerSummary, RailCurrent};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
    #[error("{field} must not be negative")]
    Negative { field: &'static str },
    #[error("{field} is out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },
    #[error("no valid result: {0}")]
    Degenerate(String),
}

pub type CalcResult<T> = Result<T, CalcError>;

pub(crate) fn finite(field: &'static str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NotFinite { field })
    }
}

pub(crate) fn positive(field: &'static str, value: f64) -> CalcResult<f64> {
    let value = finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(CalcError::NotPositive { field })
    }
}

pub(crate) fn non_negative(field: &'static str, value: f64) -> CalcResult<f64> {
    let value = finite(field, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(CalcError::Negative { field })
    }
}

/// Reject a computed value that is not a finite positive number.
pub(crate) fn finite_result(what: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CalcError::Degenerate(format!("{} is not a positive finite value", what)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validators() {
        assert_eq!(positive("r", 1.0), Ok(1.0));
        assert_eq!(positive("r", 0.0), Err(CalcError::NotPositive { field: "r" }));
        assert_eq!(positive("r", f64::NAN), Err(CalcError::NotFinite { field: "r" }));
        assert_eq!(non_negative("v", 0.0), Ok(0.0));
        assert_eq!(non_negative("v", -0.1), Err(CalcError::Negative { field: "v" }));
        assert!(finite_result("z0", f64::INFINITY).is_err());
        assert!(finite_result("z0", -3.0).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = CalcError::NotPositive { field: "R1" };
        assert_eq!(err.to_string(), "R1 must be greater than zero");
    }
}
