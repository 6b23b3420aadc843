//! Resistive voltage divider design.
//!
//! Given the supply, the wanted output and the top resistor R1, the ideal
//! bottom resistor is `R2 = Vout·R1 / (Vin − Vout)`. The ideal value is then
//! snapped to E24 and the real output voltage recomputed from the snapped part.

use serde::{Deserialize, Serialize};

use super::{positive, CalcError, CalcResult};
use crate::eseries::snap_e24;
use crate::format::{format_fixed, format_resistance, format_si, Reading};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividerInput {
    /// Supply voltage in V.
    pub vin: f64,
    /// Target output voltage in V.
    pub vout: f64,
    /// Top resistor in Ω.
    pub r1: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividerResult {
    pub r2_ideal: f64,
    pub r2_e24: f64,
    /// Output voltage with the E24 part fitted.
    pub vout_real: f64,
    /// `|vout_real − vout| / vout` in percent.
    pub error_percent: f64,
    /// Power dissipated in R1 in W.
    pub r1_power_w: f64,
}

/// Output of an unloaded divider.
pub fn output_voltage(vin: f64, r1: f64, r2: f64) -> f64 {
    vin * r2 / (r1 + r2)
}

impl DividerInput {
    pub fn calculate(&self) -> CalcResult<DividerResult> {
        let vin = positive("Vin", self.vin)?;
        let vout = positive("Vout", self.vout)?;
        let r1 = positive("R1", self.r1)?;
        if vout >= vin {
            return Err(CalcError::OutOfRange {
                field: "Vout",
                reason: format!("target {} V must be below the {} V supply", vout, vin),
            });
        }

        let r2_ideal = vout * r1 / (vin - vout);
        let r2_e24 = snap_e24(r2_ideal)
            .ok_or_else(|| CalcError::Degenerate("ideal R2 cannot be snapped".to_string()))?;
        let vout_real = output_voltage(vin, r1, r2_e24);
        let error_percent = (vout_real - vout).abs() / vout * 100.0;
        let r1_power_w = (vin - vout_real).powi(2) / r1;

        Ok(DividerResult {
            r2_ideal,
            r2_e24,
            vout_real,
            error_percent,
            r1_power_w,
        })
    }
}

impl DividerResult {
    pub fn readings(&self) -> Vec<Reading> {
        vec![
            Reading::new("R2 (ideal)", format_resistance(self.r2_ideal)),
            Reading::new("R2 (E24)", format_resistance(self.r2_e24)),
            Reading::new("Vout (E24)", format_fixed(self.vout_real, 3, "V")),
            Reading::new("Error", format_fixed(self.error_percent, 2, "%")),
            Reading::new("R1 power", format_si(self.r1_power_w, "W")),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twelve_to_five_volts() {
        let result = DividerInput { vin: 12.0, vout: 5.0, r1: 10_000.0 }
            .calculate()
            .unwrap();
        assert!((result.r2_ideal - 7142.857).abs() < 0.01);
        assert!((result.r2_e24 - 6800.0).abs() < 1e-6);
        let expected = 12.0 * 6800.0 / 16_800.0;
        assert!((result.vout_real - expected).abs() < 1e-9);
        assert!((result.error_percent - (5.0 - expected) / 5.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_voltages_rejected() {
        let err = DividerInput { vin: 5.0, vout: 5.0, r1: 1000.0 }.calculate();
        assert!(matches!(err, Err(CalcError::OutOfRange { field: "Vout", .. })));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(DividerInput { vin: 12.0, vout: 0.0, r1: 1000.0 }.calculate().is_err());
        assert!(DividerInput { vin: 12.0, vout: 5.0, r1: 0.0 }.calculate().is_err());
        assert!(DividerInput { vin: f64::NAN, vout: 5.0, r1: 1.0 }.calculate().is_err());
        assert!(DividerInput { vin: 3.3, vout: 5.0, r1: 1000.0 }.calculate().is_err());
    }

    #[test]
    fn test_readings_are_formatted() {
        let result = DividerInput { vin: 12.0, vout: 5.0, r1: 10_000.0 }
            .calculate()
            .unwrap();
        let readings = result.readings();
        assert_eq!(readings[1].value, "6.8 kΩ");
        assert!(readings.iter().all(|r| !r.value.contains("NaN")));
    }
}
