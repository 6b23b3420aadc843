//! Microstrip Characteristic Impedance
//!
//! IPC-2141 closed-form approximation for a surface trace over a ground plane:
//!
//! Z0 = 87 / √(εr + 1.41) × ln(5.98·h / (0.8·w + t))
//!
//! Where w is the trace width, h the dielectric height and t the copper
//! thickness, all in the same length unit.
//!
//! The approximation is only accurate for 0.1 < w/h < 2.0 and 1 < εr < 15;
//! outside that window the value is still reported but flagged.

use serde::{Deserialize, Serialize};

use super::{finite_result, positive, CalcResult};
use crate::format::{format_fixed, Reading};

pub const IPC2141_NUMERATOR: f64 = 87.0;
pub const IPC2141_ER_OFFSET: f64 = 1.41;
pub const IPC2141_HEIGHT_FACTOR: f64 = 5.98;
pub const IPC2141_WIDTH_FACTOR: f64 = 0.8;

/// Common FR-4 relative permittivity.
pub const FR4_ER: f64 = 4.4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MicrostripInput {
    pub width_mm: f64,
    pub height_mm: f64,
    pub thickness_mm: f64,
    pub er: f64,
}

impl Default for MicrostripInput {
    fn default() -> Self {
        Self {
            width_mm: 0.15,
            height_mm: 0.1,
            thickness_mm: 0.035, // 1 oz copper
            er: FR4_ER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MicrostripResult {
    pub z0_ohms: f64,
    pub width_to_height: f64,
    /// Inputs fall inside the range the approximation is fitted for.
    pub within_model_range: bool,
}

impl MicrostripInput {
    pub fn calculate(&self) -> CalcResult<MicrostripResult> {
        let w = positive("width", self.width_mm)?;
        let h = positive("height", self.height_mm)?;
        let t = positive("thickness", self.thickness_mm)?;
        let er = positive("εr", self.er)?;

        let z0 = IPC2141_NUMERATOR / (er + IPC2141_ER_OFFSET).sqrt()
            * (IPC2141_HEIGHT_FACTOR * h / (IPC2141_WIDTH_FACTOR * w + t)).ln();
        let z0_ohms = finite_result("Z0", z0)?;

        let width_to_height = w / h;
        let within_model_range =
            width_to_height > 0.1 && width_to_height < 2.0 && er > 1.0 && er < 15.0;

        Ok(MicrostripResult {
            z0_ohms,
            width_to_height,
            within_model_range,
        })
    }
}

impl MicrostripResult {
    pub fn readings(&self) -> Vec<Reading> {
        let mut readings = vec![
            Reading::new("Z0", format_fixed(self.z0_ohms, 1, "Ω")),
            Reading::new("w/h", format_fixed(self.width_to_height, 2, "")),
        ];
        if !self.within_model_range {
            readings.push(Reading::new("Note", "outside IPC-2141 fit range"));
        }
        readings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fr4_trace() {
        let r = MicrostripInput::default().calculate().unwrap();
        let expected = 87.0 / (4.4f64 + 1.41).sqrt() * (5.98f64 * 0.1 / (0.8 * 0.15 + 0.035)).ln();
        assert!((r.z0_ohms - expected).abs() < 1e-9);
        assert!(r.z0_ohms > 30.0 && r.z0_ohms < 50.0, "Z0: {}", r.z0_ohms);
        assert!(r.within_model_range);
    }

    #[test]
    fn test_wider_trace_lowers_impedance() {
        let narrow = MicrostripInput { width_mm: 0.15, ..Default::default() }
            .calculate()
            .unwrap();
        let wide = MicrostripInput { width_mm: 0.19, ..Default::default() }
            .calculate()
            .unwrap();
        assert!(wide.z0_ohms < narrow.z0_ohms);
    }

    #[test]
    fn test_non_physical_geometry_rejected() {
        // Log argument below one gives a negative impedance
        let r = MicrostripInput { width_mm: 2.0, height_mm: 0.1, ..Default::default() }.calculate();
        assert!(r.is_err());
        let r = MicrostripInput { height_mm: 0.0, ..Default::default() }.calculate();
        assert!(r.is_err());
    }

    #[test]
    fn test_out_of_range_flag() {
        let r = MicrostripInput { width_mm: 0.005, height_mm: 0.1, ..Default::default() }
            .calculate()
            .unwrap();
        assert!(!r.within_model_range);
    }
}
