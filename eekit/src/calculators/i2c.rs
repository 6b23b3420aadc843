//! I²C pull-up resistor range.
//!
//! The lower bound comes from the 3 mA sink current at V_OL = 0.4 V, the upper
//! bound from the rise-time limit of the bus mode: the 30 % → 70 % rise of an
//! RC edge takes `0.8473·R·C`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{positive, CalcError, CalcResult};
use crate::core::ToolboxError;
use crate::format::{format_resistance, Reading};

/// Maximum low-level output voltage in V.
pub const V_OL_MAX: f64 = 0.4;
/// Sink current at V_OL in A.
pub const I_OL: f64 = 0.003;
const RISE_FACTOR: f64 = 0.8473;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum I2cBusMode {
    /// 100 kHz
    #[default]
    Standard,
    /// 400 kHz
    Fast,
    /// 1 MHz
    FastPlus,
}

impl I2cBusMode {
    /// Maximum rise time in s.
    pub fn rise_time_s(&self) -> f64 {
        match self {
            I2cBusMode::Standard => 1000e-9,
            I2cBusMode::Fast => 300e-9,
            I2cBusMode::FastPlus => 120e-9,
        }
    }
}

impl fmt::Display for I2cBusMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            I2cBusMode::Standard => write!(f, "standard"),
            I2cBusMode::Fast => write!(f, "fast"),
            I2cBusMode::FastPlus => write!(f, "fast-plus"),
        }
    }
}

impl FromStr for I2cBusMode {
    type Err = ToolboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "sm" | "100k" => Ok(I2cBusMode::Standard),
            "fast" | "fm" | "400k" => Ok(I2cBusMode::Fast),
            "fast-plus" | "fastplus" | "fm+" | "1m" => Ok(I2cBusMode::FastPlus),
            _ => Err(ToolboxError::UnknownUnitOrDimension(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct I2cPullupInput {
    pub vdd: f64,
    pub bus_capacitance_pf: f64,
    pub mode: I2cBusMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct I2cPullupRange {
    pub rp_min: f64,
    pub rp_max: f64,
}

impl I2cPullupInput {
    pub fn calculate(&self) -> CalcResult<I2cPullupRange> {
        let vdd = positive("Vdd", self.vdd)?;
        let cb = positive("Cb", self.bus_capacitance_pf)? * 1e-12;
        if vdd <= V_OL_MAX {
            return Err(CalcError::OutOfRange {
                field: "Vdd",
                reason: format!("{} V is not above V_OL {} V", vdd, V_OL_MAX),
            });
        }

        let rp_min = (vdd - V_OL_MAX) / I_OL;
        let rp_max = self.mode.rise_time_s() / (RISE_FACTOR * cb);
        if rp_min >= rp_max {
            return Err(CalcError::Degenerate(format!(
                "bus capacitance {} pF is too high for {} mode",
                self.bus_capacitance_pf, self.mode
            )));
        }
        Ok(I2cPullupRange { rp_min, rp_max })
    }
}

impl I2cPullupRange {
    pub fn readings(&self) -> Vec<Reading> {
        vec![
            Reading::new("Rp min", format_resistance(self.rp_min)),
            Reading::new("Rp max", format_resistance(self.rp_max)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_mode_range() {
        let r = I2cPullupInput { vdd: 3.3, bus_capacitance_pf: 200.0, mode: I2cBusMode::Standard }
            .calculate()
            .unwrap();
        assert!((r.rp_min - 966.666).abs() < 0.01);
        assert!((r.rp_max - 1e-6 / (0.8473 * 200e-12)).abs() < 1e-6);
        assert!(r.rp_min < r.rp_max);
    }

    #[test]
    fn test_faster_modes_narrow_the_range() {
        let at = |mode| {
            I2cPullupInput { vdd: 3.3, bus_capacitance_pf: 100.0, mode }
                .calculate()
                .unwrap()
                .rp_max
        };
        assert!(at(I2cBusMode::Fast) < at(I2cBusMode::Standard));
        assert!(at(I2cBusMode::FastPlus) < at(I2cBusMode::Fast));
    }

    #[test]
    fn test_overloaded_bus_rejected() {
        // 5 V at fast-plus with 400 pF leaves no valid resistor
        let r = I2cPullupInput { vdd: 5.0, bus_capacitance_pf: 400.0, mode: I2cBusMode::FastPlus }
            .calculate();
        assert!(matches!(r, Err(CalcError::Degenerate(_))));
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("Fast".parse::<I2cBusMode>().unwrap(), I2cBusMode::Fast);
        assert_eq!("fm+".parse::<I2cBusMode>().unwrap(), I2cBusMode::FastPlus);
        assert!("turbo".parse::<I2cBusMode>().is_err());
    }
}
