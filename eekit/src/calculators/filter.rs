//! RC / LC filter corner frequencies and frequency → period / wavelength.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{finite_result, positive, CalcResult};
use crate::core::ToolboxError;
use crate::format::{format_si, Reading};

/// Speed of light in vacuum in m/s (exact by SI definition).
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// First-order RC low-pass, R in Ω and C in nF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RcInput {
    pub resistance: f64,
    pub capacitance_nf: f64,
}

impl RcInput {
    /// −3 dB cutoff `1 / (2πRC)` in Hz.
    pub fn cutoff_hz(&self) -> CalcResult<f64> {
        let r = positive("R", self.resistance)?;
        let c = positive("C", self.capacitance_nf)? * 1e-9;
        finite_result("cutoff frequency", 1.0 / (2.0 * PI * r * c))
    }
}

/// LC tank, L in µH and C in nF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LcInput {
    pub inductance_uh: f64,
    pub capacitance_nf: f64,
}

impl LcInput {
    /// Resonant frequency `1 / (2π√(LC))` in Hz.
    pub fn resonant_hz(&self) -> CalcResult<f64> {
        let l = positive("L", self.inductance_uh)? * 1e-6;
        let c = positive("C", self.capacitance_nf)? * 1e-9;
        finite_result("resonant frequency", 1.0 / (2.0 * PI * (l * c).sqrt()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FrequencyUnit {
    Hz,
    #[serde(rename = "kHz")]
    KHz,
    #[default]
    #[serde(rename = "MHz")]
    MHz,
    #[serde(rename = "GHz")]
    GHz,
}

impl FrequencyUnit {
    pub fn multiplier(&self) -> f64 {
        match self {
            FrequencyUnit::Hz => 1.0,
            FrequencyUnit::KHz => 1e3,
            FrequencyUnit::MHz => 1e6,
            FrequencyUnit::GHz => 1e9,
        }
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FrequencyUnit::Hz => "Hz",
            FrequencyUnit::KHz => "kHz",
            FrequencyUnit::MHz => "MHz",
            FrequencyUnit::GHz => "GHz",
        };
        f.write_str(s)
    }
}

impl FromStr for FrequencyUnit {
    type Err = ToolboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hz" => Ok(FrequencyUnit::Hz),
            "khz" => Ok(FrequencyUnit::KHz),
            "mhz" => Ok(FrequencyUnit::MHz),
            "ghz" => Ok(FrequencyUnit::GHz),
            _ => Err(ToolboxError::UnknownUnitOrDimension(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveInput {
    pub frequency: f64,
    pub unit: FrequencyUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveResult {
    pub frequency_hz: f64,
    pub period_s: f64,
    /// Free-space wavelength in m.
    pub wavelength_m: f64,
}

impl WaveInput {
    pub fn calculate(&self) -> CalcResult<WaveResult> {
        let frequency_hz = positive("f", self.frequency)? * self.unit.multiplier();
        Ok(WaveResult {
            frequency_hz,
            period_s: finite_result("period", 1.0 / frequency_hz)?,
            wavelength_m: finite_result("wavelength", SPEED_OF_LIGHT / frequency_hz)?,
        })
    }
}

impl WaveResult {
    pub fn readings(&self) -> Vec<Reading> {
        vec![
            Reading::new("Frequency", format_si(self.frequency_hz, "Hz")),
            Reading::new("Period", format_si(self.period_s, "s")),
            Reading::new("Wavelength", format_si(self.wavelength_m, "m")),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rc_cutoff() {
        let fc = RcInput { resistance: 1000.0, capacitance_nf: 100.0 }
            .cutoff_hz()
            .unwrap();
        assert!((fc - 1591.549).abs() < 0.01, "fc = {}", fc);
    }

    #[test]
    fn test_lc_resonance() {
        // 10 µH with 100 nF resonates near 159.15 kHz
        let f = LcInput { inductance_uh: 10.0, capacitance_nf: 100.0 }
            .resonant_hz()
            .unwrap();
        assert!((f - 159_154.9).abs() < 1.0, "f = {}", f);
    }

    #[test]
    fn test_zero_components_rejected() {
        assert!(RcInput { resistance: 0.0, capacitance_nf: 100.0 }.cutoff_hz().is_err());
        assert!(LcInput { inductance_uh: 10.0, capacitance_nf: 0.0 }.resonant_hz().is_err());
    }

    #[test]
    fn test_one_megahertz() {
        let w = WaveInput { frequency: 1.0, unit: FrequencyUnit::MHz }
            .calculate()
            .unwrap();
        assert!((w.period_s - 1e-6).abs() < 1e-15);
        assert!((w.wavelength_m - 299.792458).abs() < 1e-9);
    }

    #[test]
    fn test_zero_frequency_rejected() {
        assert!(WaveInput { frequency: 0.0, unit: FrequencyUnit::Hz }.calculate().is_err());
    }

    #[test]
    fn test_unit_parse() {
        assert_eq!("kHz".parse::<FrequencyUnit>().unwrap(), FrequencyUnit::KHz);
        assert_eq!("GHZ".parse::<FrequencyUnit>().unwrap(), FrequencyUnit::GHz);
        assert!("THz".parse::<FrequencyUnit>().is_err());
    }
}
