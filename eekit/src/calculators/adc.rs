//! ADC / DAC code ↔ voltage mapping and ideal converter metrics.
//!
//! An N-bit converter with reference Vref has `2^N` codes of width
//! `LSB = Vref / 2^N`. Forward conversion floors `Vin / LSB` and saturates at
//! the top code; reverse conversion returns the code's lower edge `code · LSB`.

use serde::{Deserialize, Serialize};

use super::{non_negative, positive, CalcError, CalcResult};
use crate::format::{format_fixed, format_si, Reading};

/// Widest converter accepted.
pub const MAX_BITS: u32 = 32;

fn check_bits(bits: u32) -> CalcResult<u32> {
    if (1..=MAX_BITS).contains(&bits) {
        Ok(bits)
    } else {
        Err(CalcError::OutOfRange {
            field: "bits",
            reason: format!("{} is outside 1..={}", bits, MAX_BITS),
        })
    }
}

fn code_count(bits: u32) -> f64 {
    2f64.powi(bits as i32)
}

/// Ideal metrics of an N-bit converter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdcMetrics {
    pub bits: u32,
    pub lsb_v: f64,
    /// Theoretical quantization-limited SNR, `6.02·N + 1.76` dB.
    pub snr_db: f64,
    pub max_code: u64,
}

impl AdcMetrics {
    pub fn new(bits: u32, vref: f64) -> CalcResult<Self> {
        let bits = check_bits(bits)?;
        let vref = positive("Vref", vref)?;
        Ok(Self {
            bits,
            lsb_v: vref / code_count(bits),
            snr_db: 6.02 * f64::from(bits) + 1.76,
            max_code: (1u64 << bits) - 1,
        })
    }

    pub fn readings(&self) -> Vec<Reading> {
        vec![
            Reading::new("LSB", format_si(self.lsb_v, "V")),
            Reading::new("SNR (ideal)", format_fixed(self.snr_db, 2, "dB")),
            Reading::new("Codes", (self.max_code + 1).to_string()),
        ]
    }
}

/// Analog → digital.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdcInput {
    pub bits: u32,
    pub vref: f64,
    pub vin: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdcReading {
    pub code: u64,
    /// True when `vin` was at or above full scale and the code was clamped.
    pub saturated: bool,
    pub metrics: AdcMetrics,
}

impl AdcInput {
    pub fn convert(&self) -> CalcResult<AdcReading> {
        let metrics = AdcMetrics::new(self.bits, self.vref)?;
        let vin = non_negative("Vin", self.vin)?;
        let raw = (vin / self.vref * code_count(self.bits)).floor();
        let saturated = raw > metrics.max_code as f64;
        let code = if saturated { metrics.max_code } else { raw as u64 };
        Ok(AdcReading { code, saturated, metrics })
    }
}

impl AdcReading {
    pub fn readings(&self) -> Vec<Reading> {
        let mut readings = vec![Reading::new("Code", self.code.to_string())];
        readings.push(Reading::new("Code (hex)", format!("0x{:X}", self.code)));
        if self.saturated {
            readings.push(Reading::new("Note", "input at or above full scale"));
        }
        readings.extend(self.metrics.readings());
        readings
    }
}

/// Digital → analog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DacInput {
    pub bits: u32,
    pub vref: f64,
    pub code: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DacReading {
    pub vout: f64,
    pub metrics: AdcMetrics,
}

impl DacInput {
    pub fn convert(&self) -> CalcResult<DacReading> {
        let metrics = AdcMetrics::new(self.bits, self.vref)?;
        if self.code > metrics.max_code {
            return Err(CalcError::OutOfRange {
                field: "code",
                reason: format!("{} exceeds the top code {}", self.code, metrics.max_code),
            });
        }
        let vout = self.code as f64 / code_count(self.bits) * self.vref;
        Ok(DacReading { vout, metrics })
    }
}

impl DacReading {
    pub fn readings(&self) -> Vec<Reading> {
        let mut readings = vec![Reading::new("Vout", format_fixed(self.vout, 4, "V"))];
        readings.extend(self.metrics.readings());
        readings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twelve_bit_midscale() {
        let r = AdcInput { bits: 12, vref: 3.3, vin: 1.65 }.convert().unwrap();
        assert_eq!(r.code, 2048);
        assert!(!r.saturated);
    }

    #[test]
    fn test_metrics() {
        let m = AdcMetrics::new(12, 3.3).unwrap();
        assert!((m.lsb_v - 3.3 / 4096.0).abs() < 1e-15);
        assert!((m.snr_db - 74.0).abs() < 1e-9);
        assert_eq!(m.max_code, 4095);
    }

    #[test]
    fn test_full_scale_saturates() {
        let r = AdcInput { bits: 8, vref: 5.0, vin: 5.0 }.convert().unwrap();
        assert_eq!(r.code, 255);
        assert!(r.saturated);
        let r = AdcInput { bits: 8, vref: 5.0, vin: 7.0 }.convert().unwrap();
        assert_eq!(r.code, 255);
    }

    #[test]
    fn test_dac() {
        let r = DacInput { bits: 12, vref: 3.3, code: 2048 }.convert().unwrap();
        assert!((r.vout - 1.65).abs() < 1e-12);
        assert!(DacInput { bits: 12, vref: 3.3, code: 4096 }.convert().is_err());
    }

    #[test]
    fn test_bits_out_of_range() {
        assert!(AdcMetrics::new(0, 3.3).is_err());
        assert!(AdcMetrics::new(33, 3.3).is_err());
        assert!(AdcMetrics::new(32, 3.3).is_ok());
    }

    #[test]
    fn test_negative_input_rejected() {
        assert!(AdcInput { bits: 10, vref: 3.3, vin: -0.1 }.convert().is_err());
        assert!(AdcInput { bits: 10, vref: 0.0, vin: 1.0 }.convert().is_err());
    }
}
