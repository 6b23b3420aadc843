//! EIA three/four digit SMD marking decoder.
//!
//! All digits but the last are significant figures, the last digit is the
//! power-of-ten multiplier. Resistor (Ω) and capacitor (pF) markings share the
//! encoding, so the decoded magnitude is shown under both units side by side.

use serde::{Deserialize, Serialize};

use crate::format::SENTINEL;

/// Decoded marking, shown both as a resistance and as a capacitance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmdDecoding {
    pub code: String,
    /// Magnitude in Ω (or pF), `None` when the code is malformed.
    pub value: Option<f64>,
    pub resistance: String,
    pub capacitance: String,
}

/// Decode a marking such as `"103"` or `"4702"`.
pub fn decode_smd(code: &str) -> SmdDecoding {
    let code = code.trim();
    let value = parse_marking(code);
    let (resistance, capacitance) = match value {
        Some(v) => {
            let magnitude = format_magnitude(v);
            (format!("{}Ω", magnitude), format!("{}pF", magnitude))
        }
        None => (SENTINEL.to_string(), SENTINEL.to_string()),
    };
    SmdDecoding {
        code: code.to_string(),
        value,
        resistance,
        capacitance,
    }
}

fn parse_marking(code: &str) -> Option<f64> {
    if !(3..=4).contains(&code.len()) || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (digits, multiplier) = code.split_at(code.len() - 1);
    let significant: u32 = digits.parse().ok()?;
    let exponent: i32 = multiplier.parse().ok()?;
    Some(f64::from(significant) * 10f64.powi(exponent))
}

/// `"10.0 k"`, `"4.7 M"` or `"47 "`; the unit symbol is appended by the caller.
fn format_magnitude(value: f64) -> String {
    if value >= 1e6 {
        format!("{:.1} M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.1} k", value / 1e3)
    } else {
        format!("{} ", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_103() {
        let d = decode_smd("103");
        assert_eq!(d.value, Some(10_000.0));
        assert_eq!(d.resistance, "10.0 kΩ");
        assert_eq!(d.capacitance, "10.0 kpF");
    }

    #[test]
    fn test_decode_472() {
        let d = decode_smd("472");
        assert_eq!(d.value, Some(4_700.0));
        assert_eq!(d.resistance, "4.7 kΩ");
        assert_eq!(d.capacitance, "4.7 kpF");
    }

    #[test]
    fn test_decode_small_and_large() {
        let d = decode_smd("470");
        assert_eq!(d.value, Some(47.0));
        assert_eq!(d.resistance, "47 Ω");

        let d = decode_smd("1005");
        assert_eq!(d.value, Some(10_000_000.0));
        assert_eq!(d.resistance, "10.0 MΩ");
    }

    #[test]
    fn test_decode_four_digit() {
        let d = decode_smd(" 4702 ");
        assert_eq!(d.code, "4702");
        assert_eq!(d.value, Some(47_000.0));
        assert_eq!(d.resistance, "47.0 kΩ");
    }

    #[test]
    fn test_malformed_codes() {
        for code in ["12", "abcd", "", "10000", "4R7", "1O3", "-12"] {
            let d = decode_smd(code);
            assert_eq!(d.value, None, "{}", code);
            assert_eq!(d.resistance, SENTINEL);
            assert_eq!(d.capacitance, SENTINEL);
        }
    }
}
