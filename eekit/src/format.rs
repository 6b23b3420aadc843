//! Display formatting for calculator results.
//!
//! Every value shown to a user goes through here so that an invalid result is
//! always rendered as [`SENTINEL`] and never as `NaN` or `inf`.

use serde::{Deserialize, Serialize};

/// Placeholder shown in place of any value that could not be computed.
pub const SENTINEL: &str = "--";

/// A labelled, already formatted output value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub label: String,
    pub value: String,
}

impl Reading {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// A reading whose value is the sentinel.
    pub fn missing(label: impl Into<String>) -> Self {
        Self::new(label, SENTINEL)
    }
}

const PREFIXES: &[(f64, &str)] = &[
    (1e9, "G"),
    (1e6, "M"),
    (1e3, "k"),
    (1.0, ""),
    (1e-3, "m"),
    (1e-6, "µ"),
    (1e-9, "n"),
    (1e-12, "p"),
];

/// Format a resistance with Ω / kΩ / MΩ.
///
/// Values below 10 (after scaling) keep two decimals, larger ones one, and
/// trailing zeros are dropped: `6800.0` → `"6.8 kΩ"`, `1000.0` → `"1 kΩ"`.
pub fn format_resistance(ohms: f64) -> String {
    if !ohms.is_finite() || ohms <= 0.0 {
        return SENTINEL.to_string();
    }
    let (scaled, unit) = if ohms >= 1e6 {
        (ohms / 1e6, "MΩ")
    } else if ohms >= 1e3 {
        (ohms / 1e3, "kΩ")
    } else {
        (ohms, "Ω")
    };
    let decimals = if scaled < 10.0 { 2 } else { 1 };
    format!("{} {}", trim_decimals(scaled, decimals), unit)
}

/// Format a value with the closest engineering prefix, e.g. `1591.5, "Hz"` →
/// `"1.592 kHz"`. Zero is rendered without a prefix.
pub fn format_si(value: f64, unit: &str) -> String {
    if !value.is_finite() {
        return SENTINEL.to_string();
    }
    if value == 0.0 {
        return format!("0 {}", unit);
    }
    let magnitude = value.abs();
    let (scale, prefix) = PREFIXES
        .iter()
        .copied()
        .find(|(scale, _)| magnitude >= *scale)
        .unwrap_or((1e-12, "p"));
    let scaled = value / scale;
    let decimals = if scaled.abs() < 10.0 {
        3
    } else if scaled.abs() < 100.0 {
        2
    } else {
        1
    };
    format!("{} {}{}", trim_decimals(scaled, decimals), prefix, unit)
}

/// Fixed-point formatting of a finite value, sentinel otherwise.
pub fn format_fixed(value: f64, decimals: usize, unit: &str) -> String {
    if !value.is_finite() {
        return SENTINEL.to_string();
    }
    if unit.is_empty() {
        format!("{:.*}", decimals, value)
    } else {
        format!("{:.*} {}", decimals, value, unit)
    }
}

/// Format an optional value, rendering `None` as the sentinel.
pub fn or_sentinel<T>(value: Option<T>, render: impl FnOnce(T) -> String) -> String {
    value.map(render).unwrap_or_else(|| SENTINEL.to_string())
}

/// Fixed decimals with insignificant trailing zeros dropped.
fn trim_decimals(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.');
        if trimmed == "-0" {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_resistance() {
        assert_eq!(format_resistance(6800.0), "6.8 kΩ");
        assert_eq!(format_resistance(1000.0), "1 kΩ");
        assert_eq!(format_resistance(7142.857), "7.14 kΩ");
        assert_eq!(format_resistance(47.0), "47 Ω");
        assert_eq!(format_resistance(2_200_000.0), "2.2 MΩ");
        assert_eq!(format_resistance(150.0), "150 Ω");
    }

    #[test]
    fn test_format_resistance_sentinel() {
        assert_eq!(format_resistance(0.0), SENTINEL);
        assert_eq!(format_resistance(-5.0), SENTINEL);
        assert_eq!(format_resistance(f64::NAN), SENTINEL);
        assert_eq!(format_resistance(f64::INFINITY), SENTINEL);
    }

    #[test]
    fn test_format_si() {
        assert_eq!(format_si(1591.549, "Hz"), "1.592 kHz");
        assert_eq!(format_si(299.792458, "m"), "299.8 m");
        assert_eq!(format_si(1e-6, "s"), "1 µs");
        assert_eq!(format_si(0.0, "A"), "0 A");
        assert_eq!(format_si(f64::NAN, "Hz"), SENTINEL);
    }

    #[test]
    fn test_or_sentinel() {
        assert_eq!(or_sentinel(Some(2.5), |v| format!("{v}")), "2.5");
        assert_eq!(or_sentinel(None::<f64>, |v| format!("{v}")), SENTINEL);
    }
}
