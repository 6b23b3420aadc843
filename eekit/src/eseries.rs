//! IEC 60063 preferred-number series and nearest-value snapping.
//!
//! Each series lists the normalized mantissas of one decade. Snapping maps an
//! arbitrary positive value onto the closest series member in the same decade,
//! rolling over to the next decade's `1.0` when that is closer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// E3 mantissas (±40 %).
pub const E3: [f64; 3] = [1.0, 2.2, 4.7];

/// E6 mantissas (±20 %).
pub const E6: [f64; 6] = [1.0, 1.5, 2.2, 3.3, 4.7, 6.8];

/// E12 mantissas (±10 %).
pub const E12: [f64; 12] = [1.0, 1.2, 1.5, 1.8, 2.2, 2.7, 3.3, 3.9, 4.7, 5.6, 6.8, 8.2];

/// E24 mantissas (±5 %).
pub const E24: [f64; 24] = [
    1.0, 1.1, 1.2, 1.3, 1.5, 1.6, 1.8, 2.0, 2.2, 2.4, 2.7, 3.0, 3.3, 3.6, 3.9, 4.3, 4.7, 5.1,
    5.6, 6.2, 6.8, 7.5, 8.2, 9.1,
];

/// A standard resistor series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ESeries {
    E3,
    E6,
    E12,
    #[default]
    E24,
}

impl ESeries {
    pub fn mantissas(&self) -> &'static [f64] {
        match self {
            ESeries::E3 => &E3,
            ESeries::E6 => &E6,
            ESeries::E12 => &E12,
            ESeries::E24 => &E24,
        }
    }

    /// Nominal tolerance of the series in percent.
    pub fn tolerance_percent(&self) -> f64 {
        match self {
            ESeries::E3 => 40.0,
            ESeries::E6 => 20.0,
            ESeries::E12 => 10.0,
            ESeries::E24 => 5.0,
        }
    }

    /// Snap `target` to the nearest member of this series.
    ///
    /// Returns `None` for zero, negative or non-finite targets.
    pub fn snap(&self, target: f64) -> Option<f64> {
        snap_to_series(target, self.mantissas())
    }
}

impl fmt::Display for ESeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for ESeries {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "E3" => Ok(ESeries::E3),
            "E6" => Ok(ESeries::E6),
            "E12" => Ok(ESeries::E12),
            "E24" => Ok(ESeries::E24),
            _ => Err(format!("unknown E-series: {}", s)),
        }
    }
}

/// Split a positive value into `(mantissa, exponent)` with `mantissa ∈ [1, 10)`
/// up to floating-point rounding.
pub fn decompose(value: f64) -> Option<(f64, i32)> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    let log = value.log10();
    let exponent = log.floor();
    let mantissa = 10f64.powf(log - exponent);
    Some((mantissa, exponent as i32))
}

/// Snap `target` to the nearest value of `series` scaled to the target's decade.
///
/// Ties keep the first mantissa in table order. The next decade's `1.0` is only
/// chosen when it is strictly closer than every in-decade candidate.
pub fn snap_to_series(target: f64, series: &[f64]) -> Option<f64> {
    let (mantissa, exponent) = decompose(target)?;
    let (closest, min_diff) = nearest_mantissa(mantissa, series)?;

    if (mantissa - 10.0).abs() < min_diff {
        return Some(10f64.powi(exponent + 1));
    }

    Some(closest * 10f64.powi(exponent))
}

/// First series entry with the minimal absolute distance to `mantissa`,
/// together with that distance.
pub(crate) fn nearest_mantissa(mantissa: f64, series: &[f64]) -> Option<(f64, f64)> {
    let (&first, rest) = series.split_first()?;
    let mut closest = first;
    let mut min_diff = (mantissa - first).abs();
    for &candidate in rest {
        let diff = (mantissa - candidate).abs();
        if diff < min_diff {
            min_diff = diff;
            closest = candidate;
        }
    }
    Some((closest, min_diff))
}

/// Snap to the E24 series.
pub fn snap_e24(target: f64) -> Option<f64> {
    ESeries::E24.snap(target)
}
