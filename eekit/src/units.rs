//! Unit & magnitude conversion within one physical dimension.
//!
//! Every dimension carries a fixed table of unit symbols and their multiplier
//! to the dimension's base unit. A conversion is a pure linear rescale:
//! `value × from / to`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::ToolboxError;

/// Physical dimensions supported by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Capacitance,
    Voltage,
    Current,
    Inductance,
    Resistance,
    Power,
}

const CAPACITANCE: &[(&str, f64)] = &[
    ("F", 1.0),
    ("mF", 1e-3),
    ("uF", 1e-6),
    ("nF", 1e-9),
    ("pF", 1e-12),
];
const VOLTAGE: &[(&str, f64)] = &[("kV", 1e3), ("V", 1.0), ("mV", 1e-3), ("uV", 1e-6)];
const CURRENT: &[(&str, f64)] = &[("A", 1.0), ("mA", 1e-3), ("uA", 1e-6)];
const INDUCTANCE: &[(&str, f64)] = &[("H", 1.0), ("mH", 1e-3), ("uH", 1e-6), ("nH", 1e-9)];
const RESISTANCE: &[(&str, f64)] = &[("MΩ", 1e6), ("kΩ", 1e3), ("Ω", 1.0), ("mΩ", 1e-3)];
const POWER: &[(&str, f64)] = &[("kW", 1e3), ("W", 1.0), ("mW", 1e-3), ("uW", 1e-6)];

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Capacitance,
        Dimension::Voltage,
        Dimension::Current,
        Dimension::Inductance,
        Dimension::Resistance,
        Dimension::Power,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Capacitance => "Capacitance",
            Dimension::Voltage => "Voltage",
            Dimension::Current => "Current",
            Dimension::Inductance => "Inductance",
            Dimension::Resistance => "Resistance",
            Dimension::Power => "Power",
        }
    }

    /// Unit symbols and multipliers to the base unit, largest-first as displayed.
    pub fn units(&self) -> &'static [(&'static str, f64)] {
        match self {
            Dimension::Capacitance => CAPACITANCE,
            Dimension::Voltage => VOLTAGE,
            Dimension::Current => CURRENT,
            Dimension::Inductance => INDUCTANCE,
            Dimension::Resistance => RESISTANCE,
            Dimension::Power => POWER,
        }
    }

    /// Multiplier of `unit` relative to the base unit.
    ///
    /// `µ` is accepted for `u`, and `ohm` for `Ω`.
    pub fn multiplier(&self, unit: &str) -> Option<f64> {
        let normalized = normalize_unit(unit);
        self.units()
            .iter()
            .find(|(symbol, _)| *symbol == normalized)
            .map(|(_, factor)| *factor)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dimension {
    type Err = ToolboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ToolboxError::UnknownUnitOrDimension(s.to_string()))
    }
}

fn normalize_unit(unit: &str) -> String {
    let unit = unit.trim().replace('µ', "u").replace('μ', "u");
    for (alias, symbol) in [("Mohm", "MΩ"), ("kohm", "kΩ"), ("mohm", "mΩ")] {
        if unit == alias {
            return symbol.to_string();
        }
    }
    if unit.eq_ignore_ascii_case("ohm") {
        return "Ω".to_string();
    }
    unit
}

/// Convert `value` from `from` to `to` within `dimension`.
pub fn convert(value: f64, dimension: Dimension, from: &str, to: &str) -> Result<f64, ToolboxError> {
    let factor_from = dimension
        .multiplier(from)
        .ok_or_else(|| ToolboxError::UnknownUnitOrDimension(format!("{} in {}", from, dimension)))?;
    let factor_to = dimension
        .multiplier(to)
        .ok_or_else(|| ToolboxError::UnknownUnitOrDimension(format!("{} in {}", to, dimension)))?;
    Ok(value * factor_from / factor_to)
}

/// [`convert`] with the dimension given by name, e.g. `"Capacitance"`.
pub fn convert_named(value: f64, dimension: &str, from: &str, to: &str) -> Result<f64, ToolboxError> {
    let dimension: Dimension = dimension.parse()?;
    convert(value, dimension, from, to)
}
