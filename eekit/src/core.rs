//! Calculation dispatcher shared by the CLI and library callers.
//! No store or network dependencies.

use serde::{Deserialize, Serialize};

use crate::calculators::{
    AdcInput, AdcMetrics, AdcReading, CalcError, DacInput, DacReading, DividerInput,
    DividerResult, I2cPullupInput, I2cPullupRange, LcInput, LedInput, LedResult,
    MicrostripInput, MicrostripResult, PowerBudget, PowerModule, PowerSummary, RcInput, WaveInput,
    WaveResult,
};
use crate::codes::{convert_radix, decode_smd, RadixConversion, SmdDecoding};
use crate::eseries::ESeries;
use crate::format::{format_resistance, format_si, or_sentinel, Reading};
use crate::units::{self, Dimension};

#[derive(Debug, thiserror::Error)]
pub enum ToolboxError {
    #[error("Unknown unit or dimension: {0}")]
    UnknownUnitOrDimension(String),
    #[error("Invalid input: {0}")]
    Calc(#[from] CalcError),
    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),
    #[error("AI error: {0}")]
    Ai(#[from] crate::ai::AiError),
}

/// One calculator invocation with its typed input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Calculation {
    Divider(DividerInput),
    Led(LedInput),
    Rc(RcInput),
    Lc(LcInput),
    Wave(WaveInput),
    Adc(AdcInput),
    Dac(DacInput),
    AdcMetrics { bits: u32, vref: f64 },
    Microstrip(MicrostripInput),
    PowerBudget {
        modules: Vec<PowerModule>,
        #[serde(default)]
        battery_mah: Option<f64>,
    },
    I2cPullup(I2cPullupInput),
    Snap {
        target: f64,
        #[serde(default)]
        series: ESeries,
    },
    Convert {
        value: f64,
        dimension: Dimension,
        from: String,
        to: String,
    },
    Smd { code: String },
    Radix { literal: String, base: u32 },
}

impl Calculation {
    /// Human title of the calculator.
    pub fn title(&self) -> &'static str {
        match self {
            Calculation::Divider(_) => "Voltage Divider",
            Calculation::Led(_) => "LED Series Resistor",
            Calculation::Rc(_) => "RC Low-pass",
            Calculation::Lc(_) => "LC Resonance",
            Calculation::Wave(_) => "Frequency / Wavelength",
            Calculation::Adc(_) => "ADC",
            Calculation::Dac(_) => "DAC",
            Calculation::AdcMetrics { .. } => "ADC Metrics",
            Calculation::Microstrip(_) => "Microstrip Impedance",
            Calculation::PowerBudget { .. } => "Power Budget",
            Calculation::I2cPullup(_) => "I2C Pull-up",
            Calculation::Snap { .. } => "E-Series Snap",
            Calculation::Convert { .. } => "Unit Conversion",
            Calculation::Smd { .. } => "SMD Code",
            Calculation::Radix { .. } => "Radix",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum CalculationOutput {
    Divider(DividerResult),
    Led(LedResult),
    Frequency { label: String, hz: f64 },
    Wave(WaveResult),
    Adc(AdcReading),
    Dac(DacReading),
    AdcMetrics(AdcMetrics),
    Microstrip(MicrostripResult),
    PowerBudget(PowerSummary),
    I2cPullup(I2cPullupRange),
    Snap {
        target: f64,
        series: ESeries,
        value: Option<f64>,
    },
    Convert { value: f64, unit: String },
    Smd(SmdDecoding),
    Radix(RadixConversion),
}

impl CalculationOutput {
    pub fn readings(&self) -> Vec<Reading> {
        match self {
            CalculationOutput::Divider(r) => r.readings(),
            CalculationOutput::Led(r) => r.readings(),
            CalculationOutput::Frequency { label, hz } => {
                vec![Reading::new(label.clone(), format_si(*hz, "Hz"))]
            }
            CalculationOutput::Wave(r) => r.readings(),
            CalculationOutput::Adc(r) => r.readings(),
            CalculationOutput::Dac(r) => r.readings(),
            CalculationOutput::AdcMetrics(r) => r.readings(),
            CalculationOutput::Microstrip(r) => r.readings(),
            CalculationOutput::PowerBudget(r) => r.readings(),
            CalculationOutput::I2cPullup(r) => r.readings(),
            CalculationOutput::Snap { series, value, .. } => vec![Reading::new(
                format!("Nearest {:?}", series),
                or_sentinel(*value, format_resistance),
            )],
            CalculationOutput::Convert { value, unit } => {
                vec![Reading::new("Result", format!("{} {}", format_number(*value), unit))]
            }
            CalculationOutput::Smd(d) => vec![
                Reading::new("Resistance", d.resistance.clone()),
                Reading::new("Capacitance", d.capacitance.clone()),
            ],
            CalculationOutput::Radix(c) => vec![
                Reading::new("Decimal", c.decimal.clone()),
                Reading::new("Hexadecimal", c.hexadecimal.clone()),
                Reading::new("Binary", c.binary.clone()),
            ],
        }
    }
}

/// Shortest decimal that round-trips, without exponent noise for ordinary magnitudes.
fn format_number(value: f64) -> String {
    if value != 0.0 && (value.abs() >= 1e9 || value.abs() < 1e-6) {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}

/// Core calculation API used by the CLI and the benches.
pub struct ToolboxCore;

impl ToolboxCore {
    /// Evaluate one calculation.
    pub fn evaluate(calculation: &Calculation) -> Result<CalculationOutput, ToolboxError> {
        let output = match calculation {
            Calculation::Divider(input) => CalculationOutput::Divider(input.calculate()?),
            Calculation::Led(input) => CalculationOutput::Led(input.calculate()?),
            Calculation::Rc(input) => CalculationOutput::Frequency {
                label: "Cutoff (-3 dB)".to_string(),
                hz: input.cutoff_hz()?,
            },
            Calculation::Lc(input) => CalculationOutput::Frequency {
                label: "Resonance".to_string(),
                hz: input.resonant_hz()?,
            },
            Calculation::Wave(input) => CalculationOutput::Wave(input.calculate()?),
            Calculation::Adc(input) => CalculationOutput::Adc(input.convert()?),
            Calculation::Dac(input) => CalculationOutput::Dac(input.convert()?),
            Calculation::AdcMetrics { bits, vref } => {
                CalculationOutput::AdcMetrics(AdcMetrics::new(*bits, *vref)?)
            }
            Calculation::Microstrip(input) => CalculationOutput::Microstrip(input.calculate()?),
            Calculation::PowerBudget {
                modules,
                battery_mah,
            } => {
                let budget = PowerBudget {
                    modules: modules.clone(),
                };
                let summary = match battery_mah {
                    Some(capacity) => budget.summary_with_battery(*capacity)?,
                    None => budget.summary()?,
                };
                CalculationOutput::PowerBudget(summary)
            }
            Calculation::I2cPullup(input) => CalculationOutput::I2cPullup(input.calculate()?),
            Calculation::Snap { target, series } => CalculationOutput::Snap {
                target: *target,
                series: *series,
                value: series.snap(*target),
            },
            Calculation::Convert {
                value,
                dimension,
                from,
                to,
            } => CalculationOutput::Convert {
                value: units::convert(*value, *dimension, from, to)?,
                unit: to.clone(),
            },
            Calculation::Smd { code } => CalculationOutput::Smd(decode_smd(code)),
            Calculation::Radix { literal, base } => {
                CalculationOutput::Radix(convert_radix(literal, *base))
            }
        };
        Ok(output)
    }

    /// Evaluate and format. A failed calculation yields a single sentinel reading.
    pub fn readings(calculation: &Calculation) -> Vec<Reading> {
        match Self::evaluate(calculation) {
            Ok(output) => output.readings(),
            Err(e) => {
                tracing::debug!("{} rejected: {}", calculation.title(), e);
                vec![Reading::missing(calculation.title())]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::SENTINEL;

    #[test]
    fn test_divider_through_dispatcher() {
        let calc = Calculation::Divider(DividerInput {
            vin: 12.0,
            vout: 5.0,
            r1: 10_000.0,
        });
        match ToolboxCore::evaluate(&calc).unwrap() {
            CalculationOutput::Divider(r) => assert!((r.r2_e24 - 6800.0).abs() < 1e-6),
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_input_becomes_sentinel() {
        let calc = Calculation::Led(LedInput {
            supply_v: 3.0,
            forward_v: 3.3,
            current_ma: 20.0,
        });
        assert!(matches!(ToolboxCore::evaluate(&calc), Err(ToolboxError::Calc(_))));
        let readings = ToolboxCore::readings(&calc);
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].value, SENTINEL);
    }

    #[test]
    fn test_snap_sentinel() {
        let calc = Calculation::Snap {
            target: -5.0,
            series: ESeries::E24,
        };
        let readings = ToolboxCore::readings(&calc);
        assert_eq!(readings[0].value, SENTINEL);
    }

    #[test]
    fn test_unknown_unit() {
        let calc = Calculation::Convert {
            value: 1.0,
            dimension: Dimension::Voltage,
            from: "V".to_string(),
            to: "furlong".to_string(),
        };
        assert!(matches!(
            ToolboxCore::evaluate(&calc),
            Err(ToolboxError::UnknownUnitOrDimension(_))
        ));
    }

    #[test]
    fn test_calculation_json_shape() {
        let json = r#"{"kind":"rc","resistance":1000.0,"capacitance_nf":100.0}"#;
        let calc: Calculation = serde_json::from_str(json).unwrap();
        assert_eq!(calc.title(), "RC Low-pass");
        let readings = ToolboxCore::readings(&calc);
        assert_eq!(readings[0].value, "1.592 kHz");
    }

    #[test]
    fn test_no_reading_shows_nan() {
        let calcs = vec![
            Calculation::Wave(WaveInput {
                frequency: f64::NAN,
                unit: Default::default(),
            }),
            Calculation::Microstrip(MicrostripInput {
                width_mm: f64::INFINITY,
                ..Default::default()
            }),
            Calculation::Smd {
                code: "12".to_string(),
            },
            Calculation::Radix {
                literal: "-1".to_string(),
                base: 10,
            },
        ];
        for calc in &calcs {
            for reading in ToolboxCore::readings(calc) {
                assert!(!reading.value.contains("NaN"), "{:?}", reading);
                assert!(!reading.value.contains("inf"), "{:?}", reading);
            }
        }
    }
}
