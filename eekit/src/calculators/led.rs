//! LED current-limiting resistor.

use serde::{Deserialize, Serialize};

use super::{positive, CalcError, CalcResult};
use crate::format::{format_resistance, format_si, Reading};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedInput {
    pub supply_v: f64,
    pub forward_v: f64,
    pub current_ma: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedResult {
    pub resistance: f64,
    pub power_w: f64,
}

impl LedInput {
    pub fn calculate(&self) -> CalcResult<LedResult> {
        let supply = positive("Vsupply", self.supply_v)?;
        let forward = positive("Vforward", self.forward_v)?;
        let current_a = positive("If", self.current_ma)? / 1000.0;
        let drop = supply - forward;
        if drop <= 0.0 {
            return Err(CalcError::OutOfRange {
                field: "Vforward",
                reason: format!("{} V forward drop leaves no headroom on {} V", forward, supply),
            });
        }
        Ok(LedResult {
            resistance: drop / current_a,
            power_w: drop * current_a,
        })
    }
}

impl LedResult {
    pub fn readings(&self) -> Vec<Reading> {
        vec![
            Reading::new("Series resistor", format_resistance(self.resistance)),
            Reading::new("Resistor power", format_si(self.power_w, "W")),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_red_led_on_five_volts() {
        let r = LedInput { supply_v: 5.0, forward_v: 2.0, current_ma: 20.0 }
            .calculate()
            .unwrap();
        assert!((r.resistance - 150.0).abs() < 1e-9);
        assert!((r.power_w - 0.06).abs() < 1e-12);
    }

    #[test]
    fn test_no_headroom() {
        assert!(LedInput { supply_v: 3.0, forward_v: 3.2, current_ma: 10.0 }
            .calculate()
            .is_err());
        assert!(LedInput { supply_v: 3.0, forward_v: 3.0, current_ma: 10.0 }
            .calculate()
            .is_err());
    }

    #[test]
    fn test_zero_current() {
        assert_eq!(
            LedInput { supply_v: 5.0, forward_v: 2.0, current_ma: 0.0 }.calculate(),
            Err(CalcError::NotPositive { field: "If" })
        );
    }
}
