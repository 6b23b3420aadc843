//! System power budget.
//!
//! Each module draws `current_ma` at `voltage` for `duty_percent` of the time.
//! The summary sums average power and current and groups the average current
//! by rail, rails keyed by the voltage at one decimal (`"3.3V"`) in the order
//! they were first seen.

use serde::{Deserialize, Serialize};

use super::{non_negative, positive, CalcError, CalcResult};
use crate::format::{format_fixed, Reading};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerModule {
    pub name: String,
    pub voltage: f64,
    pub current_ma: f64,
    pub duty_percent: f64,
}

impl PowerModule {
    pub fn new(name: impl Into<String>, voltage: f64, current_ma: f64, duty_percent: f64) -> Self {
        Self {
            name: name.into(),
            voltage,
            current_ma,
            duty_percent,
        }
    }

    fn validate(&self) -> CalcResult<()> {
        non_negative("voltage", self.voltage)?;
        non_negative("current", self.current_ma)?;
        let duty = non_negative("duty", self.duty_percent)?;
        if duty > 100.0 {
            return Err(CalcError::OutOfRange {
                field: "duty",
                reason: format!("{}% on {} exceeds 100%", duty, self.name),
            });
        }
        Ok(())
    }

    /// Duty-weighted current in mA.
    pub fn average_current_ma(&self) -> f64 {
        self.current_ma * self.duty_percent / 100.0
    }

    pub fn rail_key(&self) -> String {
        format!("{:.1}V", self.voltage)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RailCurrent {
    pub rail: String,
    pub current_ma: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerSummary {
    pub total_power_mw: f64,
    pub total_current_ma: f64,
    pub rails: Vec<RailCurrent>,
    /// Present when a battery capacity was given and the load is non-zero.
    pub battery_life_hours: Option<f64>,
}

/// Ordered list of modules. Indices are positions in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerBudget {
    pub modules: Vec<PowerModule>,
}

impl PowerBudget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, module: PowerModule) {
        self.modules.push(module);
    }

    /// Replace the module at `index`. Returns false if there is none.
    pub fn update(&mut self, index: usize, module: PowerModule) -> bool {
        match self.modules.get_mut(index) {
            Some(slot) => {
                *slot = module;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<PowerModule> {
        if index < self.modules.len() {
            Some(self.modules.remove(index))
        } else {
            None
        }
    }

    pub fn summary(&self) -> CalcResult<PowerSummary> {
        let mut total_power_mw = 0.0;
        let mut total_current_ma = 0.0;
        let mut rails: Vec<RailCurrent> = Vec::new();

        for module in &self.modules {
            module.validate()?;
            let avg = module.average_current_ma();
            total_current_ma += avg;
            total_power_mw += module.voltage * avg;

            let key = module.rail_key();
            match rails.iter_mut().find(|r| r.rail == key) {
                Some(rail) => rail.current_ma += avg,
                None => rails.push(RailCurrent { rail: key, current_ma: avg }),
            }
        }

        Ok(PowerSummary {
            total_power_mw,
            total_current_ma,
            rails,
            battery_life_hours: None,
        })
    }

    /// Summary plus runtime on a battery of `capacity_mah`.
    pub fn summary_with_battery(&self, capacity_mah: f64) -> CalcResult<PowerSummary> {
        let capacity = positive("battery capacity", capacity_mah)?;
        let mut summary = self.summary()?;
        summary.battery_life_hours = summary.battery_life(capacity);
        Ok(summary)
    }
}

impl PowerSummary {
    /// Hours on `capacity_mah`, or `None` with no average draw.
    pub fn battery_life(&self, capacity_mah: f64) -> Option<f64> {
        if self.total_current_ma > 0.0 && capacity_mah.is_finite() && capacity_mah > 0.0 {
            Some(capacity_mah / self.total_current_ma)
        } else {
            None
        }
    }

    pub fn readings(&self) -> Vec<Reading> {
        let mut readings = vec![
            Reading::new("Total power", format_fixed(self.total_power_mw, 2, "mW")),
            Reading::new("Total current", format_fixed(self.total_current_ma, 2, "mA")),
        ];
        for rail in &self.rails {
            readings.push(Reading::new(
                format!("Rail {}", rail.rail),
                format_fixed(rail.current_ma, 2, "mA"),
            ));
        }
        if let Some(hours) = self.battery_life_hours {
            readings.push(Reading::new("Battery life", format_fixed(hours, 1, "h")));
        }
        readings
    }
}
