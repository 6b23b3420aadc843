//! eekit - electronics engineering toolbox library
//!
//! This library provides the calculators a hardware engineer reaches for while
//! designing a board: voltage dividers, LED resistors, RC/LC filters, ADC/DAC
//! conversion, microstrip impedance, power budgets and I2C pull-ups. Every
//! result is snapped to real parts where that makes sense and formatted so that
//! an invalid input shows a `--` placeholder instead of `NaN`.
//!
//! # Quick Start
//!
//! ```no_run
//! use eekit::{Calculation, ToolboxCore};
//! use eekit::calculators::DividerInput;
//!
//! let calc = Calculation::Divider(DividerInput { vin: 12.0, vout: 5.0, r1: 10_000.0 });
//! for reading in ToolboxCore::readings(&calc) {
//!     println!("{}: {}", reading.label, reading.value);
//! }
//! ```
//!
//! # Features
//!
//! - **Calculators**: divider, LED, RC/LC, wavelength, ADC/DAC, microstrip, power, I2C
//! - **Codes**: SMD marking decoder and radix converter
//! - **Reference**: bus interface and sensor cheat sheets
//! - **Persistence**: SQLite key-value store for account, favorites and history
//! - **Optional AI**: Gemini integration with per-operation credit metering

pub mod ai;
pub mod calculators;
pub mod codes;
pub mod core;
pub mod eseries;
pub mod format;
pub mod reference;
pub mod state;
pub mod store;
pub mod units;

// Re-export main types
pub use crate::core::{Calculation, CalculationOutput, ToolboxCore, ToolboxError};
pub use calculators::{CalcError, CalcResult};
pub use eseries::{snap_e24, ESeries};
pub use format::{Reading, SENTINEL};
pub use state::{AppState, Settings};
pub use store::{KvStore, StoreError};
pub use units::Dimension;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AppState, CalcError, Calculation, CalculationOutput, Dimension, ESeries, KvStore,
        Reading, ToolboxCore, ToolboxError, SENTINEL,
    };
}
