//! Marking-code and number-base decoders.
//!
//! Both decoders return display strings directly and fall back to the
//! sentinel for malformed input instead of failing.

pub mod radix;
pub mod smd;

pub use radix::{convert_radix, Radix, RadixConversion};
pub use smd::{decode_smd, SmdDecoding};
