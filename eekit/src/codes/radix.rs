//! Decimal / hexadecimal / binary conversion of non-negative integers.

use serde::{Deserialize, Serialize};

use crate::format::SENTINEL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Radix {
    Binary,
    Decimal,
    Hexadecimal,
}

impl Radix {
    pub fn from_base(base: u32) -> Option<Self> {
        match base {
            2 => Some(Radix::Binary),
            10 => Some(Radix::Decimal),
            16 => Some(Radix::Hexadecimal),
            _ => None,
        }
    }

    pub fn base(&self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Decimal => 10,
            Radix::Hexadecimal => 16,
        }
    }

    /// Parse a literal in this base. Hex accepts a `0x` prefix, binary `0b`.
    pub fn parse(&self, literal: &str) -> Option<u64> {
        let literal = literal.trim();
        let digits = match self {
            Radix::Hexadecimal => strip_prefix_ci(literal, "0x"),
            Radix::Binary => strip_prefix_ci(literal, "0b"),
            Radix::Decimal => literal,
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(self.base())) {
            return None;
        }
        u64::from_str_radix(digits, self.base()).ok()
    }

    /// Render `value` the way this base is displayed.
    pub fn render(&self, value: u64) -> String {
        match self {
            Radix::Binary => format!("{:08b}", value),
            Radix::Decimal => value.to_string(),
            Radix::Hexadecimal => format!("0x{:X}", value),
        }
    }
}

fn strip_prefix_ci<'a>(literal: &'a str, prefix: &str) -> &'a str {
    match literal.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => &literal[prefix.len()..],
        _ => literal,
    }
}

/// All three renderings of one parsed literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadixConversion {
    pub value: Option<u64>,
    pub decimal: String,
    pub hexadecimal: String,
    pub binary: String,
}

/// Parse `literal` in `base` and render it in every supported base.
///
/// Unsupported bases and unparseable literals yield the sentinel in all fields.
pub fn convert_radix(literal: &str, base: u32) -> RadixConversion {
    let value = Radix::from_base(base).and_then(|radix| radix.parse(literal));
    match value {
        Some(v) => RadixConversion {
            value: Some(v),
            decimal: Radix::Decimal.render(v),
            hexadecimal: Radix::Hexadecimal.render(v),
            binary: Radix::Binary.render(v),
        },
        None => RadixConversion {
            value: None,
            decimal: SENTINEL.to_string(),
            hexadecimal: SENTINEL.to_string(),
            binary: SENTINEL.to_string(),
        },
    }
}
