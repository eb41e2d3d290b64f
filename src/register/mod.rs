//! Register data model.
//!
//! This module provides:
//! - Register names and classification ([`RegisterName`], [`Classification`])
//! - The register table holding preset and fixed values ([`table`])
//! - Complete register sets ([`RegisterSet`]) and sparse overlays ([`Overlay`])
//! - Hex byte parsing for user-supplied register values ([`parse_hex_byte`])

mod name;
mod set;
pub mod table;


pub use name::{Classification, REGISTER_COUNT, RegisterName, UnknownRegister};
pub use set::{Overlay, RegisterChange, RegisterField, RegisterMapError, RegisterSet};

/// Parses a register value written as a hex byte, with or without `0x`.
///
/// Returns `None` for empty input, non-hex digits, or values above `0xff`.
#[must_use]
pub fn parse_hex_byte(s: &str) -> Option<u8> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() {
        return None;
    }

    u8::from_str_radix(digits, 16).ok()
}
