//! Address range mini-language.
//!
//! Accepted forms (all hex, no `0x` required):
//!
//! ```text
//! ADDR          [ADDR, ADDR+1)
//! ADDR:ADDR     [LHS, RHS)
//! ADDR:+DELTA   [LHS, LHS+DELTA)
//! ADDR:-DELTA   [LHS-DELTA, LHS)
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::region::MemoryRegion;

/// Half-open address interval `[start, stop)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressRange {
    pub start: u64,
    pub stop: u64,
}

impl AddressRange {
    pub fn new(start: u64, stop: u64) -> Result<Self> {
        if stop < start {
            return Err(Error::Format(format!(
                "range end {:x} lies before range start {:x}",
                stop, start
            )));
        }
        Ok(Self { start, stop })
    }

    pub fn len(&self) -> u64 {
        self.stop - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.stop
    }
}

impl From<&MemoryRegion> for AddressRange {
    fn from(region: &MemoryRegion) -> Self {
        Self {
            start: region.addr_beg(),
            stop: region.addr_end(),
        }
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}:{:x}", self.start, self.stop)
    }
}

impl FromStr for AddressRange {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let text = text.trim();
        let Some((lhs, rhs)) = text.split_once(':') else {
            let addr = parse_hex(text, text)?;
            let stop = addr
                .checked_add(1)
                .ok_or_else(|| Error::Format(format!("address out of range: {:?}", text)))?;
            return Ok(Self { start: addr, stop });
        };

        let lhs = parse_hex(lhs, text)?;

        if let Some(delta) = rhs.strip_prefix('+') {
            let delta = parse_hex(delta, text)?;
            let stop = lhs
                .checked_add(delta)
                .ok_or_else(|| Error::Format(format!("range overflows: {:?}", text)))?;
            Self::new(lhs, stop)
        } else if let Some(delta) = rhs.strip_prefix('-') {
            let delta = parse_hex(delta, text)?;
            let start = lhs
                .checked_sub(delta)
                .ok_or_else(|| Error::Format(format!("range underflows: {:?}", text)))?;
            Self::new(start, lhs)
        } else {
            let rhs = parse_hex(rhs, text)?;
            Self::new(lhs, rhs)
        }
    }
}

/// Parse a bare hex number, tolerating a leading `0x`.
pub fn parse_hex(digits: &str, context: &str) -> Result<u64> {
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    if digits.is_empty() {
        return Err(Error::Format(format!("missing address in {:?}", context)));
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::Format(format!(
            "invalid hex address {:?} in {:?}",
            digits, context
        )));
    }
    u64::from_str_radix(digits, 16)
        .map_err(|e| Error::Format(format!("invalid hex address {:?} in {:?}: {}", digits, context, e)))
}
