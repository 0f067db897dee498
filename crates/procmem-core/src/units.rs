//! Human readable byte counts.
//!
//! Used for display only; no decision logic depends on these strings.

use crate::error::{Error, Result};

const BINARY_UNITS: [&str; 9] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];
const DECIMAL_UNITS: [&str; 9] = ["B", "kB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];
const GNU_UNITS: [&str; 9] = ["", "K", "M", "G", "T", "P", "E", "Z", "Y"];

/// Format a byte count with binary (1024-based) units, e.g. `1.50 KiB`.
pub fn humanize_binary(count: u64) -> String {
    if count < 1000 {
        return format!("{} {}", count, BINARY_UNITS[0]);
    }
    let mut value = count as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < BINARY_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, BINARY_UNITS[unit])
}

fn unit_factor(unit: &str) -> Option<u128> {
    let lookup = |units: &[&str; 9], base: u128| {
        units
            .iter()
            .position(|u| *u == unit)
            .map(|i| base.pow(i as u32))
    };
    if unit.is_empty() {
        return Some(1);
    }
    lookup(&DECIMAL_UNITS, 1000)
        .or_else(|| lookup(&BINARY_UNITS, 1024))
        .or_else(|| lookup(&GNU_UNITS, 1024))
}

/// Parse a size such as `4096`, `4KiB`, `1.5 MB` or `2G` into a byte count.
///
/// `kB` is 1000 bytes, `KiB` and `K` are 1024 bytes.
pub fn parse_size(text: &str) -> Result<u64> {
    let trimmed = text.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);
    let unit = unit.trim();

    if number.is_empty() || !unit.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::Format(format!("couldn't interpret size {:?}", text)));
    }

    let factor = unit_factor(unit)
        .ok_or_else(|| Error::Format(format!("unknown unit {:?} in {:?}", unit, text)))?;

    let (int_part, frac_part) = match number.split_once('.') {
        Some((int_part, frac_part)) if !frac_part.is_empty() => (int_part, frac_part),
        Some(_) => return Err(Error::Format(format!("couldn't interpret size {:?}", text))),
        None => (number, ""),
    };
    if frac_part.contains('.') {
        return Err(Error::Format(format!("couldn't interpret size {:?}", text)));
    }

    let parse = |digits: &str| -> Result<u128> {
        if digits.is_empty() {
            return Ok(0);
        }
        digits
            .parse::<u128>()
            .map_err(|_| Error::Format(format!("size out of range: {:?}", text)))
    };

    let whole = parse(int_part)?.checked_mul(factor);
    let frac = if frac_part.is_empty() {
        Some(0)
    } else {
        10u128
            .checked_pow(frac_part.len() as u32)
            .and_then(|scale| parse(frac_part).ok()?.checked_mul(factor).map(|v| v / scale))
    };

    whole
        .zip(frac)
        .and_then(|(w, f)| w.checked_add(f))
        .and_then(|total| u64::try_from(total).ok())
        .ok_or_else(|| Error::Format(format!("size out of range: {:?}", text)))
}
