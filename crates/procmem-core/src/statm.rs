//! Memory usage summary from `/proc/<pid>/statm`.

use std::fmt;
use std::fs;
use std::str::FromStr;

use crate::config::maps::PAGE_SIZE;
use crate::error::{Error, Result};
use crate::process::{open_error, proc_path};
use crate::units::humanize_binary;

/// The seven page counts of a statm line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Statm {
    pub size: u64,
    pub resident: u64,
    pub shared: u64,
    pub text: u64,
    /// Always 0 since Linux 2.6.
    pub lib: u64,
    pub data: u64,
    /// Always 0 since Linux 2.6.
    pub dt: u64,
}

impl Statm {
    pub fn from_pid(pid: u32) -> Result<Self> {
        let content = fs::read_to_string(proc_path(pid, "statm")).map_err(|e| open_error(pid, e))?;
        content.parse()
    }

    /// Page count converted to bytes.
    pub fn bytes(pages: u64) -> u64 {
        pages.saturating_mul(PAGE_SIZE)
    }
}

impl FromStr for Statm {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let values = text
            .split_whitespace()
            .map(|field| {
                field
                    .parse::<u64>()
                    .map_err(|_| Error::Format(format!("invalid statm field {:?}", field)))
            })
            .collect::<Result<Vec<_>>>()?;

        let [size, resident, shared, text, lib, data, dt] = values[..] else {
            return Err(Error::Format(format!(
                "expected 7 statm fields, got {}",
                values.len()
            )));
        };

        Ok(Self {
            size,
            resident,
            shared,
            text,
            lib,
            data,
            dt,
        })
    }
}

impl fmt::Display for Statm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            (self.size, "total program size"),
            (self.resident, "resident set size"),
            (self.shared, "shared size"),
            (self.text, "text"),
            (self.data, "data + stack"),
        ];
        for (i, (pages, label)) in rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:>10}  {}", humanize_binary(Self::bytes(*pages)), label)?;
        }
        Ok(())
    }
}
