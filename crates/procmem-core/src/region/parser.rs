//! Parser for `/proc/<pid>/maps` and `/proc/<pid>/smaps`.
//!
//! A descriptor line has the layout
//!
//! ```text
//! 55d0c2a4e000-55d0c2a50000 r--p 00000000 fd:01 1835042    /usr/bin/cat
//! ```
//!
//! In the extended (smaps) format each descriptor is followed by
//! `Name:   <n> kB` attribute lines and a terminating `VmFlags:` line.

use std::fs::File;
use std::io::{BufRead, BufReader};

use tracing::{debug, warn};

use crate::config::maps::{IGNORED_SMAPS_MARKERS, VMFLAGS_MARKER};
use crate::error::{Error, Result};
use crate::process::{open_error, proc_path};
use crate::region::{MemoryRegion, Permissions};

/// Parse one descriptor line (basic maps format).
pub fn parse_descriptor(line: &str) -> Result<MemoryRegion> {
    let text = line.strip_suffix('\n').unwrap_or(line);
    let text = text.strip_suffix('\r').unwrap_or(text);
    let fail = |what: &str| Error::Format(format!("{} in maps line {:?}", what, line));

    let mut rest = text;
    let range = next_field(&mut rest).ok_or_else(|| fail("missing address range"))?;
    let perms = next_field(&mut rest).ok_or_else(|| fail("missing permissions"))?;
    let offset = next_field(&mut rest).ok_or_else(|| fail("missing offset"))?;
    let dev = next_field(&mut rest).ok_or_else(|| fail("missing device"))?;
    let inode = next_field(&mut rest).ok_or_else(|| fail("missing inode"))?;
    let pathname = rest.trim_start_matches(' ');

    let (beg, end) = range
        .split_once('-')
        .ok_or_else(|| fail("malformed address range"))?;
    let addr_beg = parse_hex_field(beg).ok_or_else(|| fail("invalid start address"))?;
    let addr_end = parse_hex_field(end).ok_or_else(|| fail("invalid end address"))?;

    let perms: Permissions = perms.parse().map_err(|_| fail("invalid permissions"))?;
    let offset = parse_hex_field(offset).ok_or_else(|| fail("invalid offset"))?;

    let valid_dev = dev
        .split_once(':')
        .is_some_and(|(major, minor)| is_hex(major) && is_hex(minor));
    if !valid_dev {
        return Err(fail("invalid device"));
    }

    if inode.is_empty() || !inode.bytes().all(|b| b.is_ascii_digit()) {
        return Err(fail("invalid inode"));
    }
    let inode: u64 = inode.parse().map_err(|_| fail("invalid inode"))?;

    MemoryRegion::new(addr_beg, addr_end, perms, offset, dev, inode, pathname)
        .map_err(|_| fail("inverted address range"))
}

/// Split off the next single-space delimited field.
fn next_field<'a>(rest: &mut &'a str) -> Option<&'a str> {
    if rest.is_empty() {
        return None;
    }
    match rest.split_once(' ') {
        Some((field, tail)) => {
            *rest = tail;
            Some(field)
        }
        None => {
            let field = *rest;
            *rest = "";
            Some(field)
        }
    }
}

fn is_hex(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_hexdigit())
}

fn parse_hex_field(text: &str) -> Option<u64> {
    if !is_hex(text) {
        return None;
    }
    u64::from_str_radix(text, 16).ok()
}

/// Parse one `Name: <n> kB` attribute line into `(name, bytes)`.
fn parse_attribute(line: &str) -> Option<(&str, u64)> {
    let (name, value) = line.trim_end().split_once(':')?;
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphabetic() || b == b'_') {
        return None;
    }
    let kb = value.trim_start_matches(' ').strip_suffix(" kB")?;
    if kb.is_empty() || !kb.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let kb: u64 = kb.parse().ok()?;
    Some((name, kb.checked_mul(1024)?))
}

/// Streaming parser over the extended (smaps) format.
///
/// Yields one region per descriptor block; an I/O or format error ends
/// the iteration.
pub struct SmapsParser<R> {
    reader: R,
    buf: Vec<u8>,
    line: String,
    done: bool,
}

impl<R: BufRead> SmapsParser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line: String::new(),
            done: false,
        }
    }

    /// Mapped file names may hold any bytes, so lines are decoded lossily.
    fn read_line(&mut self) -> Result<bool> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(false);
        }
        self.line.clear();
        self.line.push_str(&String::from_utf8_lossy(&self.buf));
        Ok(true)
    }

    /// Parse the next region block. `Ok(None)` at a clean end of input.
    pub fn next_region(&mut self) -> Result<Option<MemoryRegion>> {
        if !self.read_line()? {
            return Ok(None);
        }
        let mut region = parse_descriptor(&self.line)?;

        loop {
            if !self.read_line()? {
                return Err(Error::Format(format!(
                    "smaps input ends inside the block of region {:x}-{:x}",
                    region.addr_beg(),
                    region.addr_end()
                )));
            }

            let line = self.line.as_str();
            if IGNORED_SMAPS_MARKERS.iter().any(|m| line.starts_with(m)) {
                continue;
            }

            if let Some(flags) = line.strip_prefix(VMFLAGS_MARKER) {
                region.set_flags(flags.split_whitespace().map(str::to_string).collect());
                return Ok(Some(region));
            }

            match parse_attribute(line) {
                Some((name, bytes)) => region.push_attribute(name, bytes),
                None => warn!("failed to parse smaps line {:?}, ignoring", line),
            }
        }
    }
}

impl<R: BufRead> Iterator for SmapsParser<R> {
    type Item = Result<MemoryRegion>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_region() {
            Ok(Some(region)) => Some(Ok(region)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Parse a complete basic maps listing.
pub fn parse_maps<R: BufRead>(reader: R) -> Result<Vec<MemoryRegion>> {
    reader
        .split(b'\n')
        .map(|line| parse_descriptor(&String::from_utf8_lossy(&line?)))
        .collect()
}

/// Parse a complete extended (smaps) listing.
pub fn parse_smaps<R: BufRead>(reader: R) -> Result<Vec<MemoryRegion>> {
    SmapsParser::new(reader).collect()
}

/// Read and parse `/proc/<pid>/smaps`.
pub fn regions_from_pid(pid: u32) -> Result<Vec<MemoryRegion>> {
    let path = proc_path(pid, "smaps");
    let file = File::open(&path).map_err(|e| open_error(pid, e))?;
    let regions = parse_smaps(BufReader::new(file))?;
    debug!("Parsed {} regions from {}", regions.len(), path.display());
    Ok(regions)
}
