//! Memory regions of a process address space.
//!
//! This module contains:
//! - `MemoryRegion` - one mapped segment as described by `/proc/<pid>/maps`
//! - `parser` - the maps / smaps text parser
//! - `filter` - predicate filtering over region lists

mod filter;
mod parser;

pub use filter::RegionFilter;
pub use parser::{SmapsParser, parse_descriptor, parse_maps, parse_smaps, regions_from_pid};

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::units::humanize_binary;

/// Access permissions of a mapping, the `rwxp` column of the maps file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Permissions {
    pub readable: bool,
    pub writable: bool,
    pub executable: bool,
    /// `false` for shared (`s`) mappings.
    pub private: bool,
}

impl FromStr for Permissions {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != 4 {
            return Err(Error::Format(format!("invalid permissions {:?}", text)));
        }

        let flag = |byte: u8, set: u8, unset: u8| -> Result<bool> {
            match byte {
                b if b == set => Ok(true),
                b if b == unset => Ok(false),
                _ => Err(Error::Format(format!("invalid permissions {:?}", text))),
            }
        };

        Ok(Self {
            readable: flag(bytes[0], b'r', b'-')?,
            writable: flag(bytes[1], b'w', b'-')?,
            executable: flag(bytes[2], b'x', b'-')?,
            private: flag(bytes[3], b'p', b's')?,
        })
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            if self.readable { 'r' } else { '-' },
            if self.writable { 'w' } else { '-' },
            if self.executable { 'x' } else { '-' },
            if self.private { 'p' } else { 's' },
        )
    }
}

/// One `Name: value kB` line of an smaps block, stored in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub bytes: u64,
}

/// One mapped segment `[addr_beg, addr_end)` of a process.
///
/// Built by the parser and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryRegion {
    addr_beg: u64,
    addr_end: u64,
    perms: Permissions,
    offset: u64,
    dev: String,
    inode: u64,
    pathname: String,
    attributes: Vec<Attribute>,
    flags: Vec<String>,
}

impl MemoryRegion {
    /// Create a region from the descriptor fields. Fails unless `addr_beg < addr_end`.
    pub fn new(
        addr_beg: u64,
        addr_end: u64,
        perms: Permissions,
        offset: u64,
        dev: impl Into<String>,
        inode: u64,
        pathname: impl Into<String>,
    ) -> Result<Self> {
        if addr_end <= addr_beg {
            return Err(Error::Format(format!(
                "region end {:x} is not above region start {:x}",
                addr_end, addr_beg
            )));
        }
        Ok(Self {
            addr_beg,
            addr_end,
            perms,
            offset,
            dev: dev.into(),
            inode,
            pathname: pathname.into(),
            attributes: Vec::new(),
            flags: Vec::new(),
        })
    }

    pub(crate) fn push_attribute(&mut self, name: &str, bytes: u64) {
        self.attributes.push(Attribute {
            name: name.to_string(),
            bytes,
        });
    }

    pub(crate) fn set_flags(&mut self, flags: Vec<String>) {
        self.flags = flags;
    }

    pub fn addr_beg(&self) -> u64 {
        self.addr_beg
    }

    pub fn addr_end(&self) -> u64 {
        self.addr_end
    }

    pub fn length(&self) -> u64 {
        self.addr_end - self.addr_beg
    }

    pub fn perms(&self) -> Permissions {
        self.perms
    }

    pub fn readable(&self) -> bool {
        self.perms.readable
    }

    pub fn writable(&self) -> bool {
        self.perms.writable
    }

    pub fn executable(&self) -> bool {
        self.perms.executable
    }

    pub fn private(&self) -> bool {
        self.perms.private
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn dev(&self) -> &str {
        &self.dev
    }

    pub fn inode(&self) -> u64 {
        self.inode
    }

    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    /// Extended attributes in file order (smaps only).
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Look up one extended attribute, in bytes.
    pub fn attribute(&self, name: &str) -> Option<u64> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.bytes)
    }

    /// VmFlags codes in file order (smaps only).
    pub fn flags(&self) -> &[String] {
        &self.flags
    }
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:012x}-{:012x}  {:>10}  {}  {}",
            self.addr_beg,
            self.addr_end,
            humanize_binary(self.length()),
            self.perms,
            self.pathname
        )
    }
}

/// Describe a two-letter VmFlags code.
pub fn vmflag_description(code: &str) -> &'static str {
    match code {
        "rd" => "readable",
        "wr" => "writable",
        "ex" => "executable",
        "sh" => "shared",
        "mr" => "may read",
        "mw" => "may write",
        "me" => "may execute",
        "ms" => "may share",
        "gd" => "stack segment grows down",
        "pf" => "pure PFN range",
        "dw" => "disabled write to the mapped file",
        "lo" => "pages are locked in memory",
        "io" => "memory mapped I/O area",
        "sr" => "sequential read advise provided",
        "rr" => "random read advise provided",
        "dc" => "do not copy area on fork",
        "de" => "do not expand area on remapping",
        "ac" => "area is accountable",
        "nr" => "swap space is not reserved for the area",
        "ht" => "area uses huge tlb pages",
        "nl" => "non-linear mapping",
        "ar" => "architecture specific flag",
        "dd" => "do not include area into core dump",
        "sd" => "soft-dirty flag",
        "mm" => "mixed map area",
        "hg" => "huge page advise flag",
        "nh" => "no-huge page advise flag",
        "mg" => "mergeable advise flag",
        "um" => "userfaultfd missing tracking",
        "uw" => "userfaultfd wr-protect tracking",
        "bt" => "arm64 BTI guarded page",
        "mt" => "arm64 MTE allocation tags are enabled",
        "sl" => "sealed",
        _ => "unknown flag",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(text: &str) -> Permissions {
        text.parse().unwrap()
    }

    #[test]
    fn test_permissions_decode() {
        let p = perms("r-xp");
        assert!(p.readable);
        assert!(!p.writable);
        assert!(p.executable);
        assert!(p.private);

        let p = perms("rw-s");
        assert!(p.writable);
        assert!(!p.private);
    }

    #[test]
    fn test_permissions_round_trip() {
        for text in ["rwxp", "---s", "r--p", "-w-s", "--xp", "rw-p"] {
            assert_eq!(perms(text).to_string(), text);
        }
    }

    #[test]
    fn test_permissions_invalid() {
        assert!("rwx".parse::<Permissions>().is_err());
        assert!("rwxq".parse::<Permissions>().is_err());
        assert!("wrxp".parse::<Permissions>().is_err());
        assert!("rwxps".parse::<Permissions>().is_err());
    }

    #[test]
    fn test_region_rejects_inverted_span() {
        let p = perms("rw-p");
        assert!(MemoryRegion::new(0x2000, 0x1000, p, 0, "00:00", 0, "").is_err());
        assert!(MemoryRegion::new(0x2000, 0x2000, p, 0, "00:00", 0, "").is_err());
    }

    #[test]
    fn test_region_length_and_display() {
        let region =
            MemoryRegion::new(0x1000, 0x3000, perms("rw-p"), 0, "00:00", 0, "[heap]").unwrap();
        assert_eq!(region.length(), 0x2000);
        assert_eq!(
            region.to_string(),
            "000000001000-000000003000    8.00 KiB  rw-p  [heap]"
        );
    }

    #[test]
    fn test_attribute_lookup() {
        let mut region =
            MemoryRegion::new(0x1000, 0x2000, perms("r--p"), 0, "00:00", 0, "").unwrap();
        region.push_attribute("Rss", 4096);
        assert_eq!(region.attribute("Rss"), Some(4096));
        assert_eq!(region.attribute("Pss"), None);
    }

    #[test]
    fn test_vmflag_description() {
        assert_eq!(vmflag_description("rd"), "readable");
        assert_eq!(vmflag_description("gd"), "stack segment grows down");
        assert_eq!(vmflag_description("zz"), "unknown flag");
    }
}
