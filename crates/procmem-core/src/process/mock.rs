//! Mock process memory for testing
//!
//! Provides a configurable implementation of the `ProcessMemory` trait
//! that serves regions from in-memory buffers instead of a real process.

use std::cell::RefCell;
use std::io;

use crate::error::{Error, Result};
use crate::process::ProcessMemory;
use crate::process::memory::check_offsets;
use crate::region::{MemoryRegion, parse_descriptor};

#[derive(Debug)]
struct Segment {
    base: u64,
    data: RefCell<Vec<u8>>,
    failing: bool,
}

/// Mock process memory for testing
///
/// Each region is backed by its own buffer. Regions marked as failing
/// return an EIO error on every access, like `[vvar]` does on Linux.
#[derive(Debug)]
pub struct MockMemory {
    regions: Vec<MemoryRegion>,
    segments: Vec<Segment>,
}

impl MockMemory {
    fn segment(&self, address: u64) -> Result<&Segment> {
        self.segments
            .iter()
            .find(|s| address >= s.base && address < s.base + s.data.borrow().len() as u64)
            .filter(|s| !s.failing)
            .ok_or_else(|| Error::MemoryIo {
                address,
                source: io::Error::from_raw_os_error(5),
            })
    }

    /// Copy of the current contents of the segment containing `address`
    pub fn snapshot(&self, address: u64) -> Vec<u8> {
        self.segments
            .iter()
            .find(|s| s.base == address)
            .map(|s| s.data.borrow().clone())
            .unwrap_or_default()
    }
}

impl ProcessMemory for MockMemory {
    fn regions(&self) -> Result<&[MemoryRegion]> {
        Ok(&self.regions)
    }

    fn read(&self, start: u64, stop: u64) -> Result<Vec<u8>> {
        check_offsets(start, stop)?;
        if start == stop {
            return Ok(Vec::new());
        }
        let segment = self.segment(start)?;
        let data = segment.data.borrow();
        let offset = (start - segment.base) as usize;
        let end = ((stop - segment.base) as usize).min(data.len());
        Ok(data[offset..end].to_vec())
    }

    fn write(&self, addr: u64, data: &[u8]) -> Result<()> {
        check_offsets(addr, addr.saturating_add(data.len() as u64))?;
        let segment = self.segment(addr)?;
        let mut buffer = segment.data.borrow_mut();
        let offset = (addr - segment.base) as usize;
        if offset + data.len() > buffer.len() {
            return Err(Error::MemoryIo {
                address: addr,
                source: io::Error::from_raw_os_error(5),
            });
        }
        buffer[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }
}

/// Builder for creating mock process memory
#[derive(Debug, Default)]
pub struct MockMemoryBuilder {
    regions: Vec<MemoryRegion>,
    segments: Vec<Segment>,
}

impl MockMemoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region from a maps descriptor line, backed by `data`.
    ///
    /// `data` is zero-padded or truncated to the region length.
    pub fn region(self, descriptor: &str, data: &[u8]) -> Self {
        self.region_from(parse_mock_descriptor(descriptor), data)
    }

    /// Add a region whose every access fails with an I/O error
    pub fn failing_region(self, descriptor: &str) -> Self {
        self.failing_region_from(parse_mock_descriptor(descriptor))
    }

    /// Add an already parsed region, keeping its smaps attributes and flags
    pub fn region_from(self, region: MemoryRegion, data: &[u8]) -> Self {
        self.push(region, data, false)
    }

    pub fn failing_region_from(self, region: MemoryRegion) -> Self {
        self.push(region, &[], true)
    }

    fn push(mut self, region: MemoryRegion, data: &[u8], failing: bool) -> Self {
        let mut buffer = data.to_vec();
        buffer.resize(region.length() as usize, 0);
        self.segments.push(Segment {
            base: region.addr_beg(),
            data: RefCell::new(buffer),
            failing,
        });
        self.regions.push(region);
        self
    }

    pub fn build(self) -> MockMemory {
        MockMemory {
            regions: self.regions,
            segments: self.segments,
        }
    }
}

fn parse_mock_descriptor(descriptor: &str) -> MemoryRegion {
    parse_descriptor(descriptor).expect("valid mock descriptor")
}
