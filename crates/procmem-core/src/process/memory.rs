use crate::error::{Error, Result};
use crate::range::AddressRange;
use crate::region::MemoryRegion;

/// Largest offset the memory file can be seeked to (`off_t` is signed).
pub const MAX_SEEK_OFFSET: u64 = i64::MAX as u64;

/// Trait for reading and writing the memory of a process
///
/// This trait enables mocking for tests and abstracts over different memory sources.
pub trait ProcessMemory {
    /// Full, unfiltered region list of the process
    fn regions(&self) -> Result<&[MemoryRegion]>;

    /// Read the bytes in `[start, stop)`; shorter only when the source is exhausted
    fn read(&self, start: u64, stop: u64) -> Result<Vec<u8>>;

    /// Write all of `data` starting at `addr`
    fn write(&self, addr: u64, data: &[u8]) -> Result<()>;

    /// Read an address range
    fn read_range(&self, range: &AddressRange) -> Result<Vec<u8>> {
        self.read(range.start, range.stop)
    }

    /// Read the whole span of a region
    fn read_region(&self, region: &MemoryRegion) -> Result<Vec<u8>> {
        self.read_range(&AddressRange::from(region))
    }
}

/// Validate a `[start, stop)` request against the seekable offset range.
pub fn check_offsets(start: u64, stop: u64) -> Result<()> {
    if stop < start {
        return Err(Error::Format(format!(
            "read end {:#x} lies before read start {:#x}",
            stop, start
        )));
    }
    if start > MAX_SEEK_OFFSET || stop > MAX_SEEK_OFFSET {
        return Err(Error::Overflow { start, stop });
    }
    Ok(())
}
