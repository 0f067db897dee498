use std::cell::OnceCell;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};

use tracing::debug;

use crate::error::{Error, Result};
use crate::process::memory::{ProcessMemory, check_offsets};
use crate::process::{open_error, proc_path};
use crate::region::{MemoryRegion, regions_from_pid};

/// Upper bound for the initial read buffer; larger regions grow on demand.
const INITIAL_READ_CAPACITY: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
    WriteOnly,
}

impl AccessMode {
    fn options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self {
            Self::ReadOnly => options.read(true),
            Self::ReadWrite => options.read(true).write(true),
            Self::WriteOnly => options.write(true),
        };
        options
    }
}

/// Session on the memory of one process.
///
/// Owns the open `/proc/<pid>/mem` handle (closed on drop) and caches the
/// region list on first use. The cache assumes the memory map does not
/// change for the lifetime of the accessor.
pub struct MemoryAccessor {
    pid: u32,
    mode: AccessMode,
    file: File,
    regions: OnceCell<Vec<MemoryRegion>>,
}

impl MemoryAccessor {
    pub fn open(pid: u32, mode: AccessMode) -> Result<Self> {
        let path = proc_path(pid, "mem");
        let file = mode.options().open(&path).map_err(|e| {
            debug!("Opening {} failed: {}", path.display(), e);
            open_error(pid, e)
        })?;
        debug!("Opened {} ({:?})", path.display(), mode);

        Ok(Self {
            pid,
            mode,
            file,
            regions: OnceCell::new(),
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    fn seek(&self, address: u64) -> Result<()> {
        (&self.file)
            .seek(SeekFrom::Start(address))
            .map(|_| ())
            .map_err(|source| Error::MemoryIo { address, source })
    }
}

impl ProcessMemory for MemoryAccessor {
    fn regions(&self) -> Result<&[MemoryRegion]> {
        if let Some(regions) = self.regions.get() {
            return Ok(regions);
        }
        let regions = regions_from_pid(self.pid)?;
        Ok(self.regions.get_or_init(|| regions))
    }

    fn read(&self, start: u64, stop: u64) -> Result<Vec<u8>> {
        check_offsets(start, stop)?;
        self.seek(start)?;

        let len = stop - start;
        let mut buffer = Vec::with_capacity(len.min(INITIAL_READ_CAPACITY) as usize);
        (&self.file)
            .take(len)
            .read_to_end(&mut buffer)
            .map_err(|source| Error::MemoryIo {
                address: start,
                source,
            })?;
        Ok(buffer)
    }

    fn write(&self, addr: u64, data: &[u8]) -> Result<()> {
        let stop = addr.checked_add(data.len() as u64).ok_or(Error::Overflow {
            start: addr,
            stop: u64::MAX,
        })?;
        check_offsets(addr, stop)?;
        self.seek(addr)?;

        (&self.file)
            .write_all(data)
            .map_err(|source| Error::MemoryIo {
                address: addr,
                source,
            })
    }
}
