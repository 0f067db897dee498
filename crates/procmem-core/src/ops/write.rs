//! Store raw bytes at an address.

use tracing::debug;

use crate::error::Result;
use crate::process::ProcessMemory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    pub address: u64,
    pub data: Vec<u8>,
}

/// Write `options.data` at `options.address`. Returns the number of bytes written.
pub fn run<M>(memory: &M, options: &WriteOptions) -> Result<usize>
where
    M: ProcessMemory + ?Sized,
{
    memory.write(options.address, &options.data)?;
    debug!(
        "Wrote {} bytes at {:#x}",
        options.data.len(),
        options.address
    );
    Ok(options.data.len())
}
