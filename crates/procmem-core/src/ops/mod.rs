//! Operations behind each subcommand.
//!
//! Every operation takes the process memory, a typed options struct and an
//! output sink, so the same code drives the CLI and the tests:
//! - `info` - region listing (takes the region list, not the memory)
//! - `read` - hexdump or raw dump of ranges and regions
//! - `write` - store a literal at an address
//! - `search` / `replace` - needle search over region snapshots
//! - `watch` - poll a range and report changes

pub mod info;
pub mod read;
pub mod replace;
pub mod search;
pub mod watch;
pub mod write;

pub use info::InfoOptions;
pub use read::{ReadOptions, ReadSummary};
pub use replace::{ReplaceOptions, ReplaceSummary};
pub use search::{SearchOptions, SearchSummary};
pub use watch::{WatchOptions, Watcher};
pub use write::WriteOptions;

use tracing::warn;

use crate::error::Result;
use crate::process::ProcessMemory;
use crate::region::{MemoryRegion, RegionFilter};

/// The regions of `memory` selected by `filter`.
pub fn selected_regions<'m, M>(memory: &'m M, filter: &RegionFilter) -> Result<Vec<&'m MemoryRegion>>
where
    M: ProcessMemory + ?Sized,
{
    Ok(filter.apply(memory.regions()?))
}

/// Read each region in turn and hand its bytes to `visit`.
///
/// Overflow and memory I/O errors only skip the region they occur in, both
/// while reading and inside `visit`. Returns the number of skipped regions.
pub(crate) fn for_each_region<M, F>(
    memory: &M,
    regions: &[&MemoryRegion],
    mut visit: F,
) -> Result<usize>
where
    M: ProcessMemory + ?Sized,
    F: FnMut(&MemoryRegion, Vec<u8>) -> Result<()>,
{
    regions.iter().copied().try_fold(0, |failed, region| {
        let outcome = memory
            .read_region(region)
            .and_then(|chunk| visit(region, chunk));
        match outcome {
            Ok(()) => Ok(failed),
            Err(e) if e.is_region_local() => {
                warn!("Skipping region {}: {}", region, e);
                Ok(failed + 1)
            }
            Err(e) => Err(e),
        }
    })
}
