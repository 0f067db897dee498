//! Search and overwrite.
//!
//! Match offsets of a region are computed once from its snapshot and every
//! one of them is overwritten afterwards. Writes are not re-validated, so
//! when `data` is longer than the needle a later match may already have
//! been clobbered by an earlier write and is overwritten regardless.

use std::io::Write;

use tracing::debug;

use crate::error::Result;
use crate::process::ProcessMemory;
use crate::region::RegionFilter;
use crate::search::{Needle, search};

#[derive(Debug, Clone)]
pub struct ReplaceOptions {
    pub needle: Needle,
    pub data: Vec<u8>,
    pub filter: RegionFilter,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaceSummary {
    /// Addresses written, in order.
    pub replaced: Vec<u64>,
    pub failed: usize,
}

pub fn run<M, W>(memory: &M, options: &ReplaceOptions, out: &mut W) -> Result<ReplaceSummary>
where
    M: ProcessMemory + ?Sized,
    W: Write,
{
    let regions = super::selected_regions(memory, &options.filter)?;

    let mut replaced = Vec::new();
    let failed = super::for_each_region(memory, &regions, |region, haystack| {
        let offsets = search(&options.needle, &haystack);
        debug!("{} matches in {}", offsets.len(), region);
        for offset in offsets {
            let addr = region.addr_beg() + offset as u64;
            memory.write(addr, &options.data)?;
            writeln!(out, "replaced data at {:016x}", addr)?;
            replaced.push(addr);
        }
        Ok(())
    })?;

    Ok(ReplaceSummary { replaced, failed })
}
