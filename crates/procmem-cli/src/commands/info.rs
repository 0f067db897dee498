//! Info command listing the memory regions of a process.

use std::io::{self, Write};

use anyhow::Result;
use procmem_core::ops::{self, InfoOptions};
use procmem_core::{RegionFilter, regions_from_pid, resolve_pid};
use tracing::debug;

use crate::cli_utils;

pub fn run(
    process: &str,
    suspend: bool,
    raw: bool,
    verbose: bool,
    json: bool,
    filter: RegionFilter,
) -> Result<()> {
    let pid = resolve_pid(process)?;
    let mut out = io::stdout().lock();

    cli_utils::with_suspended(pid, suspend, || {
        if raw {
            ops::info::write_raw_smaps(pid, &mut out)?;
        } else {
            // smaps only; opening mem needs ptrace attach rights
            let regions = regions_from_pid(pid)?;
            debug!("Listing {} regions of process {}", regions.len(), pid);
            let options = InfoOptions {
                filter,
                verbose,
                json,
            };
            ops::info::run(&regions, &options, &mut out)?;
        }
        out.flush()?;
        Ok(())
    })
}
