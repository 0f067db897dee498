//! Region listing.
//!
//! Works on a plain region list, so listing a process only needs its
//! smaps file and never the memory file.

use std::fs::File;
use std::io::{self, Write};

use crate::error::Result;
use crate::process::{open_error, proc_path};
use crate::region::{MemoryRegion, RegionFilter, vmflag_description};
use crate::units::humanize_binary;

#[derive(Debug, Clone, Default)]
pub struct InfoOptions {
    pub filter: RegionFilter,
    /// Print smaps attributes and VmFlags below each region.
    pub verbose: bool,
    pub json: bool,
}

/// List the selected regions and their total size. Returns the total in bytes.
pub fn run<W: Write>(regions: &[MemoryRegion], options: &InfoOptions, out: &mut W) -> Result<u64> {
    let regions = options.filter.apply(regions);
    let total = regions.iter().map(|r| r.length()).sum();

    if options.json {
        serde_json::to_writer_pretty(&mut *out, &regions)?;
        writeln!(out)?;
        return Ok(total);
    }

    for region in &regions {
        writeln!(out, "{}", region)?;
        if options.verbose {
            write_details(out, region)?;
        }
    }
    writeln!(out, "{}", "-".repeat(72))?;
    writeln!(out, "Total: {} - {} bytes", humanize_binary(total), total)?;

    Ok(total)
}

fn write_details<W: Write>(out: &mut W, region: &MemoryRegion) -> io::Result<()> {
    for attribute in region.attributes() {
        writeln!(
            out,
            "    {:18}: {:>10}",
            attribute.name,
            humanize_binary(attribute.bytes)
        )?;
    }
    writeln!(out, "    VmFlags:")?;
    for flag in region.flags() {
        writeln!(out, "        {} - {}", flag, vmflag_description(flag))?;
    }
    writeln!(out)
}

/// Copy `/proc/<pid>/smaps` to `out` unchanged.
pub fn write_raw_smaps<W: Write>(pid: u32, out: &mut W) -> Result<u64> {
    let mut smaps = File::open(proc_path(pid, "smaps")).map_err(|e| open_error(pid, e))?;
    Ok(io::copy(&mut smaps, out)?)
}
