//! Dump memory as a hexdump or into files.
//!
//! With an explicit range only that range is read. Otherwise every selected
//! region is read; the output file may be shared by all regions, split
//! into one file per region, or written sparse so that each region lands
//! at its own address inside the file.

use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::hexdump::DEFAULT_WIDTH;
use crate::error::Result;
use crate::hexdump::write_hex;
use crate::process::ProcessMemory;
use crate::range::AddressRange;
use crate::region::RegionFilter;

#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Read only this range instead of the selected regions.
    pub range: Option<AddressRange>,
    pub filter: RegionFilter,
    /// Write raw bytes here instead of printing a hexdump.
    pub output: Option<PathBuf>,
    /// One file per region, named `<output>-<addr>`.
    pub split: bool,
    /// Seek to each region's address before writing it.
    pub sparse: bool,
    pub width: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            range: None,
            filter: RegionFilter::default(),
            output: None,
            split: false,
            sparse: false,
            width: DEFAULT_WIDTH,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadSummary {
    /// Bytes read from successfully dumped regions.
    pub bytes: u64,
    /// Regions skipped after an I/O or overflow error.
    pub failed: usize,
}

/// Output file name of one region in split mode.
pub fn split_file_name(template: &Path, addr: u64) -> PathBuf {
    let mut name = template.as_os_str().to_owned();
    name.push(format!("-{:016x}", addr));
    PathBuf::from(name)
}

pub fn run<M, W>(memory: &M, options: &ReadOptions, out: &mut W) -> Result<ReadSummary>
where
    M: ProcessMemory + ?Sized,
    W: Write,
{
    match &options.range {
        Some(range) => read_range(memory, range, options, out),
        None => read_regions(memory, options, out),
    }
}

fn read_range<M, W>(
    memory: &M,
    range: &AddressRange,
    options: &ReadOptions,
    out: &mut W,
) -> Result<ReadSummary>
where
    M: ProcessMemory + ?Sized,
    W: Write,
{
    let chunk = memory.read_range(range)?;
    match &options.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(&chunk)?;
        }
        None => write_hex(out, &chunk, range.start, options.width)?,
    }
    Ok(ReadSummary {
        bytes: chunk.len() as u64,
        failed: 0,
    })
}

fn read_regions<M, W>(memory: &M, options: &ReadOptions, out: &mut W) -> Result<ReadSummary>
where
    M: ProcessMemory + ?Sized,
    W: Write,
{
    let regions = super::selected_regions(memory, &options.filter)?;

    let mut shared_file = match &options.output {
        Some(path) if !options.split => {
            writeln!(out, "writing to {}", path.display())?;
            Some(File::create(path)?)
        }
        _ => None,
    };

    let mut bytes = 0u64;
    let failed = super::for_each_region(memory, &regions, |region, chunk| {
        let mut split_file = None;
        let file = match &options.output {
            None => None,
            Some(template) if options.split => {
                let path = split_file_name(template, region.addr_beg());
                writeln!(out, "writing to {}", path.display())?;
                Some(split_file.insert(File::create(&path)?))
            }
            Some(_) => shared_file.as_mut(),
        };

        match file {
            Some(file) => {
                if options.sparse {
                    file.seek(SeekFrom::Start(region.addr_beg()))?;
                }
                file.write_all(&chunk)?;
            }
            None => {
                writeln!(out, "{}", region)?;
                write_hex(out, &chunk, region.addr_beg(), options.width)?;
            }
        }

        debug!("Dumped {} bytes from {:#x}", chunk.len(), region.addr_beg());
        bytes += chunk.len() as u64;
        Ok(())
    })?;

    Ok(ReadSummary { bytes, failed })
}
