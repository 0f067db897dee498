//! Replace command overwriting every occurrence of a value.

use std::io::{self, Write};

use anyhow::Result;
use owo_colors::OwoColorize;
use procmem_core::ops::{self, ReplaceOptions};
use procmem_core::{AccessMode, Needle, RegionFilter, TypeSpec, encode_with, resolve_pid};

use crate::cli_utils;

pub fn run(
    process: &str,
    suspend: bool,
    needle: &str,
    data: &str,
    type_spec: TypeSpec,
    filter: RegionFilter,
) -> Result<()> {
    let options = ReplaceOptions {
        needle: Needle::new(encode_with(needle, type_spec)?)?,
        data: encode_with(data, type_spec)?,
        filter,
    };

    let pid = resolve_pid(process)?;
    let memory = cli_utils::open_memory(pid, AccessMode::ReadWrite)?;
    let mut out = io::stdout().lock();

    let summary = cli_utils::with_suspended(pid, suspend, || {
        let summary = ops::replace::run(&memory, &options, &mut out)?;
        out.flush()?;
        Ok(summary)
    })?;

    eprintln!("{} replacements", summary.replaced.len().green());
    if summary.failed > 0 {
        eprintln!(
            "{}",
            format!("{} regions could not be processed", summary.failed).yellow()
        );
    }
    Ok(())
}
