//! Read command dumping memory as hexdump or into files.

use std::io::{self, Write};

use anyhow::Result;
use owo_colors::OwoColorize;
use procmem_core::ops::{self, ReadOptions};
use procmem_core::{AccessMode, humanize_binary, resolve_pid};

use crate::cli_utils;

pub fn run(process: &str, suspend: bool, options: ReadOptions) -> Result<()> {
    let pid = resolve_pid(process)?;
    let memory = cli_utils::open_memory(pid, AccessMode::ReadOnly)?;
    let mut out = io::stdout().lock();

    let summary = cli_utils::with_suspended(pid, suspend, || {
        let summary = ops::read::run(&memory, &options, &mut out)?;
        out.flush()?;
        Ok(summary)
    })?;

    eprintln!("dumped {}", humanize_binary(summary.bytes).green());
    if summary.failed > 0 {
        eprintln!(
            "{}",
            format!("{} regions could not be read", summary.failed).yellow()
        );
    }
    Ok(())
}
