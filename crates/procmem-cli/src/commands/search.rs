//! Search command listing every occurrence of a value.

use std::io::{self, Write};

use anyhow::Result;
use owo_colors::OwoColorize;
use procmem_core::ops::{self, SearchOptions};
use procmem_core::{AccessMode, Needle, RegionFilter, TypeSpec, encode_with, resolve_pid};

use crate::cli_utils;

/// Hexdump context shown around each match
pub struct Context {
    pub context: usize,
    pub before: Option<usize>,
    pub after: Option<usize>,
    pub width: usize,
}

pub fn run(
    process: &str,
    suspend: bool,
    needle: &str,
    type_spec: TypeSpec,
    context: Context,
    filter: RegionFilter,
) -> Result<()> {
    let needle = Needle::new(encode_with(needle, type_spec)?)?;
    let options = SearchOptions {
        needle,
        filter,
        context: context.context,
        before_context: context.before,
        after_context: context.after,
        width: context.width,
    };

    let pid = resolve_pid(process)?;
    let memory = cli_utils::open_memory(pid, AccessMode::ReadOnly)?;
    let mut out = io::stdout().lock();

    let summary = cli_utils::with_suspended(pid, suspend, || {
        let summary = ops::search::run(&memory, &options, &mut out)?;
        out.flush()?;
        Ok(summary)
    })?;

    eprintln!("{} matches", summary.matches.len().green());
    if summary.failed > 0 {
        eprintln!(
            "{}",
            format!("{} regions could not be read", summary.failed).yellow()
        );
    }
    Ok(())
}
