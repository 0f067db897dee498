//! Write command storing a typed value at an address.

use anyhow::Result;
use owo_colors::OwoColorize;
use procmem_core::ops::{self, WriteOptions};
use procmem_core::{AccessMode, TypeSpec, encode_with, resolve_pid};

use crate::cli_utils;

pub fn run(
    process: &str,
    suspend: bool,
    address: u64,
    type_spec: TypeSpec,
    data: &str,
) -> Result<()> {
    let data = encode_with(data, type_spec)?;
    let pid = resolve_pid(process)?;
    let memory = cli_utils::open_memory(pid, AccessMode::WriteOnly)?;

    let written = cli_utils::with_suspended(pid, suspend, || {
        Ok(ops::write::run(&memory, &WriteOptions { address, data })?)
    })?;

    eprintln!(
        "wrote {} bytes at {}",
        written,
        format!("{:016x}", address).green()
    );
    Ok(())
}
