//! Watch command printing a range whenever it changes.

use std::io;
use std::time::Duration;

use anyhow::Result;
use procmem_core::ops::{WatchOptions, Watcher};
use procmem_core::{AccessMode, AddressRange, resolve_pid};

use crate::cli_utils;

pub fn run(
    process: &str,
    suspend: bool,
    range: AddressRange,
    width: usize,
    interval: u64,
) -> Result<()> {
    let pid = resolve_pid(process)?;
    let memory = cli_utils::open_memory(pid, AccessMode::ReadOnly)?;

    let stop = cli_utils::install_interrupt_handler(false)?;

    let options = WatchOptions {
        range,
        width,
        interval: Duration::from_millis(interval),
    };

    println!("watching pid {}", pid);
    let changes = cli_utils::with_suspended(pid, suspend, || {
        let mut watcher = Watcher::new(&memory, options);
        Ok(watcher.run(&mut io::stdout().lock(), &stop)?)
    })?;

    eprintln!("\n{} changes detected", changes);
    Ok(())
}
