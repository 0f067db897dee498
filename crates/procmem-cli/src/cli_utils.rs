//! Common CLI utility functions shared across commands.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use anyhow::Result;
use procmem_core::{AccessMode, MemoryAccessor, resume, suspend};
use tracing::{debug, warn};

/// Process currently stopped by [`with_suspended`], 0 when none.
static SUSPENDED_PID: AtomicU32 = AtomicU32::new(0);

/// Open the memory of `pid` in `mode`.
pub fn open_memory(pid: u32, mode: AccessMode) -> Result<MemoryAccessor> {
    let memory = MemoryAccessor::open(pid, mode)?;
    debug!("Opened memory of process {} ({:?})", pid, mode);
    Ok(memory)
}

/// Install the Ctrl-C handler and return the flag it sets.
///
/// The handler resumes a process stopped by [`with_suspended`]. With
/// `exit` set it then terminates procmem; otherwise the caller is expected
/// to poll the flag and return on its own.
pub fn install_interrupt_handler(exit: bool) -> Result<Arc<AtomicBool>> {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_ctrlc = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        stop_ctrlc.store(true, Ordering::SeqCst);
        if exit {
            resume_suspended();
            std::process::exit(130);
        }
    })?;
    Ok(stop)
}

/// Send SIGCONT to the process kept stopped by [`with_suspended`], if any.
fn resume_suspended() {
    let pid = SUSPENDED_PID.swap(0, Ordering::SeqCst);
    if pid != 0
        && let Err(e) = resume(pid)
    {
        warn!("Failed to resume process {}: {}", pid, e);
    }
}

/// Run `f`, keeping `pid` stopped meanwhile when `enabled` is set.
///
/// The process is resumed on every exit path, also when `f` fails or the
/// user interrupts procmem.
pub fn with_suspended<T>(pid: u32, enabled: bool, f: impl FnOnce() -> Result<T>) -> Result<T> {
    if !enabled {
        return f();
    }

    match install_interrupt_handler(true) {
        Ok(_) => {}
        // watch installs its own handler, which stops the loop instead
        Err(e) if matches!(e.downcast_ref::<ctrlc::Error>(), Some(ctrlc::Error::MultipleHandlers)) => {}
        Err(e) => return Err(e),
    }

    let guard = suspend(pid)?;
    SUSPENDED_PID.store(pid, Ordering::SeqCst);
    let result = f();
    SUSPENDED_PID.store(0, Ordering::SeqCst);
    let resumed = guard.resume();
    let value = result?;
    resumed?;
    Ok(value)
}
