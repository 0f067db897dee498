//! Suspend and resume a target process with SIGSTOP / SIGCONT.
//!
//! A suspended process cannot change its own memory, so reads and writes
//! bracketed by a [`SuspendGuard`] see a consistent snapshot.

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tracing::{debug, warn};

use crate::error::{Error, Result};

fn send(pid: u32, signal: Signal) -> Result<()> {
    let raw = i32::try_from(pid).map_err(|_| Error::Signal {
        pid,
        message: "pid out of range".to_string(),
    })?;
    kill(Pid::from_raw(raw), signal).map_err(|e| Error::Signal {
        pid,
        message: e.to_string(),
    })
}

/// Stop `pid` until the returned guard is dropped or resumed.
pub fn suspend(pid: u32) -> Result<SuspendGuard> {
    send(pid, Signal::SIGSTOP)?;
    debug!("Suspended process {}", pid);
    Ok(SuspendGuard {
        pid,
        active: true,
    })
}

/// Send SIGCONT to `pid`.
pub fn resume(pid: u32) -> Result<()> {
    send(pid, Signal::SIGCONT)?;
    debug!("Resumed process {}", pid);
    Ok(())
}

/// Keeps a process stopped; sends SIGCONT when dropped.
#[derive(Debug)]
pub struct SuspendGuard {
    pid: u32,
    active: bool,
}

impl SuspendGuard {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Resume the process now, reporting a failure instead of logging it.
    pub fn resume(mut self) -> Result<()> {
        self.active = false;
        resume(self.pid)
    }
}

impl Drop for SuspendGuard {
    fn drop(&mut self) {
        if self.active
            && let Err(e) = resume(self.pid)
        {
            warn!("Failed to resume process {}: {}", self.pid, e);
        }
    }
}
