mod accessor;
mod memory;
pub mod pid;
#[cfg(unix)]
pub mod signal;

// Mock process memory for testing (always available for unit and integration tests)
#[doc(hidden)]
pub mod mock;

use std::io;
use std::path::PathBuf;

use crate::error::Error;

pub use accessor::{AccessMode, MemoryAccessor};
pub use memory::{MAX_SEEK_OFFSET, ProcessMemory, check_offsets};
pub use pid::resolve_pid;
#[cfg(unix)]
pub use signal::{SuspendGuard, resume, suspend};

// Re-export mock for convenient access in tests
#[doc(hidden)]
pub use mock::{MockMemory, MockMemoryBuilder};

/// Path of an entry below `/proc/<pid>/`.
pub fn proc_path(pid: u32, entry: &str) -> PathBuf {
    PathBuf::from("/proc").join(pid.to_string()).join(entry)
}

/// Map an error from opening a `/proc/<pid>/*` file onto the process error kinds.
pub(crate) fn open_error(pid: u32, err: io::Error) -> Error {
    match err.kind() {
        io::ErrorKind::PermissionDenied => Error::AccessDenied(pid),
        io::ErrorKind::NotFound => Error::NotFound(pid),
        _ => Error::Io(err),
    }
}
