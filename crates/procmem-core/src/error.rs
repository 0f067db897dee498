use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid type spec: '{0}'")]
    InvalidType(String),

    #[error("Permission denied accessing memory of process {0}")]
    AccessDenied(u32),

    #[error("Process {0} does not exist")]
    NotFound(u32),

    #[error("Address range {start:#x}-{stop:#x} exceeds the seekable offset range")]
    Overflow { start: u64, stop: u64 },

    #[error("I/O error at address {address:#x}: {source}")]
    MemoryIo {
        address: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("No process matching '{0}' found")]
    ProcessNotFound(String),

    #[error("Process name '{name}' is ambiguous, matching pids: {pids:?}")]
    AmbiguousProcess { name: String, pids: Vec<u32> },

    #[error("Search needle must not be empty")]
    EmptyNeedle,

    #[error("Failed to signal process {pid}: {message}")]
    Signal { pid: u32, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error only concerns a single region of a multi-region
    /// operation, so the operation may continue with the next region.
    pub fn is_region_local(&self) -> bool {
        matches!(self, Error::Overflow { .. } | Error::MemoryIo { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
