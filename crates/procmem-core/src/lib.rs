//! # procmem-core
//!
//! Core library for the procmem process memory inspection tool.
//!
//! This crate provides:
//! - Parsing of `/proc/<pid>/maps` and `/proc/<pid>/smaps` into typed regions
//! - Region filtering and the address range mini-language
//! - Seek based reads and writes through `/proc/<pid>/mem`
//! - Overlapping byte search, typed literal encoding and hexdump rendering
//! - The operations behind each `procmem` subcommand

pub mod codec;
pub mod config;
pub mod error;
pub mod hexdump;
pub mod ops;
pub mod process;
pub mod range;
pub mod region;
pub mod search;
pub mod statm;
pub mod units;

// Re-export from codec module
pub use codec::{ByteOrder, TypeSpec, TypeTag, decode_hex, encode, encode_with};

// Re-export from error module
pub use error::{Error, Result};

// Re-export from hexdump module
pub use hexdump::{render, write_hex};

// Re-export from process module
pub use process::{AccessMode, MemoryAccessor, ProcessMemory, resolve_pid};
#[cfg(unix)]
pub use process::{SuspendGuard, resume, suspend};

// Re-export from range module
pub use range::AddressRange;

// Re-export from region module
pub use region::{Attribute, MemoryRegion, Permissions, RegionFilter, regions_from_pid};

// Re-export from search module
pub use search::{Needle, search};

// Re-export from statm module
pub use statm::Statm;

// Re-export from units module
pub use units::{humanize_binary, parse_size};
