//! Tunable constants shared by the parser, the operations and the CLI.
//!
//! This module groups the fixed values the tool relies on:
//! - Hexdump layout defaults
//! - Watch polling interval
//! - Kernel-specific region and smaps quirks

/// Hexdump layout configuration.
pub mod hexdump {
    /// Bytes rendered per row when no width is given.
    pub const DEFAULT_WIDTH: usize = 16;

    /// Bytes per visual cluster inside a row.
    pub const CLUSTER_SIZE: usize = 8;
}

/// Watch loop configuration.
pub mod watch {
    use std::time::Duration;

    /// Delay between two snapshots of the watched range.
    pub const POLL_INTERVAL: Duration = Duration::from_millis(100);
}

/// Kernel map quirks.
pub mod maps {
    /// Pseudo regions excluded unless the default filter is disabled.
    ///
    /// `[vvar]` fails with EIO when read through the memory file, and
    /// `[vsyscall]` sits above the largest seekable offset.
    pub const UNREADABLE_PSEUDO_REGIONS: [&str; 2] = ["[vvar]", "[vsyscall]"];

    /// smaps lines that carry no kB value and are skipped silently.
    pub const IGNORED_SMAPS_MARKERS: [&str; 2] = ["THPeligible:", "ProtectionKey:"];

    /// Marker of the line terminating one extended region block.
    pub const VMFLAGS_MARKER: &str = "VmFlags:";

    /// Page size used to scale the counts in `/proc/<pid>/statm`.
    pub const PAGE_SIZE: u64 = 4096;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hexdump_constants() {
        assert_eq!(hexdump::DEFAULT_WIDTH, 16);
        assert_eq!(hexdump::DEFAULT_WIDTH % hexdump::CLUSTER_SIZE, 0);
    }

    #[test]
    fn test_watch_interval() {
        assert_eq!(watch::POLL_INTERVAL.as_millis(), 100);
    }
}
