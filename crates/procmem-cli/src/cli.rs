//! CLI argument definitions for procmem.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use procmem_core::config::hexdump::DEFAULT_WIDTH;
use procmem_core::range::parse_hex;
use procmem_core::{AddressRange, RegionFilter, TypeSpec, parse_size};

#[derive(Parser, Debug)]
#[command(name = "procmem")]
#[command(about = "A process memory inspection tool", version)]
pub struct Args {
    /// Stop the process with SIGSTOP while its memory is accessed
    #[arg(short = 'S', long, global = true)]
    pub suspend: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Region selection shared by the commands that walk the memory map
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only regions that are writable
    #[arg(long)]
    pub writable: bool,
    /// Only regions whose pathname is exactly PATH
    #[arg(long, value_name = "PATH")]
    pub pathname: Option<String>,
    /// Only regions of at least SIZE (e.g. 4096, 4KiB, 1MB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub size: Option<u64>,
    /// Also include [vvar] and [vsyscall]
    #[arg(long)]
    pub no_default_filter: bool,
}

impl From<FilterArgs> for RegionFilter {
    fn from(args: FilterArgs) -> Self {
        RegionFilter {
            no_default_filter: args.no_default_filter,
            min_size: args.size,
            writable_only: args.writable,
            pathname: args.pathname,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the memory regions of a process
    Info {
        /// Print /proc/<pid>/smaps unprocessed
        #[arg(long)]
        raw: bool,
        /// Show smaps attributes and VmFlags of every region
        #[arg(short, long)]
        verbose: bool,
        /// Output as JSON
        #[arg(long, conflicts_with = "raw")]
        json: bool,
        #[command(flatten)]
        filter: FilterArgs,
        /// Process ID, `self`, or process name
        process: String,
    },
    /// Dump memory as hexdump or into files
    Read {
        /// Address range (ADDR, BEG:END, BEG:+LEN or END:-LEN, hex)
        #[arg(short, long, value_name = "RANGE")]
        range: Option<AddressRange>,
        /// Write raw bytes to FILE instead of printing a hexdump
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Write each region to its own FILE-<address>
        #[arg(long, requires = "output", conflicts_with = "range")]
        split: bool,
        /// Place each region at its own address inside FILE
        #[arg(long, requires = "output", conflicts_with = "range")]
        sparse: bool,
        /// Bytes per hexdump row
        #[arg(short = 'W', long, env = "PROCMEM_WIDTH", default_value_t = DEFAULT_WIDTH, value_parser = parse_width)]
        width: usize,
        #[command(flatten)]
        filter: FilterArgs,
        /// Process ID, `self`, or process name
        process: String,
    },
    /// Write a value to an address
    Write {
        /// Target address (hex)
        #[arg(short, long, value_parser = parse_address)]
        address: u64,
        /// Type of DATA (bytes, string, string0, int32, <uint16, >double, ...)
        #[arg(short = 't', long = "type", value_name = "TYPE", default_value = "bytes")]
        type_spec: TypeSpec,
        /// Process ID, `self`, or process name
        process: String,
        /// Value to write
        #[arg(allow_hyphen_values = true)]
        data: String,
    },
    /// Search the memory of a process for a value
    Search {
        /// Type of NEEDLE
        #[arg(short = 't', long = "type", value_name = "TYPE", default_value = "bytes")]
        type_spec: TypeSpec,
        /// Bytes of context around each match
        #[arg(short = 'C', long, value_name = "N", default_value_t = 0)]
        context: usize,
        /// Bytes of context after each match
        #[arg(short = 'A', long, value_name = "N")]
        after_context: Option<usize>,
        /// Bytes of context before each match
        #[arg(short = 'B', long, value_name = "N")]
        before_context: Option<usize>,
        /// Bytes per hexdump row
        #[arg(short = 'W', long, env = "PROCMEM_WIDTH", default_value_t = DEFAULT_WIDTH, value_parser = parse_width)]
        width: usize,
        #[command(flatten)]
        filter: FilterArgs,
        /// Process ID, `self`, or process name
        process: String,
        /// Value to search for
        #[arg(allow_hyphen_values = true)]
        needle: String,
    },
    /// Replace every occurrence of a value
    Replace {
        /// Type of NEEDLE and DATA
        #[arg(short = 't', long = "type", value_name = "TYPE", default_value = "bytes")]
        type_spec: TypeSpec,
        #[command(flatten)]
        filter: FilterArgs,
        /// Process ID, `self`, or process name
        process: String,
        /// Value to search for
        #[arg(allow_hyphen_values = true)]
        needle: String,
        /// Replacement value
        #[arg(allow_hyphen_values = true)]
        data: String,
    },
    /// Print a range whenever its content changes
    Watch {
        /// Address range to watch
        #[arg(short, long, value_name = "RANGE")]
        range: AddressRange,
        /// Bytes per hexdump row
        #[arg(short = 'W', long, env = "PROCMEM_WIDTH", default_value_t = DEFAULT_WIDTH, value_parser = parse_width)]
        width: usize,
        /// Polling interval in milliseconds
        #[arg(long, value_name = "MS", default_value_t = 100)]
        interval: u64,
        /// Process ID, `self`, or process name
        process: String,
    },
    /// Show the memory usage summary of a process
    Statm {
        /// Process ID, `self`, or process name
        process: String,
    },
}

fn parse_width(text: &str) -> Result<usize, String> {
    match text.parse::<usize>() {
        Ok(0) => Err("width must be at least 1".to_string()),
        Ok(width) => Ok(width),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_address(text: &str) -> Result<u64, String> {
    parse_hex(text, "address").map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use procmem_core::TypeTag;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_info_flags() {
        let args = parse(&["procmem", "info", "-v", "--writable", "--size", "4KiB", "1234"]);
        assert!(!args.suspend);
        match args.command {
            Command::Info {
                raw,
                verbose,
                json,
                filter,
                process,
            } => {
                assert!(!raw);
                assert!(verbose);
                assert!(!json);
                assert!(filter.writable);
                assert_eq!(filter.size, Some(4096));
                assert_eq!(process, "1234");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_info_raw_conflicts_with_json() {
        assert!(Args::try_parse_from(["procmem", "info", "--raw", "--json", "self"]).is_err());
    }

    #[test]
    fn test_global_suspend_after_subcommand() {
        let args = parse(&["procmem", "statm", "-S", "self"]);
        assert!(args.suspend);
        assert!(matches!(args.command, Command::Statm { .. }));
    }

    #[test]
    fn test_read_range_and_output() {
        let args = parse(&["procmem", "read", "-r", "7f00:+10", "-o", "dump.bin", "firefox"]);
        match args.command {
            Command::Read {
                range,
                output,
                split,
                width,
                process,
                ..
            } => {
                assert_eq!(range, Some(AddressRange::new(0x7f00, 0x7f10).unwrap()));
                assert_eq!(output, Some(PathBuf::from("dump.bin")));
                assert!(!split);
                assert_eq!(width, DEFAULT_WIDTH);
                assert_eq!(process, "firefox");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_read_split_requires_output() {
        assert!(Args::try_parse_from(["procmem", "read", "--split", "self"]).is_err());
        assert!(Args::try_parse_from(["procmem", "read", "--split", "-o", "x", "self"]).is_ok());
    }

    #[test]
    fn test_invalid_range_rejected() {
        assert!(Args::try_parse_from(["procmem", "read", "-r", "20:10", "self"]).is_err());
        assert!(Args::try_parse_from(["procmem", "watch", "-r", "zz", "self"]).is_err());
    }

    #[test]
    fn test_zero_width_rejected() {
        assert!(Args::try_parse_from(["procmem", "read", "-W", "0", "self"]).is_err());
    }

    #[test]
    fn test_write_typed() {
        let args = parse(&["procmem", "write", "-a", "0x7ffd1000", "-t", "<i32", "42", "-5"]);
        match args.command {
            Command::Write {
                address,
                type_spec,
                process,
                data,
            } => {
                assert_eq!(address, 0x7ffd1000);
                assert_eq!(type_spec.tag, TypeTag::Int32);
                assert_eq!(process, "42");
                assert_eq!(data, "-5");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(Args::try_parse_from(["procmem", "write", "-a", "10", "-t", "int128", "1", "2"]).is_err());
    }

    #[test]
    fn test_search_context() {
        let args = parse(&["procmem", "search", "-t", "s", "-C", "16", "-A", "4", "self", "needle"]);
        match args.command {
            Command::Search {
                type_spec,
                context,
                after_context,
                before_context,
                needle,
                ..
            } => {
                assert_eq!(type_spec.tag, TypeTag::String);
                assert_eq!(context, 16);
                assert_eq!(after_context, Some(4));
                assert_eq!(before_context, None);
                assert_eq!(needle, "needle");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_replace_positionals() {
        let args = parse(&["procmem", "replace", "--pathname", "[heap]", "self", "aabb", "ccdd"]);
        match args.command {
            Command::Replace {
                type_spec,
                filter,
                needle,
                data,
                ..
            } => {
                assert_eq!(type_spec.tag, TypeTag::Bytes);
                assert_eq!(filter.pathname.as_deref(), Some("[heap]"));
                assert_eq!(needle, "aabb");
                assert_eq!(data, "ccdd");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_filter_args_into_region_filter() {
        let filter: RegionFilter = FilterArgs {
            writable: true,
            pathname: Some("[stack]".to_string()),
            size: Some(8192),
            no_default_filter: true,
        }
        .into();
        assert!(filter.writable_only);
        assert!(filter.no_default_filter);
        assert_eq!(filter.min_size, Some(8192));
        assert_eq!(filter.pathname.as_deref(), Some("[stack]"));
    }

    #[test]
    fn test_watch_requires_range() {
        assert!(Args::try_parse_from(["procmem", "watch", "self"]).is_err());
        let args = parse(&["procmem", "watch", "-r", "1000:1010", "--interval", "250", "self"]);
        assert!(matches!(args.command, Command::Watch { interval: 250, .. }));
    }
}
