//! Integration tests for procmem-core
//!
//! These tests verify that the parser, the filters and the operations work
//! together on realistic map files, using the mock process memory.

use std::fs;
use std::io::BufReader;

use procmem_core::ops::{self, InfoOptions, ReadOptions, ReplaceOptions, SearchOptions};
use procmem_core::process::{MockMemory, MockMemoryBuilder, ProcessMemory};
use procmem_core::region::{RegionFilter, parse_smaps};
use procmem_core::{AddressRange, Needle, encode, parse_size};
use tempfile::NamedTempFile;

const SMAPS: &str = "\
55d4c8a00000-55d4c8a21000 rw-p 00000000 00:00 0                          [heap]
Size:                132 kB
KernelPageSize:        4 kB
Rss:                   8 kB
THPeligible:    0
VmFlags: rd wr mr mw me ac sd
7f2b1c001000-7f2b1c002000 rw-p 00001000 fd:01 1234                       /usr/lib/libc.so.6
Size:                  4 kB
Rss:                   4 kB
ProtectionKey:         0
VmFlags: rd wr mr mw me ac sd
7ffd4a1e0000-7ffd4a1e4000 r--p 00000000 00:00 0                          [vvar]
Size:                 16 kB
VmFlags: rd mr pf io de dd sd
";

/// Parse the fixture and back each region with a few recognizable bytes.
fn fixture() -> MockMemory {
    let regions = parse_smaps(SMAPS.as_bytes()).unwrap();
    regions
        .into_iter()
        .fold(MockMemoryBuilder::new(), |builder, region| {
            if region.pathname() == "[vvar]" {
                builder.failing_region_from(region)
            } else {
                builder.region_from(region, b"\x00\x00marker\x2a\x00\x00\x00marker")
            }
        })
        .build()
}

/// smaps text read from a file on disk
mod parse_tests {
    use super::*;

    #[test]
    fn test_parse_smaps_file() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), SMAPS).unwrap();

        let reader = BufReader::new(fs::File::open(file.path()).unwrap());
        let regions = parse_smaps(reader).unwrap();

        assert_eq!(regions.len(), 3);
        assert_eq!(regions[0].attribute("Size"), Some(132 * 1024));
        assert_eq!(regions[0].attribute("Rss"), Some(8 * 1024));
        assert_eq!(regions[0].attribute("THPeligible"), None);
        assert_eq!(regions[1].attribute("ProtectionKey"), None);
        assert_eq!(regions[2].flags(), ["rd", "mr", "pf", "io", "de", "dd", "sd"]);
    }

    #[test]
    fn test_truncated_smaps_is_an_error() {
        let truncated = SMAPS.lines().take(4).collect::<Vec<_>>().join("\n");
        assert!(parse_smaps(truncated.as_bytes()).is_err());
    }

    #[test]
    fn test_filter_by_human_size() {
        let regions = parse_smaps(SMAPS.as_bytes()).unwrap();
        let filter = RegionFilter {
            min_size: Some(parse_size("16KiB").unwrap()),
            ..Default::default()
        };
        let kept = filter.apply(&regions);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].pathname(), "[heap]");
    }
}

/// Operations over the parsed fixture
mod ops_tests {
    use super::*;

    #[test]
    fn test_info_verbose_lists_attributes_and_flags() {
        let memory = fixture();
        let options = InfoOptions {
            verbose: true,
            ..Default::default()
        };
        let mut out = Vec::new();
        let total = ops::info::run(memory.regions().unwrap(), &options, &mut out).unwrap();
        assert_eq!(total, 0x21000 + 0x1000);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(&format!("    {:18}: 132.00 KiB", "Size")));
        assert!(text.contains(&format!("    {:18}:   8.00 KiB", "Rss")));
        assert!(text.contains(&format!("    {:18}:   4.00 KiB", "KernelPageSize")));
        assert!(!text.contains("        gd - "));
        assert!(text.contains("        sd - soft-dirty flag"));
        assert!(!text.contains("[vvar]"));
        assert!(text.ends_with("Total: 136.00 KiB - 139264 bytes\n"));
    }

    #[test]
    fn test_read_all_regions_survives_unreadable_region() {
        let memory = fixture();
        let options = ReadOptions {
            filter: RegionFilter {
                no_default_filter: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut out = Vec::new();
        let summary = ops::read::run(&memory, &options, &mut out).unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.bytes, 0x21000 + 0x1000);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("  -- skipped zeroes: "));
    }

    #[test]
    fn test_search_typed_needle() {
        let memory = fixture();
        let needle = Needle::new(encode("42", "<i32").unwrap()).unwrap();
        let mut out = Vec::new();
        let summary = ops::search::run(&memory, &SearchOptions::new(needle), &mut out).unwrap();

        assert_eq!(summary.matches, vec![0x55d4c8a00008, 0x7f2b1c001008]);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_replace_then_search_finds_nothing() {
        let memory = fixture();
        let filter = RegionFilter {
            pathname: Some("[heap]".to_string()),
            ..Default::default()
        };
        let replace = ReplaceOptions {
            needle: Needle::new(encode("marker", "s").unwrap()).unwrap(),
            data: encode("MARKER", "s").unwrap(),
            filter: filter.clone(),
        };
        let summary = ops::replace::run(&memory, &replace, &mut Vec::new()).unwrap();
        assert_eq!(summary.replaced, vec![0x55d4c8a00002, 0x55d4c8a0000c]);

        let search = SearchOptions {
            filter,
            ..SearchOptions::new(replace.needle.clone())
        };
        let found = ops::search::run(&memory, &search, &mut Vec::new()).unwrap();
        assert!(found.matches.is_empty());

        // other regions are untouched
        let range: AddressRange = "7f2b1c001002:+6".parse().unwrap();
        assert_eq!(memory.read_range(&range).unwrap(), b"marker");
    }
}
