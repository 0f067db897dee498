//! Needle search across the selected regions.

use std::io::Write;

use crate::config::hexdump::DEFAULT_WIDTH;
use crate::error::Result;
use crate::hexdump::write_hex;
use crate::process::ProcessMemory;
use crate::region::RegionFilter;
use crate::search::{Needle, search};

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub needle: Needle,
    pub filter: RegionFilter,
    /// Bytes of context shown on both sides of a match.
    pub context: usize,
    /// Overrides `context` before the match.
    pub before_context: Option<usize>,
    /// Overrides `context` after the match.
    pub after_context: Option<usize>,
    pub width: usize,
}

impl SearchOptions {
    pub fn new(needle: Needle) -> Self {
        Self {
            needle,
            filter: RegionFilter::default(),
            context: 0,
            before_context: None,
            after_context: None,
            width: DEFAULT_WIDTH,
        }
    }

    fn context_span(&self) -> (usize, usize) {
        (
            self.before_context.unwrap_or(self.context),
            self.after_context.unwrap_or(self.context),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSummary {
    /// Absolute addresses of every match, in region order.
    pub matches: Vec<u64>,
    pub failed: usize,
}

pub fn run<M, W>(memory: &M, options: &SearchOptions, out: &mut W) -> Result<SearchSummary>
where
    M: ProcessMemory + ?Sized,
    W: Write,
{
    let regions = super::selected_regions(memory, &options.filter)?;
    let (before, after) = options.context_span();
    let show_context = before > 0 || after > 0;

    let mut matches = Vec::new();
    let failed = super::for_each_region(memory, &regions, |region, haystack| {
        for offset in search(&options.needle, &haystack) {
            let addr = region.addr_beg() + offset as u64;
            writeln!(out, "found pattern at {:016x}", addr)?;
            if show_context {
                let start = offset.saturating_sub(before);
                let end = (offset + options.needle.len())
                    .saturating_add(after)
                    .min(haystack.len());
                write_hex(
                    out,
                    &haystack[start..end],
                    region.addr_beg() + start as u64,
                    options.width,
                )?;
                writeln!(out)?;
            }
            matches.push(addr);
        }
        Ok(())
    })?;

    Ok(SearchSummary { matches, failed })
}
