use crate::config::maps::UNREADABLE_PSEUDO_REGIONS;
use crate::region::MemoryRegion;

/// Predicate set selecting regions for an operation.
///
/// All predicates must hold for a region to be kept. `[vvar]` and
/// `[vsyscall]` are dropped unless `no_default_filter` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionFilter {
    pub no_default_filter: bool,
    /// Minimum region length in bytes.
    pub min_size: Option<u64>,
    pub writable_only: bool,
    /// Exact pathname to match.
    pub pathname: Option<String>,
}

impl RegionFilter {
    pub fn matches(&self, region: &MemoryRegion) -> bool {
        if !self.no_default_filter && UNREADABLE_PSEUDO_REGIONS.contains(&region.pathname()) {
            return false;
        }
        if let Some(min_size) = self.min_size
            && region.length() < min_size
        {
            return false;
        }
        if self.writable_only && !region.writable() {
            return false;
        }
        if let Some(pathname) = &self.pathname
            && region.pathname() != pathname
        {
            return false;
        }
        true
    }

    /// Keep the regions matching every predicate, preserving order.
    pub fn apply<'a, I>(&self, regions: I) -> Vec<&'a MemoryRegion>
    where
        I: IntoIterator<Item = &'a MemoryRegion>,
    {
        regions.into_iter().filter(|r| self.matches(r)).collect()
    }
}
