//! Byte pattern search over memory snapshots.
//!
//! Matches may overlap: after a hit at offset `i` scanning resumes at
//! `i + 1`, so searching `aa` in `aaaa` reports 0, 1 and 2.

use std::ops::Deref;

use crate::error::{Error, Result};

/// A non-empty search pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Needle(Vec<u8>);

impl Needle {
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::EmptyNeedle);
        }
        Ok(Self(bytes))
    }
}

impl Deref for Needle {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

/// Find all occurrences of `needle` in `haystack`.
///
/// Returns the byte offsets where the needle starts, in ascending order.
///
/// # Example
///
/// ```
/// use procmem_core::search::{Needle, search};
///
/// let needle = Needle::new(vec![0xaa]).unwrap();
/// assert_eq!(search(&needle, &[0xaa, 0xaa, 0xaa]), vec![0, 1, 2]);
/// ```
pub fn search(needle: &Needle, haystack: &[u8]) -> Vec<usize> {
    let mut results = Vec::new();
    let mut cur = 0;
    while let Some(i) = find_from(needle, haystack, cur) {
        results.push(i);
        cur = i + 1;
    }
    results
}

/// Find the first occurrence of `needle` at or after `start`.
pub fn find_from(needle: &Needle, haystack: &[u8], start: usize) -> Option<usize> {
    let tail = haystack.get(start..)?;
    if needle.len() > tail.len() {
        return None;
    }
    let first = needle[0];
    let mut pos = 0;
    while pos + needle.len() <= tail.len() {
        // Jump to the next candidate first byte before comparing the window.
        let skip = tail[pos..=tail.len() - needle.len()]
            .iter()
            .position(|&b| b == first)?;
        pos += skip;
        if &tail[pos..pos + needle.len()] == needle.deref() {
            return Some(start + pos);
        }
        pos += 1;
    }
    None
}
