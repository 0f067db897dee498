//! Poll a range and print it whenever it changes.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use chrono::Local;
use tracing::debug;

use crate::config::hexdump::DEFAULT_WIDTH;
use crate::config::watch::POLL_INTERVAL;
use crate::error::Result;
use crate::hexdump::write_hex;
use crate::process::ProcessMemory;
use crate::range::AddressRange;

#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub range: AddressRange,
    pub width: usize,
    pub interval: Duration,
}

impl WatchOptions {
    pub fn new(range: AddressRange) -> Self {
        Self {
            range,
            width: DEFAULT_WIDTH,
            interval: POLL_INTERVAL,
        }
    }
}

/// Snapshot comparison state for one watched range.
pub struct Watcher<'m, M: ?Sized> {
    memory: &'m M,
    options: WatchOptions,
    previous: Option<Vec<u8>>,
}

impl<'m, M> Watcher<'m, M>
where
    M: ProcessMemory + ?Sized,
{
    pub fn new(memory: &'m M, options: WatchOptions) -> Self {
        Self {
            memory,
            options,
            previous: None,
        }
    }

    /// Take one snapshot; print it if it differs from the last one.
    ///
    /// The first snapshot always counts as a change.
    pub fn poll_once<W: Write>(&mut self, out: &mut W) -> Result<bool> {
        let current = self.memory.read_range(&self.options.range)?;
        if self.previous.as_ref() == Some(&current) {
            return Ok(false);
        }

        writeln!(
            out,
            "^-- change detected {} --",
            Local::now().format("%H:%M:%S%.3f")
        )?;
        write_hex(out, &current, self.options.range.start, self.options.width)?;
        out.flush()?;

        self.previous = Some(current);
        Ok(true)
    }

    /// Poll until `stop` is set. Returns the number of changes seen.
    pub fn run<W: Write>(&mut self, out: &mut W, stop: &AtomicBool) -> Result<usize> {
        let mut changes = 0;
        while !stop.load(Ordering::SeqCst) {
            if self.poll_once(out)? {
                changes += 1;
            }
            thread::sleep(self.options.interval);
        }
        debug!("Watch of {} stopped after {} changes", self.options.range, changes);
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::MockMemoryBuilder;

    #[test]
    fn test_poll_detects_changes() {
        let memory = MockMemoryBuilder::new()
            .region("1000-1010 rw-p 00000000 00:00 0", b"counter=1")
            .build();
        let options = WatchOptions::new("1000:+9".parse().unwrap());
        let mut watcher = Watcher::new(&memory, options);
        let mut out = Vec::new();

        assert!(watcher.poll_once(&mut out).unwrap());
        assert!(!watcher.poll_once(&mut out).unwrap());

        memory.write(0x1008, b"2").unwrap();
        assert!(watcher.poll_once(&mut out).unwrap());

        let text = String::from_utf8(out).unwrap();
        let headers = text
            .lines()
            .filter(|l| l.starts_with("^-- change detected"))
            .count();
        assert_eq!(headers, 2);
        assert!(text.contains("|counter=1"));
        assert!(text.contains("|counter=2"));
    }

    #[test]
    fn test_run_stops_when_flag_is_set() {
        let memory = MockMemoryBuilder::new()
            .region("1000-1010 rw-p 00000000 00:00 0", b"x")
            .build();
        let mut watcher = Watcher::new(&memory, WatchOptions::new("1000".parse().unwrap()));

        let stop = AtomicBool::new(true);
        let mut out = Vec::new();
        assert_eq!(watcher.run(&mut out, &stop).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_until_interrupted() {
        let memory = MockMemoryBuilder::new()
            .region("1000-1010 rw-p 00000000 00:00 0", b"steady")
            .build();
        let options = WatchOptions {
            interval: Duration::from_millis(5),
            ..WatchOptions::new("1000:+6".parse().unwrap())
        };
        let mut watcher = Watcher::new(&memory, options);
        let stop = AtomicBool::new(false);
        let mut out = Vec::new();

        let changes = thread::scope(|s| {
            s.spawn(|| {
                thread::sleep(Duration::from_millis(50));
                stop.store(true, Ordering::SeqCst);
            });
            watcher.run(&mut out, &stop).unwrap()
        });
        assert_eq!(changes, 1);
    }

    #[test]
    fn test_poll_propagates_read_errors() {
        let memory = MockMemoryBuilder::new()
            .failing_region("1000-1010 rw-p 00000000 00:00 0")
            .build();
        let mut watcher = Watcher::new(&memory, WatchOptions::new("1000:+4".parse().unwrap()));
        assert!(watcher.poll_once(&mut Vec::new()).is_err());
    }
}
