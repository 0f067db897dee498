//! Process id resolution.
//!
//! A target is given either as a numeric pid, as `self`, or as a process
//! name which must match exactly one running process.

use std::fs;

use tracing::debug;

use crate::error::{Error, Result};
use crate::process::proc_path;

/// Resolve a pid, `self`, or a process name to a single pid.
pub fn resolve_pid(target: &str) -> Result<u32> {
    let target = target.trim();
    if target == "self" {
        return Ok(std::process::id());
    }
    if let Ok(pid) = target.parse::<u32>() {
        return Ok(pid);
    }

    let pids = find_pids_by_name(target)?;
    debug!("Process name '{}' matched pids {:?}", target, pids);
    select_pid(target, pids)
}

/// Pick the single pid out of a name lookup result.
pub fn select_pid(name: &str, mut pids: Vec<u32>) -> Result<u32> {
    match pids.len() {
        0 => Err(Error::ProcessNotFound(name.to_string())),
        1 => Ok(pids.remove(0)),
        _ => Err(Error::AmbiguousProcess {
            name: name.to_string(),
            pids,
        }),
    }
}

/// All running processes whose command name or executable file name is `name`.
pub fn find_pids_by_name(name: &str) -> Result<Vec<u32>> {
    let mut pids = Vec::new();

    for entry in fs::read_dir("/proc")? {
        let Ok(entry) = entry else {
            continue;
        };
        let Some(pid) = entry
            .file_name()
            .to_str()
            .and_then(|s| s.parse::<u32>().ok())
        else {
            continue;
        };

        if process_matches(pid, name) {
            pids.push(pid);
        }
    }

    pids.sort_unstable();
    Ok(pids)
}

fn process_matches(pid: u32, name: &str) -> bool {
    // Processes may exit while we scan; unreadable entries simply don't match.
    let comm_matches = fs::read_to_string(proc_path(pid, "comm"))
        .map(|comm| comm.trim_end_matches('\n') == name)
        .unwrap_or(false);
    if comm_matches {
        return true;
    }

    fs::read_link(proc_path(pid, "exe"))
        .ok()
        .and_then(|exe| exe.file_name().map(|f| f == name))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_numeric() {
        assert_eq!(resolve_pid("1234").unwrap(), 1234);
        assert_eq!(resolve_pid(" 42 ").unwrap(), 42);
    }

    #[test]
    fn test_resolve_self() {
        assert_eq!(resolve_pid("self").unwrap(), std::process::id());
    }

    #[test]
    fn test_select_pid() {
        assert_eq!(select_pid("a", vec![7]).unwrap(), 7);
        assert!(matches!(select_pid("a", vec![]), Err(Error::ProcessNotFound(_))));
        match select_pid("a", vec![3, 9]) {
            Err(Error::AmbiguousProcess { name, pids }) => {
                assert_eq!(name, "a");
                assert_eq!(pids, vec![3, 9]);
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_find_own_process_by_exe_name() {
        let exe = std::env::current_exe().unwrap();
        let name = exe.file_name().unwrap().to_str().unwrap();
        let pids = find_pids_by_name(name).unwrap();
        assert!(pids.contains(&std::process::id()));
    }

    #[test]
    fn test_unknown_name() {
        let result = resolve_pid("no-such-process-procmem-test");
        assert!(matches!(result, Err(Error::ProcessNotFound(_))));
    }
}
