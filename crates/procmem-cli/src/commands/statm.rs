use anyhow::Result;
use procmem_core::{Statm, resolve_pid};

pub fn run(process: &str) -> Result<()> {
    let pid = resolve_pid(process)?;
    println!("{}", Statm::from_pid(pid)?);
    Ok(())
}
