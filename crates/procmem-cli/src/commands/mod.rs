//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod info;
pub mod read;
pub mod replace;
pub mod search;
pub mod statm;
pub mod watch;
pub mod write;
