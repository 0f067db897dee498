mod cli;
mod cli_utils;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging (warn unless RUST_LOG says otherwise)
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("procmem=warn,procmem_core=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let suspend = args.suspend;
    match args.command {
        Command::Info {
            raw,
            verbose,
            json,
            filter,
            process,
        } => commands::info::run(&process, suspend, raw, verbose, json, filter.into()),
        Command::Read {
            range,
            output,
            split,
            sparse,
            width,
            filter,
            process,
        } => commands::read::run(
            &process,
            suspend,
            procmem_core::ops::ReadOptions {
                range,
                filter: filter.into(),
                output,
                split,
                sparse,
                width,
            },
        ),
        Command::Write {
            address,
            type_spec,
            process,
            data,
        } => commands::write::run(&process, suspend, address, type_spec, &data),
        Command::Search {
            type_spec,
            context,
            after_context,
            before_context,
            width,
            filter,
            process,
            needle,
        } => commands::search::run(
            &process,
            suspend,
            &needle,
            type_spec,
            commands::search::Context {
                context,
                before: before_context,
                after: after_context,
                width,
            },
            filter.into(),
        ),
        Command::Replace {
            type_spec,
            filter,
            process,
            needle,
            data,
        } => commands::replace::run(&process, suspend, &needle, &data, type_spec, filter.into()),
        Command::Watch {
            range,
            width,
            interval,
            process,
        } => commands::watch::run(&process, suspend, range, width, interval),
        Command::Statm { process } => commands::statm::run(&process),
    }
}
