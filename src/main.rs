// CLI binary entry point for qovcheck
//
// Exit code 0 when the command passed, 1 on any failure or invalid input.

mod cli;

use anyhow::Context;
use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

use cli::{commands, Commands, Config, OutputFormatter};

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(config: &Config) -> anyhow::Result<bool> {
    let formatter = OutputFormatter::new(config.format, config.quiet);

    let passed = match &config.command {
        Commands::Check { file, max_chunks } => commands::command_check(file, *max_chunks, &formatter)
            .with_context(|| format!("checking {}", file.display()))?,
        Commands::Compare {
            file_a,
            file_b,
            label_a,
            label_b,
            max_chunks,
            require_valid,
        } => commands::command_compare(
            (file_a.as_path(), file_b.as_path()),
            (label_a.as_str(), label_b.as_str()),
            *max_chunks,
            *require_valid,
            &formatter,
        )
        .with_context(|| format!("comparing {} with {}", file_a.display(), file_b.display()))?,
        Commands::Batch { directory, pattern } => commands::command_batch(directory, pattern, &formatter)
            .with_context(|| format!("scanning {}", directory.display()))?,
        Commands::Sample { output, frames } => commands::command_sample(output, *frames, &formatter)
            .with_context(|| format!("writing {}", output.display()))?,
    };

    Ok(passed)
}

fn main() {
    let config = Config::parse();
    init_tracing(config.verbose);

    match run(&config) {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("✗ {:#}", e);
            process::exit(1);
        }
    }
}
