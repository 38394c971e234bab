//! Command-line interface entry point for `roadmap`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use semester_roadmap::config::Config;
use semester_roadmap::info;
use semester_roadmap::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};
use std::path::PathBuf;

fn main() {
    let args = Cli::parse();

    // Stored configuration is what `config` subcommands edit and save;
    // everything else runs with the CLI overrides applied on top
    let mut stored = Config::load();
    let defaults = Config::from_defaults();
    let config = stored.with_overrides(&args.to_config_overrides());

    // CLI flag wins over config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| config.logging.level.parse().ok())
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // File logging: CLI flag wins, otherwise config logging.file if set
    let config_log_path =
        (!config.logging.file.is_empty()).then(|| PathBuf::from(&config.logging.file));

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            info!("File logging initialized at: {display_path}");
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut stored, &defaults);
        }
        Command::Resolve {
            progress,
            context,
            json,
        } => {
            commands::resolve::run(progress, context.into(), json, &config);
        }
        Command::Student {
            input_file,
            context,
            lang,
            json,
        } => {
            commands::student::run(&input_file, context.into(), lang.into(), json, &config);
        }
        Command::Preview {
            input_file,
            progress,
            output,
            context,
            lang,
        } => {
            commands::preview::run(
                input_file.as_deref(),
                progress,
                output.as_deref(),
                context.into(),
                lang.into(),
                &config,
            );
        }
    }
}
