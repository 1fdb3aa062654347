// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Config layering --> Command Dispatch
//!   Run | Plan | Projects | Options | Files | Version
//! ```

use std::process::ExitCode;

use crossver::cli::global::GlobalOptions;
use crossver::cli::{self, Command};
use crossver::cmd::config::{run_files_command, run_options_command};
use crossver::cmd::cross::{run_plan_command, run_run_command};
use crossver::cmd::projects::run_projects_command;
use crossver::config::loader::ConfigLoader;
use crossver::config::{CONFIG_FILE, Config, ENV_PREFIX};
use crossver::logging::init_logging;
use crossver::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let log_config = build_log_config(&cli.global);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli).await
}

fn build_log_config(global: &GlobalOptions) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(cli: &cli::Cli) -> ExitCode {
    let root = cli.global.root_dir();
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => {
            load_config(&cli.global).map(|config| run_options_command(&config))
        }
        Some(Command::Files) => build_config_loader(&cli.global).map(|loader| {
            run_files_command(&loader.format_loaded_files());
        }),
        Some(Command::Run(args)) => match load_config(&cli.global) {
            Ok(config) => run_run_command(args, &config, &root).await,
            Err(e) => Err(e),
        },
        Some(Command::Plan(args)) => {
            load_config(&cli.global).and_then(|config| run_plan_command(args, &config, &root))
        }
        Some(Command::Projects(args)) => {
            load_config(&cli.global).and_then(|config| run_projects_command(args, &config, &root))
        }
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> crossver::error::Result<ConfigLoader> {
    let mut loader = ConfigLoader::new().add_toml_file_optional(global.root_dir().join(CONFIG_FILE));
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    let mut loader = loader.with_env_prefix(ENV_PREFIX);
    for option in global.to_config_overrides() {
        loader = loader.set_option(&option)?;
    }
    Ok(loader)
}

fn load_config(global: &GlobalOptions) -> crossver::error::Result<Config> {
    build_config_loader(global)?.build().map_err(|e| {
        eprintln!("Failed to load config: {e}");
        e
    })
}
