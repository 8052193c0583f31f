//! Local shell-script step runner CLI.
//!
//! Loads a TOML run configuration and executes the configured scripts with a
//! rendered environment block and execute command. See [`shellstep::run`].

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use shellstep::config::load_config;
use shellstep::exit_codes;
use shellstep::logging::{self, Redactor};
use shellstep::run::run;
use shellstep::shared_state::FileSharedState;
use shellstep::ui::ConsoleUi;

#[derive(Parser)]
#[command(
    name = "shellstep",
    version,
    about = "Run local shell scripts with a rendered environment and command"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute the configured scripts.
    Run {
        /// Path to the run configuration (TOML).
        #[arg(short, long, default_value = "shellstep.toml")]
        config: PathBuf,
    },
    /// Check the configuration without executing anything.
    Validate {
        /// Path to the run configuration (TOML).
        #[arg(short, long, default_value = "shellstep.toml")]
        config: PathBuf,
    },
}

fn main() {
    logging::init();
    if let Err(err) = dispatch() {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::INVALID);
    }
}

fn dispatch() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run { config } => cmd_run(&config),
        Command::Validate { config } => cmd_validate(&config),
    }
}

fn cmd_run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let redactor = Redactor::new();
    let ui = ConsoleUi::new(redactor.clone());
    let store = FileSharedState::new();
    run(&config, &ui, &store, &redactor)?;
    Ok(())
}

fn cmd_validate(config_path: &Path) -> Result<()> {
    load_config(config_path)?;
    println!("configuration ok");
    Ok(())
}
