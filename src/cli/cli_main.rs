use crate::settings::DEFAULT_CONFIG_FILE;
use crate::simulation::process_configuration_file;
use clap::{ArgAction, Parser};
use log::{LevelFilter, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::error::Error;
use std::path::PathBuf;

/// Crank-Nicolson heat solver checked against the analytical solution
#[derive(Debug, Parser)]
#[command(name = "pdekit", version, about)]
pub struct Cli {
    /// INI (or .json) file with [settings] and [paths] sections
    #[arg(value_name = "CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: PathBuf,

    /// Log per-step detail
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    pub verbose: bool,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

pub fn init_logger(level: LevelFilter) {
    // a second initialisation (e.g. from tests) is harmless
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
}

pub fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    init_logger(cli.log_level());
    info!("reading configuration from {}", cli.config_file.display());
    let report = process_configuration_file(&cli.config_file)?;
    report.print_table();
    Ok(())
}
