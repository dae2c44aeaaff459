#![allow(non_snake_case)]
use PDEKit::cli::cli_main::{Cli, run};
use clap::Parser;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    run(&cli)
}
