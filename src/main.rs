//! Minecraft Server Wrapper installer
//!
//! Installs the web-based Minecraft server management application either
//! through an interactive wizard or fully unattended with `--silent`.
//! Both front ends drive the same installation pipeline; only the way
//! decisions are gathered differs.

use clap::Parser;

mod cli;
mod domain;
mod error;
mod manifest;
mod operator;
mod pipeline;
mod plan;
mod policy;
mod progress;
mod record;
mod silent;
mod wizard;

use cli::Cli;

pub const APP_NAME: &str = "Minecraft Server Wrapper";
pub const APP_VERSION: &str = "1.0.0";

fn main() {
    let cli = Cli::parse();

    let result = if cli.silent {
        silent::run(&cli)
    } else {
        wizard::run(&cli)
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
