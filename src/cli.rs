//! CLI definitions using clap derive API
//!
//! A single binary with two entry modes: the interactive wizard (default) and
//! silent mode (`--silent`), driven entirely by flags and an optional JSON
//! config file.

use clap::Parser;
use clap::builder::{Styles, styling::AnsiColor};
use std::path::PathBuf;

/// Minecraft Server Wrapper installer
#[derive(Parser, Debug, Clone)]
#[command(
    name = "mcwrap-installer",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Installer for Minecraft Server Wrapper",
    long_about = "Installs the Minecraft Server Wrapper web-based management tool. \
                  Run without flags for the interactive wizard, or with --silent for \
                  unattended installation driven by flags and an optional JSON config file.",
    after_help = "Examples:\n   \
                  mcwrap-installer                                   # interactive wizard\n   \
                  mcwrap-installer -S -a                             # silent, default path\n   \
                  mcwrap-installer -S -a -p ~/mcwrap --no-service    # silent, custom path\n   \
                  mcwrap-installer -S -c install.json                # silent, config file\n"
)]
pub struct Cli {
    /// Run in silent (unattended) mode
    #[arg(long, short = 'S')]
    pub silent: bool,

    /// Installation directory path
    #[arg(long, short = 'p', value_name = "PATH")]
    pub install_path: Option<PathBuf>,

    /// Accept the license agreement
    #[arg(long, short = 'a')]
    pub accept_license: bool,

    /// Skip system service staging
    #[arg(long)]
    pub no_service: bool,

    /// Skip desktop shortcut creation
    #[arg(long)]
    pub no_shortcuts: bool,

    /// Include example configurations
    #[arg(long)]
    pub include_examples: bool,

    /// JSON configuration file for installation settings
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Directory holding the payload file set (defaults to the current directory)
    #[arg(long, value_name = "DIR", hide = true, env = "MCWRAP_PAYLOAD_DIR")]
    pub payload_dir: Option<PathBuf>,
}
