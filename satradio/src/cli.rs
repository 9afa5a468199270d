//! Command-line surface (spec §6): `satradio [-v|--version] -c|--config
//! <file> [-V|--verbose]`.
//!
//! Clap's derive macro assigns `-V` to `--version` by default, which
//! collides with this spec's `-V` for `--verbose`; `version` is disabled on
//! the `command` attribute and re-added explicitly under `-v` instead.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Debug, Parser)]
#[command(name = "satradio", about = "Software transmitter for a satellite radio multiplex", disable_version_flag = true)]
pub struct Args {
    /// Path to the TOML configuration file (mandatory).
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: PathBuf,

    /// Raise the default log level to `info` regardless of `RUST_LOG`.
    #[arg(short = 'V', long = "verbose")]
    pub verbose: bool,

    /// Print the version and exit.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: (),
}
