//! CLI argument definitions for the `modproxy` binary.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint so argument parsing can be tested directly.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Query a module proxy for version metadata and source archives.
#[derive(Parser, Debug)]
#[command(name = "modproxy")]
#[command(version, about)]
#[command(long_about = concat!(
    "Query a module proxy for version metadata and source archives.\n\n",
    "Module paths and versions are given exactly as they appear in import ",
    "paths; uppercase letters are escaped for the proxy automatically.\n\n",
    "The proxy is taken from --proxy, then the MODPROXY_URL environment ",
    "variable, then the proxy_url setting of the --config file, and finally ",
    "defaults to https://proxy.golang.org.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Show when a version was published:\n",
    "    $ modproxy info golang.org/x/text v0.3.0\n\n",
    "  List the files of a version:\n",
    "    $ modproxy zip github.com/BurntSushi/toml v0.3.1\n\n",
    "  Print one file:\n",
    "    $ modproxy cat github.com/BurntSushi/toml v0.3.1 README.md\n\n",
    "  Show the escaped form of a path:\n",
    "    $ modproxy escape github.com/Azure/go-autorest\n",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Module proxy base URL.
    #[arg(long, global = true, value_name = "URL")]
    pub proxy: Option<String>,

    /// Read settings from this TOML file.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds (0 disables it).
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the metadata of a module version.
    Info(InfoArgs),

    /// List the entries of a module version's archive.
    Zip(ZipArgs),

    /// Print one file from a module version's archive.
    Cat(CatArgs),

    /// Print the proxy-escaped form of a path and optional version.
    Escape(EscapeArgs),

    /// Reverse the proxy escaping of a path and optional version.
    Unescape(EscapeArgs),
}

/// A module path and version.
#[derive(Args, Debug, Clone)]
pub struct ModuleArgs {
    /// Module path, for example `github.com/BurntSushi/toml`.
    pub path: String,

    /// Module version, for example `v0.3.1`.
    pub version: String,
}

/// Arguments for the info command.
#[derive(Args, Debug, Clone)]
pub struct InfoArgs {
    /// The module version to describe.
    #[command(flatten)]
    pub module: ModuleArgs,

    /// Print the metadata as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the zip command.
#[derive(Args, Debug, Clone)]
pub struct ZipArgs {
    /// The module version whose archive to list.
    #[command(flatten)]
    pub module: ModuleArgs,

    /// Print the entries as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the cat command.
#[derive(Args, Debug, Clone)]
pub struct CatArgs {
    /// The module version to read from.
    #[command(flatten)]
    pub module: ModuleArgs,

    /// Entry name, either in full or relative to the module root.
    pub entry: String,
}

/// Arguments for the escape and unescape commands.
#[derive(Args, Debug, Clone)]
pub struct EscapeArgs {
    /// Module path.
    pub path: String,

    /// Optional version.
    pub version: Option<String>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
