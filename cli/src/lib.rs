//! Command-line front end for the module proxy client.
//!
//! The `modproxy` binary queries a module proxy for version metadata and
//! source archives. This library exposes its pieces so they can be tested
//! without spawning the binary:
//!
//! - [`cli`]: clap argument definitions.
//! - [`commands`]: command execution and configuration resolution.
//! - [`error`]: the CLI error type and exit codes.
//! - [`logging`]: the stderr log subscriber.
//! - [`output`]: text and JSON renderings.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
