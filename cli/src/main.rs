//! `modproxy` CLI entrypoint.
//!
//! Parses arguments, installs logging, runs the requested command, and maps
//! failures onto the process exit status.

use clap::Parser;
use modproxy::PROXY_URL_ENV;
use modproxy_cli::cli::Cli;
use modproxy_cli::commands::run;
use modproxy_cli::error::{EXIT_OK, Result};
use modproxy_cli::logging::init_logging;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    if let Err(err) = init_logging(cli.global.verbosity, cli.global.quiet) {
        write_stderr_line(&mut stderr, format_args!("logging disabled: {err}"));
    }

    let env_url = std::env::var(PROXY_URL_ENV).ok();
    let mut stdout = std::io::stdout().lock();
    let run_result = run(&cli, env_url.as_deref(), &mut stdout);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != EXIT_OK {
        std::process::exit(exit_code);
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => EXIT_OK,
        Err(err) => {
            write_stderr_line(stderr, format_args!("modproxy: {err}"));
            err.exit_code()
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort reporting; ignore write failures.
    }
}
