//! Command execution for the `modproxy` CLI.
//!
//! Commands write their results to the supplied writer; diagnostics go
//! through `log`. Nothing here touches the process environment directly,
//! so `main` passes in the `MODPROXY_URL` value it read.

use std::io::Write;

use log::{debug, info};
use modproxy::identity::{self, ModuleIdentity};
use modproxy::{ArchiveHandle, EscapeError, ProxyClient, ProxyConfig, ResourceKind};

use crate::cli::{CatArgs, Cli, Command, EscapeArgs, GlobalArgs, InfoArgs, ZipArgs};
use crate::error::Result;
use crate::output::{ArchiveListing, entry_line, info_line};

/// Runs the parsed command, writing its output to `stdout`.
///
/// # Errors
///
/// Returns the first configuration, proxy, archive, or write failure.
pub fn run(cli: &Cli, env_url: Option<&str>, stdout: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Command::Info(args) => run_info(&cli.global, env_url, args, stdout),
        Command::Zip(args) => run_zip(&cli.global, env_url, args, stdout),
        Command::Cat(args) => run_cat(&cli.global, env_url, args, stdout),
        Command::Escape(args) => run_escape(args, stdout),
        Command::Unescape(args) => run_unescape(args, stdout),
    }
}

/// Resolves the effective configuration.
///
/// Precedence, highest first: `--proxy`/`--timeout`, the `MODPROXY_URL`
/// value, the `--config` file, built-in defaults.
///
/// # Errors
///
/// Returns a configuration error when the `--config` file cannot be loaded.
pub fn resolve_config(global: &GlobalArgs, env_url: Option<&str>) -> Result<ProxyConfig> {
    let file_config = match &global.config {
        Some(path) => ProxyConfig::load_from(path)?,
        None => ProxyConfig::default(),
    };

    let config = file_config
        .with_proxy_url(env_url)
        .with_proxy_url(global.proxy.as_deref())
        .with_timeout_secs(global.timeout);
    debug!(
        "using proxy {} (timeout {:?})",
        config.proxy_url(),
        config.timeout()
    );
    Ok(config)
}

fn client_for(global: &GlobalArgs, env_url: Option<&str>) -> Result<ProxyClient> {
    let config = resolve_config(global, env_url)?;
    Ok(config.build_client()?)
}

fn run_info(
    global: &GlobalArgs,
    env_url: Option<&str>,
    args: &InfoArgs,
    stdout: &mut dyn Write,
) -> Result<()> {
    let client = client_for(global, env_url)?;
    let info = client.get_info(&args.module.path, &args.module.version)?;

    if args.json {
        serde_json::to_writer_pretty(&mut *stdout, &info)?;
        writeln!(stdout)?;
    } else {
        writeln!(stdout, "{}", info_line(&info))?;
    }
    Ok(())
}

fn run_zip(
    global: &GlobalArgs,
    env_url: Option<&str>,
    args: &ZipArgs,
    stdout: &mut dyn Write,
) -> Result<()> {
    let module = ModuleIdentity::new(&args.module.path, &args.module.version)?;
    let client = client_for(global, env_url)?;
    let url = client.url_for(&module, ResourceKind::Zip);
    let archive = client.get_zip_for(&module)?;
    info!("{url}: {} entries", archive.len());

    if args.json {
        let listing = ArchiveListing::new(&url, archive.entries());
        serde_json::to_writer_pretty(&mut *stdout, &listing)?;
        writeln!(stdout)?;
    } else {
        for entry in archive.entries() {
            writeln!(stdout, "{}", entry_line(entry))?;
        }
    }
    Ok(())
}

fn run_cat(
    global: &GlobalArgs,
    env_url: Option<&str>,
    args: &CatArgs,
    stdout: &mut dyn Write,
) -> Result<()> {
    let module = ModuleIdentity::new(&args.module.path, &args.module.version)?;
    let client = client_for(global, env_url)?;
    let mut archive = client.get_zip_for(&module)?;

    let name = resolve_entry_name(&archive, &module, &args.entry);
    let contents = archive.read(&name)?;
    stdout.write_all(&contents)?;
    stdout.flush()?;
    Ok(())
}

/// Picks the archive entry `requested` refers to.
///
/// Exact names win; otherwise the name is taken as relative to the module
/// root. Missing entries are reported by the subsequent read.
fn resolve_entry_name(archive: &ArchiveHandle, module: &ModuleIdentity, requested: &str) -> String {
    if archive.contains(requested) {
        return requested.to_owned();
    }
    let rooted = format!(
        "{}{}",
        module.archive_root(),
        requested.trim_start_matches('/')
    );
    debug!("{requested:?} is not an entry; trying {rooted:?}");
    rooted
}

fn run_escape(args: &EscapeArgs, stdout: &mut dyn Write) -> Result<()> {
    write_transformed(args, identity::encode, stdout)
}

fn run_unescape(args: &EscapeArgs, stdout: &mut dyn Write) -> Result<()> {
    write_transformed(args, identity::decode, stdout)
}

/// Applies `transform` to the path and optional version, one per line.
///
/// Both are checked before anything is written.
fn write_transformed(
    args: &EscapeArgs,
    transform: fn(&str) -> std::result::Result<String, EscapeError>,
    stdout: &mut dyn Write,
) -> Result<()> {
    let path = transform(&args.path)?;
    let version = args.version.as_deref().map(transform).transpose()?;

    writeln!(stdout, "{path}")?;
    if let Some(version) = version {
        writeln!(stdout, "{version}")?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
