//! sitefs binary
//!
//! Inspect how a site's logical paths map onto storage.
//!
//! ## Usage
//!
//! ```bash
//! sitefs --config sites.ron resolve "Default Web Site" /app1/docs/guide.md
//! sitefs --config sites.ron classify 1 /app1
//! sitefs --config sites.ron mounts 1 /
//! sitefs --config sites.ron describe 1 /app1/docs
//! sitefs --config sites.ron check
//! ```
//!
//! Output is JSON on stdout. Exit status is 0 on success, 2 when the path
//! does not resolve, 1 on any error. Set `RUST_LOG` for diagnostics on
//! stderr.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use sitefs_kernel::{LocalProbe, Site, SiteResolver, SitesConfig, load_sites_config};
use tracing_subscriber::{EnvFilter, fmt};

use commands::Report;

/// Resolve and classify logical paths of hosted sites.
#[derive(Parser, Debug)]
#[command(name = "sitefs")]
#[command(about = "Resolve and classify logical paths of hosted sites")]
struct Args {
    /// Site configuration file (RON)
    #[arg(long, global = true, env = "SITEFS_CONFIG")]
    config: Option<PathBuf>,

    /// Refuse to probe storage outside this directory
    #[arg(long, global = true)]
    confine: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the application, vdir and physical path a logical path maps to
    Resolve { site: String, path: String },
    /// Report whether a logical path is a file, directory or vdir
    Classify { site: String, path: String },
    /// List the vdirs visible as children of a logical directory
    Mounts { site: String, path: String },
    /// Describe a node and its parent
    Describe { site: String, path: String },
    /// Validate the configuration and summarize each site
    Check,
}

fn main() -> ExitCode {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(report) => match serde_json::to_string_pretty(&report.body) {
            Ok(json) => {
                println!("{json}");
                if report.found {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(2)
                }
            }
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<Report> {
    let config_path = args
        .config
        .as_deref()
        .ok_or_else(|| anyhow!("no configuration file: pass --config or set SITEFS_CONFIG"))?;
    let config = load_sites_config(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let probe = match &args.confine {
        Some(root) => LocalProbe::confined(root),
        None => LocalProbe::new(),
    };
    let resolver = SiteResolver::new(probe);

    match &args.command {
        Command::Resolve { site, path } => commands::resolve(&resolver, find_site(&config, site)?, path),
        Command::Classify { site, path } => commands::classify(&resolver, find_site(&config, site)?, path),
        Command::Mounts { site, path } => commands::mounts(find_site(&config, site)?, path),
        Command::Describe { site, path } => commands::describe(&resolver, find_site(&config, site)?, path),
        Command::Check => commands::check(&resolver, &config),
    }
}

fn find_site<'a>(config: &'a SitesConfig, key: &str) -> Result<&'a Site> {
    config
        .find_site(key)
        .ok_or_else(|| anyhow!("unknown site '{key}'"))
}
