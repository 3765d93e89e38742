//! Enum sync check CLI
//!
//! Compares the enums of the JSON-LD profile against the enum_lists term
//! files and prints every discrepancy.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use datacite_convert::{run_sync_check, SyncOptions};

#[derive(Parser)]
#[command(name = "enum-sync-check")]
#[command(about = "Check that profile enums match the enum_lists term files")]
#[command(version)]
struct Cli {
    /// Profile holding the `$defs` enums and iriMaps
    #[arg(long, default_value = "docs/datacite4.6-profile.json")]
    profile: PathBuf,

    /// Directory of per-vocabulary JSON-LD term files
    #[arg(long, default_value = "docs/enum_lists")]
    enum_dir: PathBuf,

    /// Base URL every iriMap value must start with
    #[arg(long)]
    expected_base: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut options = SyncOptions::default();
    if let Some(base) = cli.expected_base {
        options.expected_base = base;
    }

    let report = match run_sync_check(&cli.profile, &cli.enum_dir, &options) {
        Ok(report) => report,
        Err(e) => {
            println!("ERROR: {}", e);
            process::exit(1);
        }
    };

    if report.is_consistent() {
        println!(
            "Sync check passed: {} enums match iriMaps and enum_lists files.",
            report.checked
        );
        return;
    }

    println!("Sync check FAILED:");
    for discrepancy in &report.discrepancies {
        println!(" -  {}", discrepancy);
    }
    process::exit(1);
}
