//! DataCite XML to JSON CLI
//!
//! Converts one DataCite XML file into the DataCite JSON envelope.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use datacite_convert::{convert_file, to_json_string, ConvertError, ConvertOptions};

#[derive(Parser)]
#[command(name = "datacite-json")]
#[command(about = "Convert a DataCite XML record to DataCite JSON")]
#[command(version)]
struct Cli {
    /// Path to the DataCite XML file
    xml_file: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Write output to file or stdout
fn write_output(content: &str, output: Option<&PathBuf>) -> Result<(), ConvertError> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            eprintln!("Wrote DataCite JSON to {}", path.display());
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), ConvertError> {
    let result = convert_file(&cli.xml_file, &ConvertOptions::default())?;

    tracing::info!(
        "Converted {} ({} bytes, {} attributes)",
        cli.xml_file.display(),
        result.stats.source_bytes,
        result.stats.attributes
    );

    let mut output = to_json_string(&result, true)?;
    output.push('\n');
    write_output(&output, cli.output.as_ref())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
