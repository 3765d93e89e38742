//! JSON-LD SKOS crosswalk to JSKOS mappings CLI

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use datacite_convert::jskos::convert_file;
use datacite_convert::{write_ndjson, JskosError, JskosOptions};

#[derive(Parser)]
#[command(name = "jskos-mappings")]
#[command(about = "Convert SKOS mapping relations in a JSON-LD graph to JSKOS NDJSON")]
#[command(version)]
struct Cli {
    /// JSON-LD crosswalk to read
    #[arg(default_value = "SKOScrosswalk.jsonld")]
    input: PathBuf,

    /// NDJSON file to write
    #[arg(default_value = "jskos-mappings.ndjson")]
    output: PathBuf,
}

fn run(cli: Cli) -> Result<(), JskosError> {
    let result = convert_file(&cli.input, &JskosOptions::default())?;

    let writer = BufWriter::new(File::create(&cli.output)?);
    write_ndjson(writer, &result.mappings)?;

    eprintln!(
        "Wrote {} mappings to {}",
        result.mappings.len(),
        cli.output.display()
    );
    Ok(())
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
