use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chartspec::{ChartConfig, Frame, InputShape, PairSeries, SeriesInput};

#[derive(Parser, Debug)]
#[command(name = "chartspec")]
#[command(about = "Build renderer-ready chart specs from tabular data", long_about = None)]
struct Args {
    /// Path to a chart config JSON (kind, shape, field mapping, series styles).
    /// Omitted: a wide bar chart keyed on "category".
    config: Option<PathBuf>,

    /// Read a JSON array of records from stdin instead of CSV
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    // Load the chart config
    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str::<ChartConfig>(&text)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        }
        None => ChartConfig::default(),
    };

    // Read data from stdin in the shape the config announces
    let input = read_input(&config, args.json)?;

    // Normalize and assemble the spec
    let spec = config
        .into_builder(input)
        .build()
        .context("Failed to build chart spec")?;

    // Write spec JSON to stdout
    let json = spec.to_json().context("Failed to serialize chart spec")?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(json.as_bytes())
        .context("Failed to write spec to stdout")?;
    handle
        .write_all(b"\n")
        .context("Failed to write spec to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}

fn read_input(config: &ChartConfig, json: bool) -> Result<SeriesInput> {
    let stdin = io::stdin();
    match config.shape {
        InputShape::Multi => {
            // Multi data is always a JSON object of per-series pair arrays
            let series: PairSeries = serde_json::from_reader(stdin.lock())
                .context("Failed to parse multi-series JSON from stdin")?;
            Ok(SeriesInput::Multi(series))
        }
        shape => {
            let frame = if json {
                let mut text = String::new();
                stdin
                    .lock()
                    .read_to_string(&mut text)
                    .context("Failed to read JSON from stdin")?;
                let value: serde_json::Value =
                    serde_json::from_str(&text).context("Failed to parse JSON from stdin")?;
                Frame::from_json(&value).context("Failed to load records")?
            } else {
                Frame::from_csv(stdin.lock()).context("Failed to read CSV from stdin")?
            };
            Ok(match shape {
                InputShape::Pivoted => SeriesInput::pivoted(frame),
                _ => SeriesInput::wide(frame),
            })
        }
    }
}
