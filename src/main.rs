use std::path::PathBuf;

use clap::{Parser, Subcommand};
use itertools::Itertools;
use lapsplit::{AppConfig, LapSegmenter, LapsplitError, Run, writer};
use log::{info, warn};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split one or more sessions into laps, sectors and microsectors
    Segment {
        /// Telemetry CSV files, appended to each other in the given order
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        #[arg(short, long)]
        driver: Option<String>,

        /// Config file to use instead of the one in the user config directory
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write one JSON line per lap to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn load_config(config: Option<&PathBuf>) -> Result<AppConfig, LapsplitError> {
    match config {
        Some(path) => AppConfig::from_file(path),
        None => match AppConfig::from_local_file() {
            Ok(local) => Ok(local.unwrap_or_default()),
            Err(e) => {
                warn!("Ignoring local config: {}", e);
                Ok(AppConfig::default())
            }
        },
    }
}

fn segment(
    input: &[PathBuf],
    driver: Option<&String>,
    config: Option<&PathBuf>,
    output: Option<&PathBuf>,
) -> Result<(), LapsplitError> {
    let app_config = load_config(config)?;
    let driver = driver.unwrap_or(&app_config.driver);
    let segmenter = LapSegmenter::new(app_config.segmentation.clone());

    let mut run = Run::default();
    for path in input {
        run = run + Run::from_csv(path, driver, &segmenter)?;
    }

    for lap in &run.laps {
        info!(
            "{} sectors: [{}], {} microsectors",
            lap,
            lap.sectors().iter().map(|s| format!("{:.3}", s.time)).join(", "),
            lap.microsectors().len()
        );
        for anomaly in lap.anomalies() {
            warn!("Lap {}: {}", lap.number, anomaly);
        }
    }

    if let Some(output_file) = output {
        writer::write_laps(output_file, &run.laps)?;
        info!("Wrote {} laps to {:?}", run.laps.len(), output_file);
    }
    Ok(())
}

fn main() {
    colog::init();

    let cli = Args::parse();
    match &cli.command {
        Commands::Segment {
            input,
            driver,
            config,
            output,
        } => {
            if let Err(e) = segment(input, driver.as_ref(), config.as_ref(), output.as_ref()) {
                eprintln!("Error while segmenting telemetry: {}", e);
                std::process::exit(1);
            }
        }
    };
}
