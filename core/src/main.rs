use clap::Parser;
use log::{error, info};
use sdmscan_core::cli::report::{write_csv_reports, TextReport};
use sdmscan_core::cli::{Cli, OutputFormat};
use sdmscan_core::{inventory_archive, DicomFileReader, ExamInventory, Result};
use std::process;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let inventories = inventory_archive(&cli.config(), &DicomFileReader)?;
    info!("Inventoried {} exams", inventories.len());

    match cli.format {
        OutputFormat::Text => {
            for inventory in &inventories {
                println!("{}", TextReport::new(inventory));
            }
        }
        OutputFormat::Csv => {
            let output_dir = cli.output_dir();
            write_csv_reports(&inventories, &output_dir)?;
            print_summary(&inventories);
        }
        OutputFormat::Json => output_json(&inventories)?,
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

fn print_summary(inventories: &[ExamInventory]) {
    for inventory in inventories {
        let status = if inventory.listmode_complete() {
            "complete"
        } else {
            "INCOMPLETE"
        };
        println!(
            "{:<10} {:<8} {:<8} {:>3} series {:>3} listmode  {}",
            inventory.exam.sheet_name(),
            inventory.exam.patient_dir,
            inventory.exam.exam_dir,
            inventory.series.len(),
            inventory.listmode.len(),
            status
        );
    }
}

#[cfg(feature = "json")]
fn output_json(inventories: &[ExamInventory]) -> Result<()> {
    let json = serde_json::to_string_pretty(inventories)
        .map_err(|e| sdmscan_core::SdmError::ExtractionError(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

#[cfg(not(feature = "json"))]
fn output_json(_inventories: &[ExamInventory]) -> Result<()> {
    Err(sdmscan_core::SdmError::InvalidValue(
        "JSON output requires the 'json' feature (rebuild with: cargo build --features json)"
            .to_string(),
    ))
}
