//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `molasse_core` linkage.
//! - Run the pure lab computations from a terminal without the Flutter host.

use clap::{Parser, Subcommand};
use molasse_core::{
    chemical_index_of_alteration, ingest_file, AgeCollection, CompositionSample, GeochemData,
    PlotLayout, TernaryPlot,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "molasse", version, about = "Molasse Mentor lab toolbox")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalize a Q/F/L sample and place it on the ternary canvas.
    #[command(allow_negative_numbers = true)]
    Qfl { q: f64, f: f64, l: f64 },
    /// Chemical Index of Alteration from major oxides (wt%).
    #[command(allow_negative_numbers = true)]
    Cia {
        al2o3: f64,
        cao: f64,
        na2o: f64,
        k2o: f64,
    },
    /// Ingest a `.json` or `.csv` geochronology file.
    Ages { file: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        None => {
            println!("molasse_core ping={}", molasse_core::ping());
            println!("molasse_core version={}", molasse_core::core_version());
        }
        Some(Command::Qfl { q, f, l }) => {
            let plot = TernaryPlot::compute(&CompositionSample::new(q, f, l), &PlotLayout::default());
            println!("{}", plot.normalized.summary());
            match plot.point {
                Some(point) => println!("point x={:.2} y={:.2}", point.x, point.y),
                None => println!("point none"),
            }
        }
        Some(Command::Cia {
            al2o3,
            cao,
            na2o,
            k2o,
        }) => {
            let cia = chemical_index_of_alteration(&GeochemData::from_oxides(al2o3, cao, na2o, k2o));
            println!("CIA={cia:.2}");
        }
        Some(Command::Ages { file }) => {
            let report = match ingest_file(&file) {
                Ok(report) => report,
                Err(err) => {
                    eprintln!("error: {}: {err}", file.display());
                    return ExitCode::FAILURE;
                }
            };
            for record in &report.records {
                println!(
                    "{}\t{}\t{}\t{}",
                    record.mineral_label(),
                    record.method.map(|m| m.label()).unwrap_or("-"),
                    record.age,
                    record.error
                );
            }
            for skipped in &report.skipped {
                eprintln!("skipped row {}: {}", skipped.position, skipped.reason);
            }
            println!(
                "accepted={} skipped={}",
                report.accepted_count(),
                report.skipped_count()
            );
            if let Some(summary) = AgeCollection::from_records(report.records).summary() {
                println!("{}", summary.preview());
            }
        }
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_has_no_subcommand() {
        let cli = Cli::try_parse_from(["molasse"]).expect("cli should parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn qfl_accepts_negative_components() {
        let cli = Cli::try_parse_from(["molasse", "qfl", "-5", "50", "50"]).expect("cli should parse");
        assert!(matches!(
            cli.command,
            Some(Command::Qfl { q, .. }) if q == -5.0
        ));
    }
}
