pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tripquote_core::config::{AppConfig, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "tripquote",
    about = "Tripquote quotation workspace CLI",
    long_about = "Price tour packages across three options, merge parsed vendor quotes, and commit per-person price lists.",
    after_help = "Examples:\n  tripquote init --workspace trip.json\n  tripquote reconcile --workspace trip.json --parsed vendor.json --rate 2.5\n  tripquote quote --workspace trip.json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Create a workspace file seeded with the configured defaults")]
    Init {
        #[arg(long, default_value = "tripquote.json")]
        workspace: PathBuf,
        #[arg(long, help = "Overwrite an existing workspace file")]
        force: bool,
    },
    #[command(about = "Run the three-option calculation and print totals with trace steps")]
    Calculate {
        #[arg(long, default_value = "tripquote.json")]
        workspace: PathBuf,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Commit the calculation to a per-person price list")]
    Quote {
        #[arg(long, default_value = "tripquote.json")]
        workspace: PathBuf,
    },
    #[command(about = "Merge parsed vendor pricing into the workspace matrices")]
    Reconcile {
        #[arg(long, default_value = "tripquote.json")]
        workspace: PathBuf,
        #[arg(long, help = "Path to the parsed vendor pricing JSON")]
        parsed: PathBuf,
        #[arg(long, help = "Raw vendor text to store alongside the extraction")]
        vendor_text: Option<PathBuf>,
        #[arg(long, help = "Home-currency value of one unit of the vendor currency")]
        rate: Option<Decimal>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        logging::init_logging(&config);
    }

    let result = match cli.command {
        Command::Init { workspace, force } => commands::init::run(&workspace, force),
        Command::Calculate { workspace, json } => commands::calculate::run(&workspace, json),
        Command::Quote { workspace } => commands::quote::run(&workspace),
        Command::Reconcile { workspace, parsed, vendor_text, rate } => {
            commands::reconcile::run(commands::reconcile::ReconcileArgs {
                workspace_path: &workspace,
                parsed_path: &parsed,
                vendor_text_path: vendor_text.as_deref(),
                rate,
            })
        }
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
