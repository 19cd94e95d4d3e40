//! Point d'entrée CLI pour mre-pec

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::Commands;

/// Évaluer des entités linéaires par la méthode des rectangles équivalents
#[derive(Parser)]
#[command(name = "mre-pec")]
#[command(author, version)]
#[command(about = "Equivalent rectangles method (MRE) with PEC-PCD classification")]
#[command(long_about = "Compare reference lines with discrepancy polygons using the equivalent \
rectangles method.\n\nEach polygon gets a half-width from its area and perimeter, weighted by the \
reference length it contains; the weighted RMS is classified against the PEC-PCD \
planimetric table.")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    // Configurer le logging
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Evaluate(ref args) => {
            info!(
                reference = %args.reference.display(),
                discrepancies = %args.discrepancies.display(),
                "Evaluate"
            );
            cli::cmd_evaluate(args)?;
        }
        Commands::Table => cli::cmd_table()?,
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
