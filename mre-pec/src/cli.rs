//! Définition et implémentation des commandes CLI
//!
//! - `evaluate`: lignes de référence + polygones de discrépance → couche, rapport HTML/JSON
//! - `table`: affiche la table planimétrique du PEC-PCD

use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::{debug, info};

use mre::{DegeneratePolicy, MreError, PEC_PCD_PLANIMETRIC};
use mre_pec::config::Config;
use mre_pec::export::{geojson, html};
use mre_pec::{crs, input, EvaluationReport};

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate discrepancy polygons against reference lines (equivalent rectangles method)
    Evaluate(EvaluateArgs),

    /// Print the PEC-PCD planimetric thresholds
    Table,
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Reference lines (GeoJSON, LineString/MultiLineString)
    #[arg(short, long)]
    pub reference: PathBuf,

    /// Discrepancy polygons (GeoJSON, Polygon/MultiPolygon)
    #[arg(short, long)]
    pub discrepancies: PathBuf,

    /// Output layer with `discrepancy` and `weight` attributes (GeoJSON)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// PEC-PCD report (HTML)
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Machine-readable report (JSON)
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// JSON config file (degenerate_policy, coverage_ratio, scales)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Degenerate polygon policy: reject, skip, clamp (défaut : env MRE_DEGENERATE_POLICY / reject)
    #[arg(long)]
    pub degenerate_policy: Option<DegeneratePolicy>,

    /// Weighted length ratio required under EM (défaut : env MRE_COVERAGE_RATIO / 0.9)
    #[arg(long)]
    pub coverage_ratio: Option<f64>,

    /// Scales to classify, comma separated (ex: 1k,2k,1:5.000)
    #[arg(long, value_delimiter = ',')]
    pub scales: Option<Vec<String>>,
}

impl EvaluateArgs {
    /// Options de la ligne de commande, prioritaires sur le reste
    fn overrides(&self) -> Config {
        Config {
            degenerate_policy: self.degenerate_policy,
            coverage_ratio: self.coverage_ratio,
            scales: self.scales.clone(),
        }
    }
}

/// Exécute la commande evaluate
pub fn cmd_evaluate(args: &EvaluateArgs) -> Result<()> {
    let start = Instant::now();

    let config = load_config(args)?;
    let evaluator = config.to_evaluator_config()?;

    let reference = input::load_reference_lines(&args.reference)?;
    let discrepancies = input::load_discrepancy_zones(&args.discrepancies)?;

    info!(
        reference = %reference.name,
        lines = reference.features.len(),
        discrepancies = %discrepancies.name,
        zones = discrepancies.features.len(),
        "Layers loaded"
    );

    let epsg = crs::check_layers(reference.epsg, discrepancies.epsg)?;

    let mut report =
        EvaluationReport::new(reference.summary(), discrepancies.summary(), &evaluator);

    let step = (discrepancies.features.len() / 10).max(1);
    let result = mre::evaluate_with_progress(
        &reference.features,
        &discrepancies.features,
        &evaluator,
        |done, total| {
            if done % step == 0 || done == total {
                debug!(done, total, "Progress {}%", done * 100 / total);
            }
            ControlFlow::Continue(())
        },
    );
    report.set_duration(start.elapsed());

    match result {
        Ok(evaluation) => {
            report.record_evaluation(&evaluation);

            if let Some(ref output) = args.output {
                geojson::export_records(&evaluation.records, epsg, output)?;
                info!(
                    records = evaluation.records.len(),
                    output = %output.display(),
                    "Output layer written"
                );
            }

            write_reports(&report, args)?;
            report.display();
            info!("{}", report.summary());
            Ok(())
        }
        Err(e @ MreError::NoOverlap { .. }) => {
            report.record_failure(&e);
            write_reports(&report, args)?;
            report.display();
            Err(anyhow::Error::new(e).context("Evaluation produced no statistics"))
        }
        Err(e) => Err(anyhow::Error::new(e).context("Evaluation failed")),
    }
}

/// Exécute la commande table
pub fn cmd_table() -> Result<()> {
    println!("PEC-PCD - planimetric limits (EM / EP, meters)");
    println!(
        "{:>11} | {:>15} | {:>15} | {:>15} | {:>15}",
        "scale", "A", "B", "C", "D"
    );
    println!("{}", "-".repeat(83));
    for scale in &PEC_PCD_PLANIMETRIC {
        let cells: Vec<String> = scale
            .limits
            .iter()
            .map(|l| format!("{} / {}", l.mean_error_limit, l.std_error_limit))
            .collect();
        println!(
            "{:>11} | {:>15} | {:>15} | {:>15} | {:>15}",
            scale.label(),
            cells[0],
            cells[1],
            cells[2],
            cells[3]
        );
    }
    Ok(())
}

/// Fichier JSON < environnement < ligne de commande
fn load_config(args: &EvaluateArgs) -> Result<Config> {
    let file = match args.config {
        Some(ref path) => Config::load(path)?,
        None => Config::default(),
    };
    let env = Config::from_env()?;
    Ok(file.merge(env).merge(args.overrides()))
}

/// Écrit les rapports HTML et JSON demandés
fn write_reports(report: &EvaluationReport, args: &EvaluateArgs) -> Result<()> {
    if let Some(ref path) = args.html {
        html::export_report(report, path)?;
        info!(path = %path.display(), "HTML report written");
    }
    if let Some(ref path) = args.json {
        report
            .save_to_file(path)
            .context(format!("Failed to write JSON report: {}", path.display()))?;
        info!(path = %path.display(), "JSON report written");
    }
    Ok(())
}
