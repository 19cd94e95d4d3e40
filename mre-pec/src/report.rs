//! Rapport d'évaluation MRE / PEC-PCD
//!
//! Ce module collecte le résultat d'une évaluation (ou son échec) et l'affiche
//! sur la console, en JSON ou en HTML (voir `export::html`).

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use mre::{AggregateStats, Evaluation, EvaluatorConfig, MreError, ScaleGrade};

use crate::input::LayerSummary;

/// Statut global de l'évaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EvaluationStatus {
    /// Statistiques et classement produits
    Success,
    /// Aucune longueur de référence dans les polygones de discrépance
    NoCoverage,
    /// Évaluation échouée (polygone dégénéré, annulation)
    Failed,
}

/// Rapport complet d'une évaluation
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    /// Couche de référence
    pub reference: LayerSummary,
    /// Couche des polygones de discrépance
    pub discrepancies: LayerSummary,
    /// Statut global
    pub status: EvaluationStatus,
    /// Durée de l'évaluation
    pub duration_secs: f64,

    /// Politique appliquée aux polygones dégénérés
    pub degenerate_policy: String,
    /// Part de longueur exigée sous l'EM
    pub coverage_ratio: f64,

    /// Nombre d'enregistrements produits
    pub records: usize,
    /// Zones ignorées (politique skip)
    pub skipped: Vec<String>,
    /// Statistiques agrégées (absentes si aucun recouvrement)
    pub stats: Option<AggregateStats>,
    /// Classement par échelle
    pub grades: Vec<ScaleGrade>,

    /// Message d'erreur si l'évaluation n'a pas abouti
    pub message: Option<String>,
}

impl EvaluationReport {
    /// Crée un rapport vide pour deux couches
    pub fn new(reference: LayerSummary, discrepancies: LayerSummary, config: &EvaluatorConfig) -> Self {
        Self {
            reference,
            discrepancies,
            status: EvaluationStatus::Success,
            duration_secs: 0.0,
            degenerate_policy: config.degenerate_policy.to_string(),
            coverage_ratio: config.coverage_ratio,
            records: 0,
            skipped: Vec::new(),
            stats: None,
            grades: Vec::new(),
            message: None,
        }
    }

    /// Enregistre une évaluation réussie
    pub fn record_evaluation(&mut self, evaluation: &Evaluation) {
        self.status = EvaluationStatus::Success;
        self.records = evaluation.records.len();
        self.skipped = evaluation.skipped.clone();
        self.stats = Some(evaluation.stats);
        self.grades = evaluation.classification.grades.clone();
        self.message = None;
    }

    /// Enregistre un échec d'évaluation
    pub fn record_failure(&mut self, error: &MreError) {
        self.status = match error {
            MreError::NoOverlap { .. } => EvaluationStatus::NoCoverage,
            _ => EvaluationStatus::Failed,
        };
        self.stats = None;
        self.grades.clear();
        self.message = Some(error.to_string());
    }

    /// Définit la durée de l'évaluation
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Longueur de référence totale reliée aux discrépances (0 sans recouvrement)
    pub fn total_length(&self) -> f64 {
        self.stats.map_or(0.0, |s| s.total_weight)
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("MRE REPORT - Equivalent rectangles method");
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);

        println!("\n--- LAYERS ---");
        for (label, layer) in [("Reference", &self.reference), ("Discrepancies", &self.discrepancies)] {
            println!(
                "  {}: {} ({} features{})",
                label,
                layer.name,
                layer.feature_count,
                layer.epsg.map(|e| format!(", EPSG:{}", e)).unwrap_or_default()
            );
        }

        println!("\n--- RESULTS ---");
        println!("Total related length: {:.4} m", self.total_length());
        if let Some(stats) = self.stats {
            println!("Mean: {:.3} m", stats.mean);
            println!("Weighted mean: {:.3} m", stats.weighted_mean);
            println!("Weighted RMS: {:.3} m", stats.weighted_rms);
            println!("Std deviation: {:.3} m", stats.std_dev);
            println!("Max / min discrepancy: {:.4} / {:.4} m", stats.max, stats.min);
        }

        if !self.grades.is_empty() {
            println!("\n--- PEC-PCD ---");
            for g in &self.grades {
                println!("  {} -> {}", g.scale_label, g.grade);
            }
        }

        if !self.skipped.is_empty() {
            println!("\n--- SKIPPED ({}) ---", self.skipped.len());
            for id in self.skipped.iter().take(10) {
                println!("  {}", id);
            }
            if self.skipped.len() > 10 {
                println!("  ... and {} more", self.skipped.len() - 10);
            }
        }

        if let Some(ref message) = self.message {
            println!("\n--- ERROR ---");
            println!("  {}", message);
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        match self.stats {
            Some(stats) => format!(
                "{} vs {}: weighted RMS {:.3} m over {:.1} m, {}",
                self.discrepancies.name,
                self.reference.name,
                stats.weighted_rms,
                stats.total_weight,
                self.grades
                    .iter()
                    .map(|g| format!("{}={}", g.scale_label, g.grade))
                    .collect::<Vec<_>>()
                    .join(" ")
            ),
            None => format!(
                "{} vs {}: {:?}",
                self.discrepancies.name, self.reference.name, self.status
            ),
        }
    }
}
