//! Évaluation MRE d'une couche de discrépances contre une couche de référence

use std::fmt;
use std::ops::ControlFlow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::classify::{classify, Classification, DEFAULT_COVERAGE_RATIO};
use crate::geometry::{clamped_half_width, equivalent_half_width, overlap_length};
use crate::pec::{ScaleThresholds, PEC_PCD_PLANIMETRIC};
use crate::stats::AggregateStats;
use crate::types::{DiscrepancyRecord, DiscrepancyZone, ReferenceLine};
use crate::MreError;

/// Traitement d'un polygone sans rectangle équivalent (discriminant négatif)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Échec de toute l'évaluation
    #[default]
    Reject,
    /// Zone ignorée (comptée dans `Evaluation::skipped`)
    Skip,
    /// Discriminant ramené à zéro: demi-largeur = P/4
    ClampToSquare,
}

impl FromStr for DegeneratePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "reject" => Ok(Self::Reject),
            "skip" => Ok(Self::Skip),
            "clamp" | "clamp_to_square" => Ok(Self::ClampToSquare),
            other => Err(format!(
                "Unknown degenerate policy: {}. Use: reject, skip, clamp",
                other
            )),
        }
    }
}

impl fmt::Display for DegeneratePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reject => "reject",
            Self::Skip => "skip",
            Self::ClampToSquare => "clamp",
        })
    }
}

/// Paramètres d'évaluation
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    pub degenerate_policy: DegeneratePolicy,
    /// Part de longueur pondérée (exclusive) exigée sous l'EM
    pub coverage_ratio: f64,
    /// Échelles à classer (par défaut toute la table PEC-PCD)
    pub scales: Vec<ScaleThresholds>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            degenerate_policy: DegeneratePolicy::default(),
            coverage_ratio: DEFAULT_COVERAGE_RATIO,
            scales: PEC_PCD_PLANIMETRIC.to_vec(),
        }
    }
}

/// Résultat complet d'une évaluation
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub records: Vec<DiscrepancyRecord>,
    pub stats: AggregateStats,
    pub classification: Classification,
    /// Identifiants des zones ignorées (politique `Skip`)
    pub skipped: Vec<String>,
}

/// Évalue les zones de discrépance contre les lignes de référence.
///
/// # Errors
///
/// - `DegeneratePolygon` si une zone n'a pas de rectangle équivalent et que la
///   politique est `Reject`
/// - `NoOverlap` si la longueur de référence totale reliée aux zones est nulle
pub fn evaluate(
    reference_lines: &[ReferenceLine],
    zones: &[DiscrepancyZone],
    config: &EvaluatorConfig,
) -> Result<Evaluation, MreError> {
    evaluate_with_progress(reference_lines, zones, config, |_, _| ControlFlow::Continue(()))
}

/// Comme [`evaluate`], en appelant `progress(traitées, total)` après chaque zone.
///
/// Retourner `ControlFlow::Break` interrompt l'évaluation avec `MreError::Cancelled`.
pub fn evaluate_with_progress<F>(
    reference_lines: &[ReferenceLine],
    zones: &[DiscrepancyZone],
    config: &EvaluatorConfig,
    mut progress: F,
) -> Result<Evaluation, MreError>
where
    F: FnMut(usize, usize) -> ControlFlow<()>,
{
    info!(
        zones = zones.len(),
        lines = reference_lines.len(),
        policy = %config.degenerate_policy,
        "Applying the equivalent rectangles method"
    );

    let mut records = Vec::with_capacity(zones.len());
    let mut skipped = Vec::new();

    for (index, zone) in zones.iter().enumerate() {
        if let Some(record) = evaluate_zone(zone, reference_lines, config.degenerate_policy)? {
            debug!(
                zone = %record.zone_id,
                half_width = record.equivalent_half_width,
                overlap = record.overlap_length,
                "Zone evaluated"
            );
            records.push(record);
        } else {
            skipped.push(zone.id.clone());
        }

        if progress(index + 1, zones.len()).is_break() {
            warn!(done = index + 1, total = zones.len(), "Evaluation cancelled");
            return Err(MreError::Cancelled);
        }
    }

    let stats = AggregateStats::from_records(&records).ok_or(MreError::NoOverlap {
        zones: zones.len(),
        lines: reference_lines.len(),
    })?;

    let classification = classify(&stats, &records, &config.scales, config.coverage_ratio);

    info!(
        records = records.len(),
        skipped = skipped.len(),
        total_length = stats.total_weight,
        weighted_rms = stats.weighted_rms,
        "Evaluation complete"
    );

    Ok(Evaluation {
        records,
        stats,
        classification,
        skipped,
    })
}

/// Calcule l'enregistrement d'une zone; `None` si la zone est ignorée
fn evaluate_zone(
    zone: &DiscrepancyZone,
    reference_lines: &[ReferenceLine],
    policy: DegeneratePolicy,
) -> Result<Option<DiscrepancyRecord>, MreError> {
    let area = zone.area();
    let perimeter = zone.perimeter();

    let half_width = match equivalent_half_width(area, perimeter) {
        Ok(x) => x,
        Err(e) => match policy {
            DegeneratePolicy::Reject => return Err(e.with_zone(&zone.id)),
            DegeneratePolicy::Skip => {
                warn!(zone = %zone.id, area, perimeter, "Degenerate polygon skipped");
                return Ok(None);
            }
            DegeneratePolicy::ClampToSquare if perimeter.is_finite() && area.is_finite() => {
                warn!(zone = %zone.id, area, perimeter, "Degenerate polygon clamped to square");
                clamped_half_width(perimeter)
            }
            DegeneratePolicy::ClampToSquare => return Err(e.with_zone(&zone.id)),
        },
    };

    Ok(Some(DiscrepancyRecord {
        zone_id: zone.id.clone(),
        polygon: zone.geometry.clone(),
        equivalent_half_width: half_width,
        overlap_length: overlap_length(&zone.geometry, reference_lines),
    }))
}
