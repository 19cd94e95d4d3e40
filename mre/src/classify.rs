//! Classification PEC-PCD des statistiques MRE

use std::fmt;

use serde::{Serialize, Serializer};

use crate::pec::{AccuracyClass, ClassLimits, ScaleThresholds};
use crate::stats::AggregateStats;
use crate::types::DiscrepancyRecord;

/// Part minimale (exclusive) de longueur pondérée sous l'EM pour qu'une classe passe
pub const DEFAULT_COVERAGE_RATIO: f64 = 0.9;

/// Résultat pour une échelle: une classe, ou rejet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Class(AccuracyClass),
    Rejected,
}

impl Grade {
    pub fn label(self) -> &'static str {
        match self {
            Self::Class(class) => class.label(),
            Self::Rejected => "R",
        }
    }

    pub fn is_rejected(self) -> bool {
        matches!(self, Self::Rejected)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Grade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Classe obtenue pour une échelle
#[derive(Debug, Clone, Serialize)]
pub struct ScaleGrade {
    pub scale_key: &'static str,
    pub denominator: u32,
    pub scale_label: String,
    pub grade: Grade,
}

/// Classement PEC-PCD, dans l'ordre de la table fournie
#[derive(Debug, Clone, Default, Serialize)]
pub struct Classification {
    pub grades: Vec<ScaleGrade>,
}

impl Classification {
    /// Classe obtenue pour une échelle (par dénominateur)
    pub fn grade_for(&self, denominator: u32) -> Option<Grade> {
        self.grades
            .iter()
            .find(|g| g.denominator == denominator)
            .map(|g| g.grade)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScaleGrade> {
        self.grades.iter()
    }
}

/// Vrai si la classe est atteinte: plus de `coverage_ratio` de la longueur pondérée
/// a une demi-largeur strictement sous l'EM, et le REMQ pondéré est strictement sous l'EP.
pub fn passes(
    stats: &AggregateStats,
    records: &[DiscrepancyRecord],
    limits: &ClassLimits,
    coverage_ratio: f64,
) -> bool {
    stats.weight_fraction_below(records, limits.mean_error_limit) > coverage_ratio
        && stats.weighted_rms < limits.std_error_limit
}

/// Meilleure (plus stricte) classe atteinte pour une échelle
pub fn grade_scale(
    stats: &AggregateStats,
    records: &[DiscrepancyRecord],
    scale: &ScaleThresholds,
    coverage_ratio: f64,
) -> Grade {
    AccuracyClass::STRICTEST_FIRST
        .into_iter()
        .find(|&class| passes(stats, records, scale.limits_for(class), coverage_ratio))
        .map_or(Grade::Rejected, Grade::Class)
}

/// Classe chaque échelle de la table
pub fn classify(
    stats: &AggregateStats,
    records: &[DiscrepancyRecord],
    thresholds: &[ScaleThresholds],
    coverage_ratio: f64,
) -> Classification {
    let grades = thresholds
        .iter()
        .map(|scale| ScaleGrade {
            scale_key: scale.key,
            denominator: scale.denominator,
            scale_label: scale.label(),
            grade: grade_scale(stats, records, scale, coverage_ratio),
        })
        .collect();

    Classification { grades }
}
