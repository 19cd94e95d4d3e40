//! Types d'erreurs pour le crate mre

use thiserror::Error;

/// Erreurs pouvant survenir lors d'une évaluation MRE
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MreError {
    /// Aire et périmètre incompatibles avec un rectangle équivalent
    #[error(
        "Degenerate polygon {zone_id}: area={area}, perimeter={perimeter}, discriminant={discriminant}"
    )]
    DegeneratePolygon {
        zone_id: String,
        area: f64,
        perimeter: f64,
        discriminant: f64,
    },

    /// Aucune ligne de référence ne traverse les polygones de discrépance
    #[error("No reference line overlaps any discrepancy polygon ({zones} polygons, {lines} lines)")]
    NoOverlap { zones: usize, lines: usize },

    /// Échelle absente de la table PEC-PCD
    #[error("Unknown scale: {0}")]
    UnknownScale(String),

    /// Évaluation interrompue par l'appelant
    #[error("Evaluation cancelled")]
    Cancelled,
}

impl MreError {
    /// Crée une erreur de polygone dégénéré
    pub fn degenerate(
        zone_id: impl Into<String>,
        area: f64,
        perimeter: f64,
        discriminant: f64,
    ) -> Self {
        Self::DegeneratePolygon {
            zone_id: zone_id.into(),
            area,
            perimeter,
            discriminant,
        }
    }

    /// Renseigne l'identifiant de zone d'une erreur de polygone dégénéré
    pub fn with_zone(self, id: &str) -> Self {
        match self {
            Self::DegeneratePolygon {
                area,
                perimeter,
                discriminant,
                ..
            } => Self::degenerate(id, area, perimeter, discriminant),
            other => other,
        }
    }
}
