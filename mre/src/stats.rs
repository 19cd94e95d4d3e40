//! Statistiques agrégées pondérées par la longueur de recouvrement

use serde::Serialize;

use crate::types::DiscrepancyRecord;

/// Statistiques d'une évaluation MRE (distances en mètres)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateStats {
    /// Nombre d'enregistrements agrégés
    pub count: usize,
    /// Longueur totale de référence reliée aux discrépances (Σw)
    pub total_weight: f64,
    /// sqrt(Σd²w / Σw)
    pub weighted_rms: f64,
    /// Σdw / Σw
    pub weighted_mean: f64,
    /// Moyenne non pondérée des demi-largeurs
    pub mean: f64,
    /// Écart-type de population des demi-largeurs
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl AggregateStats {
    /// Agrège les enregistrements.
    ///
    /// Retourne `None` si le poids total est nul (aucun recouvrement, ou aucun
    /// enregistrement): les statistiques pondérées seraient indéfinies.
    pub fn from_records(records: &[DiscrepancyRecord]) -> Option<Self> {
        let total_weight: f64 = records.iter().map(|r| r.overlap_length).sum();
        if records.is_empty() || total_weight <= 0.0 {
            return None;
        }

        let mut sum_dw = 0.0;
        let mut sum_d2w = 0.0;
        let mut sum_d = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for r in records {
            let d = r.equivalent_half_width;
            let w = r.overlap_length;
            sum_dw += d * w;
            sum_d2w += d * d * w;
            sum_d += d;
            min = min.min(d);
            max = max.max(d);
        }

        let n = records.len() as f64;
        let mean = sum_d / n;
        let variance = records
            .iter()
            .map(|r| (r.equivalent_half_width - mean).powi(2))
            .sum::<f64>()
            / n;

        Some(Self {
            count: records.len(),
            total_weight,
            weighted_rms: (sum_d2w / total_weight).sqrt(),
            weighted_mean: sum_dw / total_weight,
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        })
    }

    /// Part du poids total portée par les enregistrements de demi-largeur < `limit`
    pub fn weight_fraction_below(&self, records: &[DiscrepancyRecord], limit: f64) -> f64 {
        let within: f64 = records
            .iter()
            .filter(|r| r.equivalent_half_width < limit)
            .map(|r| r.overlap_length)
            .sum();
        within / self.total_weight
    }
}
