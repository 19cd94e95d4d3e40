//! Configuration de l'évaluation
//!
//! Priorité: options CLI > variables d'environnement (`.env` inclus) > fichier JSON > défauts.

use serde::{Deserialize, Serialize};
use std::path::Path;

use anyhow::{Context, Result};
use mre::{find_scale, DegeneratePolicy, EvaluatorConfig, DEFAULT_COVERAGE_RATIO};

/// Configuration partielle: chaque champ absent laisse la valeur de la couche inférieure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Traitement des polygones sans rectangle équivalent (reject, skip, clamp_to_square)
    pub degenerate_policy: Option<DegeneratePolicy>,

    /// Part de longueur pondérée exigée sous l'EM (exclusive, défaut 0.9)
    pub coverage_ratio: Option<f64>,

    /// Sous-ensemble d'échelles à classer (ex: ["1k", "1:2.000", "5000"])
    pub scales: Option<Vec<String>>,
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge la configuration depuis les variables d'environnement
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Variables: MRE_DEGENERATE_POLICY, MRE_COVERAGE_RATIO, MRE_SCALES (séparées par des virgules)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let degenerate_policy = lookup("MRE_DEGENERATE_POLICY")
            .map(|s| s.parse::<DegeneratePolicy>().map_err(anyhow::Error::msg))
            .transpose()
            .context("Invalid MRE_DEGENERATE_POLICY")?;

        let coverage_ratio = lookup("MRE_COVERAGE_RATIO")
            .map(|s| s.trim().parse::<f64>())
            .transpose()
            .context("Invalid MRE_COVERAGE_RATIO")?;

        let scales = lookup("MRE_SCALES").map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        });

        Ok(Self {
            degenerate_policy,
            coverage_ratio,
            scales,
        })
    }

    /// Superpose `other` à `self` (les valeurs présentes dans `other` gagnent)
    pub fn merge(self, other: Config) -> Config {
        Config {
            degenerate_policy: other.degenerate_policy.or(self.degenerate_policy),
            coverage_ratio: other.coverage_ratio.or(self.coverage_ratio),
            scales: other.scales.or(self.scales),
        }
    }

    /// Résout la configuration en paramètres d'évaluation validés
    pub fn to_evaluator_config(&self) -> Result<EvaluatorConfig> {
        let coverage_ratio = self.coverage_ratio.unwrap_or(DEFAULT_COVERAGE_RATIO);
        if !(0.0..1.0).contains(&coverage_ratio) {
            anyhow::bail!(
                "coverage_ratio must be in [0, 1), got {}",
                coverage_ratio
            );
        }

        let mut evaluator = EvaluatorConfig {
            degenerate_policy: self.degenerate_policy.unwrap_or_default(),
            coverage_ratio,
            ..Default::default()
        };

        if let Some(ref ids) = self.scales {
            let mut scales = ids
                .iter()
                .map(|id| find_scale(id).copied())
                .collect::<Result<Vec<_>, _>>()?;
            if scales.is_empty() {
                anyhow::bail!("Scale selection is empty");
            }
            scales.sort_by_key(|s| s.denominator);
            scales.dedup_by_key(|s| s.denominator);
            evaluator.scales = scales;
        }

        Ok(evaluator)
    }
}
