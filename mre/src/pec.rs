//! Table planimétrique du PEC-PCD
//!
//! Padrão de Exatidão Cartográfica des Produits Cartographiques Numériques:
//! pour chaque échelle et chaque classe (A la plus stricte, D la plus tolérante),
//! une erreur moyenne limite (EM) et une erreur standard limite (EP), en mètres.

use std::fmt;

use serde::Serialize;

use crate::MreError;

/// Classe d'exactitude du PEC-PCD
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AccuracyClass {
    A,
    B,
    C,
    D,
}

impl AccuracyClass {
    /// Classes de la plus stricte à la plus tolérante
    pub const STRICTEST_FIRST: [AccuracyClass; 4] = [Self::A, Self::B, Self::C, Self::D];

    pub fn label(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for AccuracyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Limites d'une classe pour une échelle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassLimits {
    pub class: AccuracyClass,
    /// Erreur moyenne limite (EM)
    pub mean_error_limit: f64,
    /// Erreur standard limite (EP)
    pub std_error_limit: f64,
}

/// Limites des quatre classes pour une échelle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleThresholds {
    /// Clé courte (ex: "1k" pour 1:1.000)
    pub key: &'static str,
    /// Dénominateur de l'échelle
    pub denominator: u32,
    /// Limites dans l'ordre A, B, C, D
    pub limits: [ClassLimits; 4],
}

impl ScaleThresholds {
    /// Limites d'une classe donnée
    pub fn limits_for(&self, class: AccuracyClass) -> &ClassLimits {
        &self.limits[class as usize]
    }

    /// Libellé de l'échelle avec séparateur de milliers (ex: "1:25.000")
    pub fn label(&self) -> String {
        let digits = self.denominator.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        format!("1:{}", grouped)
    }
}

const fn scale(key: &'static str, denominator: u32, em_ep: [(f64, f64); 4]) -> ScaleThresholds {
    ScaleThresholds {
        key,
        denominator,
        limits: [
            ClassLimits {
                class: AccuracyClass::A,
                mean_error_limit: em_ep[0].0,
                std_error_limit: em_ep[0].1,
            },
            ClassLimits {
                class: AccuracyClass::B,
                mean_error_limit: em_ep[1].0,
                std_error_limit: em_ep[1].1,
            },
            ClassLimits {
                class: AccuracyClass::C,
                mean_error_limit: em_ep[2].0,
                std_error_limit: em_ep[2].1,
            },
            ClassLimits {
                class: AccuracyClass::D,
                mean_error_limit: em_ep[3].0,
                std_error_limit: em_ep[3].1,
            },
        ],
    }
}

/// Composante planimétrique du PEC-PCD, de 1:500 à 1:250.000
pub static PEC_PCD_PLANIMETRIC: [ScaleThresholds; 9] = [
    scale("0.5k", 500, [(0.14, 0.085), (0.25, 0.15), (0.4, 0.25), (0.5, 0.3)]),
    scale("1k", 1_000, [(0.28, 0.17), (0.5, 0.3), (0.8, 0.5), (1.0, 0.6)]),
    scale("2k", 2_000, [(0.56, 0.34), (1.0, 0.6), (1.6, 1.0), (2.0, 1.2)]),
    scale("5k", 5_000, [(1.4, 0.85), (2.5, 1.5), (4.0, 2.5), (5.0, 3.0)]),
    scale("10k", 10_000, [(2.8, 1.7), (5.0, 3.0), (8.0, 5.0), (10.0, 6.0)]),
    scale("25k", 25_000, [(7.0, 4.25), (12.5, 7.5), (20.0, 12.5), (25.0, 15.0)]),
    scale("50k", 50_000, [(14.0, 8.5), (25.0, 15.0), (40.0, 25.0), (50.0, 30.0)]),
    scale("100k", 100_000, [(28.0, 17.0), (50.0, 30.0), (80.0, 50.0), (100.0, 60.0)]),
    scale("250k", 250_000, [(70.0, 42.5), (125.0, 75.0), (200.0, 125.0), (250.0, 150.0)]),
];

/// Recherche une échelle par clé ("1k"), dénominateur ("1000") ou libellé ("1:1.000", "1:1000")
pub fn find_scale(id: &str) -> Result<&'static ScaleThresholds, MreError> {
    let trimmed = id.trim();
    if let Some(found) = PEC_PCD_PLANIMETRIC
        .iter()
        .find(|s| s.key.eq_ignore_ascii_case(trimmed))
    {
        return Ok(found);
    }

    let digits: String = trimmed
        .strip_prefix("1:")
        .unwrap_or(trimmed)
        .chars()
        .filter(|c| !matches!(c, '.' | ' ' | '_' | ','))
        .collect();

    digits
        .parse::<u32>()
        .ok()
        .and_then(find_scale_by_denominator)
        .ok_or_else(|| MreError::UnknownScale(id.to_string()))
}

/// Recherche une échelle par dénominateur
pub fn find_scale_by_denominator(denominator: u32) -> Option<&'static ScaleThresholds> {
    PEC_PCD_PLANIMETRIC
        .iter()
        .find(|s| s.denominator == denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        assert_eq!(PEC_PCD_PLANIMETRIC.len(), 9);
        for scale in &PEC_PCD_PLANIMETRIC {
            for (i, class) in AccuracyClass::STRICTEST_FIRST.iter().enumerate() {
                assert_eq!(scale.limits[i].class, *class);
            }
            // Les limites se relâchent de A vers D
            for pair in scale.limits.windows(2) {
                assert!(pair[0].mean_error_limit < pair[1].mean_error_limit);
                assert!(pair[0].std_error_limit < pair[1].std_error_limit);
            }
        }
    }

    #[test]
    fn test_scales_are_sorted() {
        for pair in PEC_PCD_PLANIMETRIC.windows(2) {
            assert!(pair[0].denominator < pair[1].denominator);
        }
    }

    #[test]
    fn test_limits_for_1k() {
        let s = find_scale("1k").unwrap();
        let a = s.limits_for(AccuracyClass::A);
        assert_eq!(a.mean_error_limit, 0.28);
        assert_eq!(a.std_error_limit, 0.17);
        assert_eq!(s.limits_for(AccuracyClass::D).mean_error_limit, 1.0);
    }

    #[test]
    fn test_find_scale_variants() {
        assert_eq!(find_scale("1:1000").unwrap().key, "1k");
        assert_eq!(find_scale("1:1.000").unwrap().key, "1k");
        assert_eq!(find_scale("250000").unwrap().key, "250k");
        assert_eq!(find_scale("0.5K").unwrap().denominator, 500);
        assert_eq!(
            find_scale("1:3000"),
            Err(MreError::UnknownScale("1:3000".to_string()))
        );
        assert!(find_scale("").is_err());
    }

    #[test]
    fn test_scale_label() {
        assert_eq!(find_scale("0.5k").unwrap().label(), "1:500");
        assert_eq!(find_scale("1k").unwrap().label(), "1:1.000");
        assert_eq!(find_scale("250k").unwrap().label(), "1:250.000");
    }
}
