//! # mre
//!
//! Méthode des Rectangles Équivalents (MRE) pour l'exactitude planimétrique
//! des entités linéaires, avec classement selon le PEC-PCD.
//!
//! ## Principe
//!
//! - Chaque polygone de discrépance est modélisé par un rectangle de même aire
//!   et de même périmètre; son petit côté est la discrépance caractéristique
//! - Le poids d'un polygone est la longueur de ligne de référence qu'il contient
//! - Le REMQ pondéré est comparé aux limites EM/EP de chaque échelle et classe
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mre::{evaluate, DiscrepancyZone, EvaluatorConfig, ReferenceLine};
//!
//! let evaluation = evaluate(&lines, &zones, &EvaluatorConfig::default())?;
//! println!("REMQ pondéré: {:.4} m", evaluation.stats.weighted_rms);
//!
//! for grade in evaluation.classification.iter() {
//!     println!("{} -> {}", grade.scale_label, grade.grade);
//! }
//! ```

pub mod classify;
pub mod error;
pub mod evaluator;
pub mod geometry;
pub mod pec;
pub mod stats;
pub mod types;

pub use classify::{classify, Classification, Grade, ScaleGrade, DEFAULT_COVERAGE_RATIO};
pub use error::MreError;
pub use evaluator::{evaluate, evaluate_with_progress, DegeneratePolicy, Evaluation, EvaluatorConfig};
pub use geometry::{equivalent_half_width, overlap_length};
pub use pec::{find_scale, AccuracyClass, ClassLimits, ScaleThresholds, PEC_PCD_PLANIMETRIC};
pub use stats::AggregateStats;
pub use types::{DiscrepancyRecord, DiscrepancyZone, ReferenceLine};
