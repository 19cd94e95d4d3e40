//! # mre-pec
//!
//! Évaluation de l'exactitude planimétrique d'entités linéaires par la méthode
//! des rectangles équivalents (MRE), avec classement PEC-PCD.
//!
//! ## Features
//!
//! - Lecture des couches GeoJSON (lignes de référence, polygones de discrépance)
//! - Vérification du système de coordonnées (identique et projeté)
//! - Couche de sortie avec attributs `discrepancy` et `weight`
//! - Rapport console, JSON et HTML
//!
//! ## Usage CLI
//!
//! ```bash
//! mre-pec evaluate --reference rios.geojson --discrepancies zonas.geojson \
//!     --output mre.geojson --html pec.html
//!
//! # Table du PEC-PCD
//! mre-pec table
//! ```

pub mod config;
pub mod crs;
pub mod export;
pub mod input;
pub mod report;

pub use config::Config;
pub use input::{load_discrepancy_zones, load_reference_lines, Layer, LayerSummary};
pub use report::{EvaluationReport, EvaluationStatus};
