//! Modules d'export (couche GeoJSON, rapport HTML)

pub mod geojson;
pub mod html;
