//! Types de données pour le crate mre

use geo::{Area, EuclideanLength, LineString, MultiLineString, MultiPolygon, Polygon};
use serde::Serialize;

/// Ligne de référence (feature linéaire de la couche de contrôle)
#[derive(Debug, Clone)]
pub struct ReferenceLine {
    /// Identifiant de la feature
    pub id: String,

    /// Géométrie (une polyligne simple est une MultiLineString à un membre)
    pub geometry: MultiLineString,
}

impl ReferenceLine {
    pub fn new(id: impl Into<String>, geometry: MultiLineString) -> Self {
        Self {
            id: id.into(),
            geometry,
        }
    }

    /// Crée une ligne de référence depuis une polyligne simple
    pub fn from_line_string(id: impl Into<String>, line: LineString) -> Self {
        Self::new(id, MultiLineString::new(vec![line]))
    }

    /// Longueur planimétrique totale
    pub fn length(&self) -> f64 {
        self.geometry.euclidean_length()
    }
}

/// Polygone de discrépance entre la ligne testée et la ligne de référence
#[derive(Debug, Clone)]
pub struct DiscrepancyZone {
    /// Identifiant de la feature
    pub id: String,

    /// Géométrie (un polygone simple est un MultiPolygon à un membre)
    pub geometry: MultiPolygon,
}

impl DiscrepancyZone {
    pub fn new(id: impl Into<String>, geometry: MultiPolygon) -> Self {
        Self {
            id: id.into(),
            geometry,
        }
    }

    /// Crée une zone depuis un polygone simple
    pub fn from_polygon(id: impl Into<String>, polygon: Polygon) -> Self {
        Self::new(id, MultiPolygon::new(vec![polygon]))
    }

    /// Aire (toujours positive, quel que soit le sens des rings)
    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }

    /// Périmètre: somme des longueurs de tous les rings, extérieurs et intérieurs
    pub fn perimeter(&self) -> f64 {
        self.geometry
            .iter()
            .map(|polygon| {
                polygon.exterior().euclidean_length()
                    + polygon
                        .interiors()
                        .iter()
                        .map(|ring| ring.euclidean_length())
                        .sum::<f64>()
            })
            .sum()
    }
}

/// Résultat MRE pour un polygone de discrépance
#[derive(Debug, Clone, Serialize)]
pub struct DiscrepancyRecord {
    /// Identifiant de la zone source
    pub zone_id: String,

    /// Géométrie de la zone (recopiée vers la couche de sortie)
    #[serde(skip)]
    pub polygon: MultiPolygon,

    /// Petit côté du rectangle équivalent (m)
    pub equivalent_half_width: f64,

    /// Longueur de ligne de référence contenue dans la zone (m), sert de poids
    pub overlap_length: f64,
}
