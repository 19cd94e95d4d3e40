//! Chargement des couches d'entrée GeoJSON

use std::path::Path;

use anyhow::{bail, Context, Result};
use geo::{Geometry, MultiLineString, MultiPolygon};
use geojson::{feature::Id, Feature, FeatureCollection, GeoJson};
use serde::Serialize;
use tracing::{debug, warn};

use mre::{DiscrepancyZone, ReferenceLine};

/// Couche chargée avec ses métadonnées
#[derive(Debug)]
pub struct Layer<T> {
    /// Nom de la couche (nom du fichier sans extension)
    pub name: String,
    /// EPSG déclaré dans le membre `crs`, si présent
    pub epsg: Option<u32>,
    /// Nombre de features lues dans le fichier (géométries nulles comprises)
    pub feature_count: usize,
    pub features: Vec<T>,
}

/// Résumé d'une couche pour le rapport
#[derive(Debug, Clone, Serialize)]
pub struct LayerSummary {
    pub name: String,
    pub feature_count: usize,
    pub epsg: Option<u32>,
}

impl<T> Layer<T> {
    pub fn summary(&self) -> LayerSummary {
        LayerSummary {
            name: self.name.clone(),
            feature_count: self.feature_count,
            epsg: self.epsg,
        }
    }
}

/// Charge une couche de lignes de référence (LineString / MultiLineString)
pub fn load_reference_lines(path: &Path) -> Result<Layer<ReferenceLine>> {
    load_layer(path, |id, geometry| match geometry {
        Geometry::LineString(line) => Ok(ReferenceLine::new(id, MultiLineString::new(vec![line]))),
        Geometry::MultiLineString(lines) => Ok(ReferenceLine::new(id, lines)),
        other => bail!(
            "Feature {} is not a line ({})",
            id,
            geometry_type_name(&other)
        ),
    })
}

/// Charge une couche de polygones de discrépance (Polygon / MultiPolygon)
pub fn load_discrepancy_zones(path: &Path) -> Result<Layer<DiscrepancyZone>> {
    load_layer(path, |id, geometry| match geometry {
        Geometry::Polygon(polygon) => Ok(DiscrepancyZone::new(id, MultiPolygon::new(vec![polygon]))),
        Geometry::MultiPolygon(polygons) => Ok(DiscrepancyZone::new(id, polygons)),
        other => bail!(
            "Feature {} is not a polygon ({})",
            id,
            geometry_type_name(&other)
        ),
    })
}

fn load_layer<T>(
    path: &Path,
    convert: impl Fn(String, Geometry) -> Result<T>,
) -> Result<Layer<T>> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read layer: {}", path.display()))?;
    parse_layer(&content, &layer_name(path), convert)
        .context(format!("Invalid layer: {}", path.display()))
}

/// Parse une FeatureCollection GeoJSON
pub fn parse_layer<T>(
    content: &str,
    name: &str,
    convert: impl Fn(String, Geometry) -> Result<T>,
) -> Result<Layer<T>> {
    let geojson: GeoJson = content.parse().context("Failed to parse GeoJSON")?;
    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        GeoJson::Feature(f) => FeatureCollection {
            bbox: None,
            features: vec![f],
            foreign_members: None,
        },
        GeoJson::Geometry(_) => bail!("Expected a FeatureCollection, found a bare geometry"),
    };

    let epsg = crate::crs::epsg_from_foreign_members(collection.foreign_members.as_ref());
    let feature_count = collection.features.len();
    let mut features = Vec::with_capacity(feature_count);

    for (index, feature) in collection.features.into_iter().enumerate() {
        let id = feature_id(&feature, index);
        let Some(geometry) = feature.geometry else {
            warn!(layer = name, feature = %id, "Feature without geometry skipped");
            continue;
        };
        let geometry = Geometry::<f64>::try_from(geometry)
            .context(format!("Invalid geometry for feature {}", id))?;
        features.push(convert(id, geometry)?);
    }

    debug!(
        layer = name,
        features = features.len(),
        epsg = ?epsg,
        "Layer loaded"
    );

    Ok(Layer {
        name: name.to_string(),
        epsg,
        feature_count,
        features,
    })
}

/// Identifiant d'une feature: `id` GeoJSON, puis propriétés `id`/`fid`, puis rang
fn feature_id(feature: &Feature, index: usize) -> String {
    match &feature.id {
        Some(Id::String(s)) => return s.clone(),
        Some(Id::Number(n)) => return n.to_string(),
        None => {}
    }

    ["id", "fid"]
        .iter()
        .find_map(|key| feature.property(key))
        .and_then(|value| match value {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| (index + 1).to_string())
}

/// Nom de couche depuis le chemin (ex: "rios.geojson" -> "rios")
pub fn layer_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn geometry_type_name(geometry: &Geometry) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINES: &str = r#"{
        "type": "FeatureCollection",
        "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::31983"}},
        "features": [
            {"type": "Feature", "id": "r1", "properties": {},
             "geometry": {"type": "LineString", "coordinates": [[0, 0], [10, 0]]}},
            {"type": "Feature", "properties": {"fid": 7},
             "geometry": {"type": "MultiLineString", "coordinates": [[[0, 1], [5, 1]], [[6, 1], [9, 1]]]}},
            {"type": "Feature", "properties": null, "geometry": null}
        ]
    }"#;

    fn to_line(id: String, geometry: Geometry) -> Result<ReferenceLine> {
        match geometry {
            Geometry::LineString(l) => Ok(ReferenceLine::from_line_string(id, l)),
            Geometry::MultiLineString(m) => Ok(ReferenceLine::new(id, m)),
            _ => bail!("not a line"),
        }
    }

    #[test]
    fn test_parse_reference_layer() {
        let layer = parse_layer(LINES, "rios", to_line).unwrap();
        assert_eq!(layer.epsg, Some(31983));
        assert_eq!(layer.feature_count, 3);
        assert_eq!(layer.features.len(), 2);
        assert_eq!(layer.features[0].id, "r1");
        assert_eq!(layer.features[1].id, "7");
        assert!((layer.features[1].length() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_wrong_geometry_type_is_rejected() {
        let points = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {},
             "geometry": {"type": "Point", "coordinates": [1, 2]}}
        ]}"#;
        assert!(parse_layer(points, "pts", to_line).is_err());
    }

    #[test]
    fn test_bare_geometry_is_rejected() {
        let bare = r#"{"type": "LineString", "coordinates": [[0, 0], [1, 1]]}"#;
        assert!(parse_layer(bare, "bare", to_line).is_err());
    }

    #[test]
    fn test_layer_name() {
        assert_eq!(layer_name(Path::new("/data/rios.geojson")), "rios");
        assert_eq!(layer_name(Path::new("zonas.json")), "zonas");
    }
}
