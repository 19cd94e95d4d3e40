//! Couche de sortie GeoJSON (polygones + discrépance et poids) avec geozero

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use geo::Geometry;
use geozero::geojson::GeoJsonWriter;
use geozero::GeozeroGeometry;

use mre::DiscrepancyRecord;

/// Exporte les enregistrements MRE en GeoJSON (streaming avec geozero)
pub fn export_records(
    records: &[DiscrepancyRecord],
    epsg: Option<u32>,
    output_path: &Path,
) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    write_collection(&mut writer, records, epsg)?;
    writer.flush()?;

    Ok(())
}

/// Écrit la FeatureCollection complète
pub fn write_collection<W: Write>(
    writer: &mut W,
    records: &[DiscrepancyRecord],
    epsg: Option<u32>,
) -> Result<()> {
    write!(writer, r#"{{"type":"FeatureCollection","#)?;
    if let Some(epsg) = epsg {
        write!(
            writer,
            r#""crs":{{"type":"name","properties":{{"name":"urn:ogc:def:crs:EPSG::{}"}}}},"#,
            epsg
        )?;
    }
    write!(writer, r#""features":["#)?;

    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            write!(writer, ",")?;
        }
        write_feature(writer, record)?;
    }

    write!(writer, "]}}")?;
    Ok(())
}

/// Écrit un enregistrement en Feature GeoJSON
fn write_feature<W: Write>(writer: &mut W, record: &DiscrepancyRecord) -> Result<()> {
    let id = serde_json::to_string(&record.zone_id)?;
    write!(writer, r#"{{"type":"Feature","id":{},"#, id)?;

    write!(writer, r#""geometry":"#)?;
    let mut geom_buf = Vec::new();
    let mut geom_writer = GeoJsonWriter::new(&mut geom_buf);
    Geometry::MultiPolygon(record.polygon.clone()).process_geom(&mut geom_writer)?;
    writer.write_all(&geom_buf)?;

    write!(
        writer,
        r#","properties":{{"id":{},"discrepancy":{},"weight":{}}}}}"#,
        id,
        json_number(record.equivalent_half_width),
        json_number(record.overlap_length)
    )?;

    Ok(())
}

/// Nombre JSON (null si non fini)
fn json_number(value: f64) -> String {
    serde_json::Number::from_f64(value)
        .map(|n| n.to_string())
        .unwrap_or_else(|| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};
    use std::io::Cursor;

    fn record() -> DiscrepancyRecord {
        DiscrepancyRecord {
            zone_id: "z\"1".to_string(),
            polygon: MultiPolygon::new(vec![polygon![
                (x: 0.0, y: 0.0),
                (x: 10.0, y: 0.0),
                (x: 10.0, y: 0.5),
                (x: 0.0, y: 0.5),
            ]]),
            equivalent_half_width: 0.5,
            overlap_length: 12.25,
        }
    }

    #[test]
    fn test_write_feature() {
        let mut buffer = Cursor::new(Vec::new());
        write_feature(&mut buffer, &record()).unwrap();

        let json = String::from_utf8(buffer.into_inner()).unwrap();
        assert!(json.contains(r#""id":"z\"1""#));
        assert!(json.contains(r#""type":"Feature""#));
        assert!(json.contains("MultiPolygon"));
        assert!(json.contains(r#""discrepancy":0.5"#));
        assert!(json.contains(r#""weight":12.25"#));
    }

    #[test]
    fn test_collection_is_valid_geojson() {
        let mut buffer = Vec::new();
        write_collection(&mut buffer, &[record(), record()], Some(31983)).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"].as_array().unwrap().len(), 2);
        assert_eq!(
            value["crs"]["properties"]["name"],
            "urn:ogc:def:crs:EPSG::31983"
        );
        assert_eq!(value["features"][0]["properties"]["weight"], 12.25);
    }

    #[test]
    fn test_collection_without_crs() {
        let mut buffer = Vec::new();
        write_collection(&mut buffer, &[], None).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert!(value.get("crs").is_none());
        assert!(value["features"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_json_number() {
        assert_eq!(json_number(0.05), "0.05");
        assert_eq!(json_number(f64::NAN), "null");
    }
}
