//! Système de coordonnées des couches d'entrée
//!
//! Les distances MRE sont planimétriques: les deux couches doivent partager
//! un même système projeté (métrique).

use anyhow::{bail, Result};
use geojson::JsonObject;
use tracing::warn;

/// Plage EPSG réservée aux systèmes géographiques (en degrés)
const GEOGRAPHIC_RANGE: std::ops::RangeInclusive<u32> = 4000..=4999;

/// Systèmes projetés enregistrés dans la plage géographique
const PROJECTED_IN_GEOGRAPHIC_RANGE: &[std::ops::RangeInclusive<u32>] = &[
    4087..=4088, // World Equidistant Cylindrical
    4390..=4398, // Kertau, Indian 1975 UTM
    4417..=4417, // Pulkovo 1942(83) / 3-degree Gauss-Kruger
    4434..=4434, // Pulkovo 1942(83) / 3-degree Gauss-Kruger
    4491..=4554, // CGCS2000 / Gauss-Kruger
    4568..=4589, // New Beijing / Gauss-Kruger
    4647..=4647, // ETRS89 / UTM zone 32N (zE-N)
];

/// Systèmes géographiques hors de la plage 4000-4999
const GEOGRAPHIC_EXTRA: &[u32] = &[
    6318, // NAD83(2011)
    6668, // JGD2011
    7843, // GDA2020 3D
    7844, // GDA2020
];

/// Extrait le code EPSG du membre `crs` (GeoJSON 2008) d'une FeatureCollection
///
/// Formes reconnues: `urn:ogc:def:crs:EPSG::31983`, `EPSG:31983`, `urn:ogc:def:crs:OGC:1.3:CRS84`.
pub fn epsg_from_foreign_members(members: Option<&JsonObject>) -> Option<u32> {
    let name = members?
        .get("crs")?
        .get("properties")?
        .get("name")?
        .as_str()?;
    parse_crs_name(name)
}

/// Convertit un nom de CRS en code EPSG
pub fn parse_crs_name(name: &str) -> Option<u32> {
    let name = name.trim();
    if name.ends_with("CRS84") {
        return Some(4326);
    }
    let upper = name.to_ascii_uppercase();
    let pos = upper.find("EPSG")?;
    upper[pos + 4..]
        .trim_start_matches(':')
        .rsplit(':')
        .next()?
        .trim()
        .parse()
        .ok()
}

/// Vrai si le code désigne un système géographique.
///
/// Toute la plage 4000-4999 est considérée géographique, sauf les systèmes
/// projetés connus qui y sont enregistrés.
pub fn is_geographic(epsg: u32) -> bool {
    if GEOGRAPHIC_EXTRA.contains(&epsg) {
        return true;
    }
    GEOGRAPHIC_RANGE.contains(&epsg)
        && !PROJECTED_IN_GEOGRAPHIC_RANGE
            .iter()
            .any(|range| range.contains(&epsg))
}

/// Vérifie que les deux couches partagent un même système projeté.
///
/// Une couche sans CRS déclaré est acceptée avec un warning: la vérification se
/// limite alors à ce qui est connu. Sans aucun CRS déclaré, le GeoJSON RFC 7946
/// désigne CRS84; les coordonnées sont pourtant prises comme métriques.
pub fn check_layers(reference: Option<u32>, discrepancies: Option<u32>) -> Result<Option<u32>> {
    match (reference, discrepancies) {
        (Some(a), Some(b)) if a != b => {
            bail!(
                "Input layers must share one projected CRS (reference EPSG:{}, discrepancies EPSG:{})",
                a,
                b
            )
        }
        (Some(epsg), _) | (_, Some(epsg)) if is_geographic(epsg) => {
            bail!(
                "Input layers must use a projected CRS, EPSG:{} is geographic",
                epsg
            )
        }
        (Some(a), Some(_)) => Ok(Some(a)),
        (Some(epsg), None) | (None, Some(epsg)) => {
            warn!(epsg, "One input layer declares no CRS, assuming EPSG:{}", epsg);
            Ok(Some(epsg))
        }
        (None, None) => {
            warn!(
                "Input layers declare no CRS (RFC 7946 implies CRS84 degrees), \
                 assuming a shared projected system: distances are in layer units"
            );
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crs_name() {
        assert_eq!(parse_crs_name("urn:ogc:def:crs:EPSG::31983"), Some(31983));
        assert_eq!(parse_crs_name("EPSG:31983"), Some(31983));
        assert_eq!(parse_crs_name("urn:ogc:def:crs:EPSG:9.6:2154"), Some(2154));
        assert_eq!(parse_crs_name("urn:ogc:def:crs:OGC:1.3:CRS84"), Some(4326));
        assert_eq!(parse_crs_name("LAMB93"), None);
    }

    #[test]
    fn test_epsg_from_foreign_members() {
        let members: JsonObject = serde_json::from_str(
            r#"{"crs":{"type":"name","properties":{"name":"urn:ogc:def:crs:EPSG::31982"}}}"#,
        )
        .unwrap();
        assert_eq!(epsg_from_foreign_members(Some(&members)), Some(31982));
        assert_eq!(epsg_from_foreign_members(None), None);
    }

    #[test]
    fn test_check_layers() {
        assert_eq!(check_layers(Some(31983), Some(31983)).unwrap(), Some(31983));
        assert!(check_layers(Some(31983), Some(31982)).is_err());
        assert!(check_layers(Some(4674), Some(4674)).is_err());
        assert!(check_layers(Some(4326), None).is_err());
        assert_eq!(check_layers(None, Some(2154)).unwrap(), Some(2154));
        assert_eq!(check_layers(None, None).unwrap(), None);
    }

    #[test]
    fn test_is_geographic() {
        for epsg in [4326, 4674, 4283, 4979, 4167, 7844] {
            assert!(is_geographic(epsg), "EPSG:{epsg}");
        }
        for epsg in [31983, 2154, 32723, 3857, 4087, 4499, 4647] {
            assert!(!is_geographic(epsg), "EPSG:{epsg}");
        }
    }

    #[test]
    fn test_unlisted_geographic_layers_are_rejected() {
        assert!(check_layers(Some(4283), Some(4283)).is_err());
        assert!(check_layers(None, Some(4979)).is_err());
    }
}
