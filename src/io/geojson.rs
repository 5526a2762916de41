//! Seed region input from GeoJSON.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::Value;

use crate::error::invalid_input;

/// Read a GeoJSON file into a multipolygon.
///
/// Accepts a bare `Polygon`/`MultiPolygon` geometry, a `Feature`, or a
/// `FeatureCollection` (whose polygons are all collected). Other geometry
/// types are rejected.
pub fn read_region_geojson(path: &Path) -> Result<MultiPolygon<f64>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("[io::geojson] Failed to read GeoJSON file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("[io::geojson] Failed to parse GeoJSON from {:?}", path))?;
    parse_region(&value)
}

/// Convert a parsed GeoJSON value into a multipolygon.
pub fn parse_region(value: &Value) -> Result<MultiPolygon<f64>> {
    let mut polygons = Vec::new();
    collect_polygons(value, &mut polygons)?;
    Ok(MultiPolygon(polygons))
}

fn collect_polygons(value: &Value, out: &mut Vec<Polygon<f64>>) -> Result<()> {
    match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            let Some(features) = value.get("features").and_then(Value::as_array) else {
                invalid_input!("FeatureCollection has no 'features' array")
            };
            for feature in features { collect_polygons(feature, out)? }
        }
        Some("Feature") => match value.get("geometry") {
            Some(geometry) if !geometry.is_null() => collect_polygons(geometry, out)?,
            _ => invalid_input!("Feature has no geometry"),
        },
        Some("Polygon") => out.push(parse_polygon(coordinates(value)?)?),
        Some("MultiPolygon") => {
            let Some(parts) = coordinates(value)?.as_array() else { invalid_input!("MultiPolygon coordinates must be an array") };
            for part in parts { out.push(parse_polygon(part)?) }
        }
        Some(other) => invalid_input!("unsupported GeoJSON type '{other}' for a seed region"),
        None => invalid_input!("GeoJSON object has no 'type'"),
    }
    Ok(())
}

fn coordinates(geometry: &Value) -> Result<&Value> {
    match geometry.get("coordinates") {
        Some(coords) => Ok(coords),
        None => invalid_input!("geometry has no 'coordinates'"),
    }
}

/// `[[exterior...], [hole...], ...]` into a polygon.
fn parse_polygon(rings: &Value) -> Result<Polygon<f64>> {
    let Some(rings) = rings.as_array() else { invalid_input!("polygon coordinates must be an array of rings") };
    let mut rings = rings.iter().map(parse_ring);
    let Some(exterior) = rings.next() else { invalid_input!("polygon has no exterior ring") };
    Ok(Polygon::new(exterior?, rings.collect::<Result<_>>()?))
}

fn parse_ring(ring: &Value) -> Result<LineString<f64>> {
    let Some(positions) = ring.as_array() else { invalid_input!("ring must be an array of positions") };
    positions.iter()
        .map(|position| match position.as_array().map(|xy| xy.as_slice()) {
            Some([x, y, ..]) => match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => Ok(Coord { x, y }),
                _ => invalid_input!("position has non-numeric coordinates"),
            },
            _ => invalid_input!("position must have at least two coordinates"),
        })
        .collect::<Result<Vec<_>>>()
        .map(LineString::new)
}

#[cfg(test)]
mod tests {
    use geo::Area;
    use serde_json::json;

    use super::*;
    use crate::DesignError;

    fn square(x: f64) -> Value {
        json!([[[x, 0.0], [x + 1.0, 0.0], [x + 1.0, 1.0], [x, 1.0], [x, 0.0]]])
    }

    #[test]
    fn reads_bare_geometries() {
        let polygon = parse_region(&json!({"type": "Polygon", "coordinates": square(0.0)})).unwrap();
        assert_eq!(polygon.0.len(), 1);
        assert_eq!(polygon.unsigned_area(), 1.0);

        let multi = parse_region(&json!({"type": "MultiPolygon", "coordinates": [square(0.0), square(3.0)]})).unwrap();
        assert_eq!(multi.0.len(), 2);
    }

    #[test]
    fn collects_feature_collection() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"CODE": "07005"}, "geometry": {"type": "Polygon", "coordinates": square(0.0)}},
                {"type": "Feature", "properties": {}, "geometry": {"type": "MultiPolygon", "coordinates": [square(2.0), square(4.0)]}},
            ]
        });
        assert_eq!(parse_region(&value).unwrap().0.len(), 3);
    }

    #[test]
    fn keeps_holes() {
        let value = json!({"type": "Polygon", "coordinates": [
            [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]],
            [[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 2.0], [1.0, 1.0]],
        ]});
        let region = parse_region(&value).unwrap();
        assert_eq!(region.0[0].interiors().len(), 1);
        assert_eq!(region.unsigned_area(), 15.0);
    }

    #[test]
    fn rejects_other_geometries() {
        let err = parse_region(&json!({"type": "Point", "coordinates": [0.0, 0.0]})).unwrap_err();
        assert!(matches!(err.downcast_ref::<DesignError>(), Some(DesignError::InvalidInput(m)) if m.contains("Point")));
        assert!(parse_region(&json!({"coordinates": []})).is_err());
        assert!(parse_region(&json!({"type": "Polygon", "coordinates": [[[0.0], [1.0, 1.0]]]})).is_err());
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("region.geojson");
        fs::write(&path, json!({"type": "Feature", "geometry": {"type": "Polygon", "coordinates": square(0.0)}}).to_string()).unwrap();
        assert_eq!(read_region_geojson(&path).unwrap().0.len(), 1);
    }
}
