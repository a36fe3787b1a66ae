use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use geojson::{FeatureCollection, GeoJson};
use log::{debug, info, warn};
use serde_json::Value;

use super::{FeatureQuery, GeoDataSource, SourceError};
use crate::layer::{Feature, Tags};

/// Data source reading GeoJSON feature collections from a directory.
///
/// Every `.geojson` or `.json` file of the directory is read once, on the first query. Feature
/// properties become tags: strings are kept as is, booleans become `yes`/`no`, numbers are printed,
/// and a nested `tags` object (as produced by Overpass exports) is flattened.
#[derive(Debug)]
pub struct GeoJsonSource {
    folder_path: PathBuf,
    features: OnceLock<Vec<Feature>>,
}

impl GeoJsonSource {
    /// Creates a source reading from the given directory.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            folder_path: path.as_ref().into(),
            features: OnceLock::new(),
        }
    }

    fn features(&self) -> Result<&[Feature], SourceError> {
        if let Some(features) = self.features.get() {
            return Ok(features);
        }

        let loaded = self.load()?;
        Ok(self.features.get_or_init(|| loaded))
    }

    fn load(&self) -> Result<Vec<Feature>, SourceError> {
        if !self.folder_path.is_dir() {
            return Err(SourceError::Unavailable(format!(
                "{:?} is not a directory",
                self.folder_path
            )));
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.folder_path)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext == "geojson" || ext == "json")
            })
            .collect();
        paths.sort();

        let mut features = vec![];
        for path in paths {
            let loaded = read_collection(&path)?;
            debug!("Read {} features from {path:?}", loaded.len());
            features.extend(loaded);
        }

        info!(
            "Loaded {} features from {:?}",
            features.len(),
            self.folder_path
        );
        Ok(features)
    }
}

impl GeoDataSource for GeoJsonSource {
    fn query(&self, query: &FeatureQuery) -> Result<Vec<Feature>, SourceError> {
        Ok(self
            .features()?
            .iter()
            .filter(|feature| query.matches(feature))
            .cloned()
            .collect())
    }
}

fn read_collection(path: &Path) -> Result<Vec<Feature>, SourceError> {
    let json = std::fs::read_to_string(path)?;
    let geojson = json
        .parse::<GeoJson>()
        .map_err(|err| SourceError::Malformed(format!("{path:?}: {err}")))?;
    let collection = FeatureCollection::try_from(geojson)
        .map_err(|err| SourceError::Malformed(format!("{path:?}: {err}")))?;

    Ok(collection
        .features
        .into_iter()
        .filter_map(convert_feature)
        .collect())
}

fn convert_feature(feature: geojson::Feature) -> Option<Feature> {
    let geometry = feature.geometry?;
    let geometry = match geo_types::Geometry::<f64>::try_from(geometry) {
        Ok(geometry) => geometry,
        Err(err) => {
            warn!("Skipping feature with unsupported geometry: {err}");
            return None;
        }
    };

    let mut tags = Tags::new();
    for (key, value) in feature.properties.unwrap_or_default() {
        match value {
            Value::Object(nested) if key == "tags" => {
                for (key, value) in nested {
                    insert_tag(&mut tags, key, value);
                }
            }
            value => insert_tag(&mut tags, key, value),
        }
    }

    Some(Feature::new(geometry, tags))
}

fn insert_tag(tags: &mut Tags, key: String, value: Value) {
    let value = match value {
        Value::String(value) => value,
        Value::Bool(true) => "yes".to_string(),
        Value::Bool(false) => "no".to_string(),
        Value::Number(number) => number.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return,
    };

    tags.insert(key, value);
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use mapposter_types::latlon;

    use super::*;
    use crate::layer::LayerKind;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "LineString", "coordinates": [[13.40, 52.52], [13.41, 52.521]]},
                "properties": {"highway": "primary", "lanes": 2, "oneway": true}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [13.405, 52.52]},
                "properties": {"tags": {"amenity": "school"}, "id": 42}
            },
            {
                "type": "Feature",
                "geometry": {"type": "LineString", "coordinates": [[14.5, 53.5], [14.6, 53.6]]},
                "properties": {"highway": "motorway"}
            },
            {
                "type": "Feature",
                "geometry": null,
                "properties": {"highway": "residential"}
            }
        ]
    }"#;

    #[test]
    fn reads_and_filters_features() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("berlin.geojson"), COLLECTION).unwrap();

        let source = GeoJsonSource::new(dir.path());
        let roads = source
            .query(&FeatureQuery::new(latlon!(52.52, 13.405), 2000.0, LayerKind::Roads))
            .unwrap();
        assert_eq!(roads.len(), 1);
        assert_eq!(roads[0].tag("highway"), Some("primary"));
        assert_eq!(roads[0].tag("lanes"), Some("2"));
        assert_eq!(roads[0].tag("oneway"), Some("yes"));

        let poi = source
            .query(&FeatureQuery::new(latlon!(52.52, 13.405), 500.0, LayerKind::Poi))
            .unwrap();
        assert_eq!(poi.len(), 1);
        assert_eq!(poi[0].tag("amenity"), Some("school"));
        assert_eq!(poi[0].tag("id"), Some("42"));
    }

    #[test]
    fn missing_directory_is_unavailable() {
        let source = GeoJsonSource::new("/definitely/not/here");
        assert_matches!(
            source.query(&FeatureQuery::new(latlon!(0.0, 0.0), 100.0, LayerKind::Water)),
            Err(SourceError::Unavailable(_))
        );
    }

    #[test]
    fn invalid_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.geojson"), "{\"type\": \"Nope\"}").unwrap();

        let source = GeoJsonSource::new(dir.path());
        assert_matches!(
            source.query(&FeatureQuery::new(latlon!(0.0, 0.0), 100.0, LayerKind::Water)),
            Err(SourceError::Malformed(_))
        );
    }
}
