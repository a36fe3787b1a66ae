//! Font families and bundles.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use log::{debug, info};
use rustybuzz::ttf_parser::{self, FaceParsingError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Font resolution error. Any of them makes the render fail.
#[derive(Debug, Error)]
pub enum FontError {
    /// Family id is not registered.
    #[error("unknown font family '{0}'")]
    UnknownFamily(String),
    /// Font file cannot be read.
    #[error("font file {path:?} ({family} {weight}) is missing")]
    Missing {
        /// Family id.
        family: String,
        /// Weight of the file.
        weight: FontWeight,
        /// Path of the file.
        path: PathBuf,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Font file is not a valid font.
    #[error("font file {path:?} ({family} {weight}) cannot be parsed")]
    Unparseable {
        /// Family id.
        family: String,
        /// Weight of the file.
        weight: FontWeight,
        /// Path of the file.
        path: PathBuf,
        /// Parsing error.
        #[source]
        source: FaceParsingError,
    },
}

/// One of the three weights of a font bundle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    /// Used for the city name.
    Bold,
    /// Used for the coordinates.
    Regular,
    /// Used for the country, subtitle and attribution.
    Light,
}

impl FontWeight {
    /// All weights.
    pub const ALL: [FontWeight; 3] = [Self::Bold, Self::Regular, Self::Light];
}

impl Display for FontWeight {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FontWeight::Bold => "bold",
            FontWeight::Regular => "regular",
            FontWeight::Light => "light",
        };
        f.write_str(name)
    }
}

/// Registered font family: an id and the file names of its three weights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontFamily {
    /// Id used in render specs.
    pub id: String,
    /// Human readable family name.
    pub name: String,
    /// File of the bold weight, relative to the fonts directory.
    pub bold: String,
    /// File of the regular weight.
    pub regular: String,
    /// File of the light weight.
    pub light: String,
}

impl FontFamily {
    /// Creates a family description.
    pub fn new(id: &str, name: &str, bold: &str, regular: &str, light: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            bold: bold.to_string(),
            regular: regular.to_string(),
            light: light.to_string(),
        }
    }

    /// File name of the weight.
    pub fn file(&self, weight: FontWeight) -> &str {
        match weight {
            FontWeight::Bold => &self.bold,
            FontWeight::Regular => &self.regular,
            FontWeight::Light => &self.light,
        }
    }

    /// Families available in every store.
    pub fn builtin() -> Vec<FontFamily> {
        vec![
            Self::new(
                "roboto",
                "Roboto",
                "Roboto-Bold.ttf",
                "Roboto-Regular.ttf",
                "Roboto-Light.ttf",
            ),
            Self::new(
                "playfair",
                "Playfair Display",
                "PlayfairDisplay-Bold.ttf",
                "PlayfairDisplay-Regular.ttf",
                "PlayfairDisplay-Regular.ttf",
            ),
            Self::new(
                "courier",
                "Courier Prime",
                "CourierPrime-Bold.ttf",
                "CourierPrime-Regular.ttf",
                "CourierPrime-Regular.ttf",
            ),
            Self::new(
                "dancing",
                "Dancing Script",
                "DancingScript-Bold.ttf",
                "DancingScript-Regular.ttf",
                "DancingScript-Regular.ttf",
            ),
            Self::new(
                "raleway",
                "Raleway",
                "Raleway-Bold.ttf",
                "Raleway-Regular.ttf",
                "Raleway-Light.ttf",
            ),
        ]
    }
}

/// Loaded and validated font file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFace {
    data: Bytes,
    index: u32,
}

impl FontFace {
    /// Validates font data. Collections use the face at `index`.
    pub fn new(data: Bytes, index: u32) -> Result<Self, FaceParsingError> {
        ttf_parser::Face::parse(&data, index)?;
        Ok(Self { data, index })
    }

    /// Shaping face borrowing the font data.
    pub fn face(&self) -> Option<rustybuzz::Face<'_>> {
        rustybuzz::Face::from_slice(&self.data, self.index)
    }
}

/// The three weights of a font family, ready for shaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontBundle {
    family: String,
    bold: FontFace,
    regular: FontFace,
    light: FontFace,
}

impl FontBundle {
    /// Creates a bundle from loaded faces.
    pub fn new(family: &str, bold: FontFace, regular: FontFace, light: FontFace) -> Self {
        Self {
            family: family.to_string(),
            bold,
            regular,
            light,
        }
    }

    /// Family id of the bundle.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Face of the given weight.
    pub fn face(&self, weight: FontWeight) -> &FontFace {
        match weight {
            FontWeight::Bold => &self.bold,
            FontWeight::Regular => &self.regular,
            FontWeight::Light => &self.light,
        }
    }
}

/// Resolves font family ids to font bundles read from a directory.
#[derive(Debug, Clone)]
pub struct FontStore {
    folder_path: PathBuf,
    families: BTreeMap<String, FontFamily>,
}

impl FontStore {
    /// Creates a store with the built-in families reading files from the given directory.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let families = FontFamily::builtin()
            .into_iter()
            .map(|family| (family.id.clone(), family))
            .collect();

        Self {
            folder_path: path.as_ref().into(),
            families,
        }
    }

    /// Adds a family, replacing a registered one with the same id.
    pub fn register(&mut self, family: FontFamily) {
        self.families.insert(family.id.clone(), family);
    }

    /// Same as [`FontStore::register`], but returns the store.
    pub fn with_family(mut self, family: FontFamily) -> Self {
        self.register(family);
        self
    }

    /// Registered family ids, sorted.
    pub fn families(&self) -> impl Iterator<Item = &FontFamily> {
        self.families.values()
    }

    /// Loads all three weights of the family.
    pub fn load(&self, id: &str) -> Result<FontBundle, FontError> {
        let family = self
            .families
            .get(id)
            .ok_or_else(|| FontError::UnknownFamily(id.to_string()))?;

        let bold = self.load_face(family, FontWeight::Bold)?;
        let regular = self.load_face(family, FontWeight::Regular)?;
        let light = self.load_face(family, FontWeight::Light)?;

        info!("Loaded font family '{id}' ({})", family.name);
        Ok(FontBundle::new(id, bold, regular, light))
    }

    fn load_face(&self, family: &FontFamily, weight: FontWeight) -> Result<FontFace, FontError> {
        let path = self.folder_path.join(family.file(weight));
        debug!("Loading {weight} face of '{}' from {path:?}", family.id);

        let data = std::fs::read(&path).map_err(|source| FontError::Missing {
            family: family.id.clone(),
            weight,
            path: path.clone(),
            source,
        })?;

        FontFace::new(data.into(), 0).map_err(|source| FontError::Unparseable {
            family: family.id.clone(),
            weight,
            path,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::tests::{font_store, TEST_FONT};

    #[test]
    fn load_bundle() {
        let bundle = font_store().load(TEST_FONT).unwrap();
        assert_eq!(bundle.family(), TEST_FONT);
        for weight in FontWeight::ALL {
            assert!(bundle.face(weight).face().is_some());
        }
        assert_ne!(bundle.face(FontWeight::Bold), bundle.face(FontWeight::Light));
    }

    #[test]
    fn builtin_families_are_registered() {
        let store = FontStore::new("fonts");
        let ids: Vec<&str> = store.families().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["courier", "dancing", "playfair", "raleway", "roboto"]);
    }

    #[test]
    fn missing_weight() {
        let dir = tempfile::tempdir().unwrap();
        let fonts = concat!(env!("CARGO_MANIFEST_DIR"), "/test-data/fonts");
        std::fs::copy(
            Path::new(fonts).join("DejaVuSans-Bold.ttf"),
            dir.path().join("Roboto-Bold.ttf"),
        )
        .unwrap();
        std::fs::copy(
            Path::new(fonts).join("DejaVuSans.ttf"),
            dir.path().join("Roboto-Regular.ttf"),
        )
        .unwrap();

        let store = FontStore::new(dir.path());
        assert_matches!(
            store.load("roboto"),
            Err(FontError::Missing { weight: FontWeight::Light, .. })
        );
    }

    #[test]
    fn invalid_font_file() {
        let dir = tempfile::tempdir().unwrap();
        for file in ["a.ttf", "b.ttf", "c.ttf"] {
            std::fs::write(dir.path().join(file), b"definitely not a font").unwrap();
        }

        let store = FontStore::new(dir.path())
            .with_family(FontFamily::new("broken", "Broken", "a.ttf", "b.ttf", "c.ttf"));
        assert_matches!(
            store.load("broken"),
            Err(FontError::Unparseable { weight: FontWeight::Bold, .. })
        );
        assert_matches!(store.load("comic"), Err(FontError::UnknownFamily(_)));
    }
}
