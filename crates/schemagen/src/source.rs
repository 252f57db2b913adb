use schemagen_schema::node::{LevelAsset, TypeNode};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

///
/// SourceError
///

#[derive(Debug, ThisError)]
pub enum SourceError {
    #[error("failed to read type manifest '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse type manifest '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("type source failed: {0}")]
    Host(String),
}

///
/// TypeSource
///
/// The host reflector. `classes` is everything currently loaded; `resolve`
/// turns a path seen during an external enumeration pass into its node.
///

pub trait TypeSource {
    fn classes(&self) -> Result<Vec<TypeNode>, SourceError>;

    fn resolve(&self, path: &str) -> Option<TypeNode>;

    fn levels(&self) -> Result<Vec<LevelAsset>, SourceError>;
}

///
/// TypeManifest
///
/// JSON snapshot of a reflector. `catalog` holds classes that are not
/// loaded but can be resolved; `cooked` lists paths observed while cooking.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TypeManifest {
    pub classes: Vec<TypeNode>,
    pub catalog: Vec<TypeNode>,
    pub levels: Vec<LevelAsset>,
    pub cooked: Vec<String>,
}

///
/// ManifestSource
///

#[derive(Clone, Debug)]
pub struct ManifestSource {
    manifest: TypeManifest,
    by_path: BTreeMap<String, usize>,
}

impl ManifestSource {
    #[must_use]
    pub fn new(manifest: TypeManifest) -> Self {
        // loaded classes shadow catalog entries with the same path
        let mut by_path = BTreeMap::new();
        let all = manifest.classes.iter().chain(&manifest.catalog);
        for (i, node) in all.enumerate() {
            by_path.entry(node.path.clone()).or_insert(i);
        }

        Self { manifest, by_path }
    }

    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let text = fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = serde_json::from_str(&text).map_err(|source| SourceError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::new(manifest))
    }

    /// Paths an enumeration pass reported.
    #[must_use]
    pub fn cooked(&self) -> &[String] {
        &self.manifest.cooked
    }
}

impl TypeSource for ManifestSource {
    fn classes(&self) -> Result<Vec<TypeNode>, SourceError> {
        Ok(self.manifest.classes.clone())
    }

    fn resolve(&self, path: &str) -> Option<TypeNode> {
        let index = *self.by_path.get(path)?;

        self.manifest
            .classes
            .iter()
            .chain(&self.manifest.catalog)
            .nth(index)
            .cloned()
    }

    fn levels(&self) -> Result<Vec<LevelAsset>, SourceError> {
        Ok(self.manifest.levels.clone())
    }
}

///
/// TESTS
///
