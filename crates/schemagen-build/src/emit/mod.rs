mod class;
mod distance;
mod level;

use crate::EmitError;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Directory for subobject class files, relative to the schema root.
pub const SUBOBJECTS_DIR: &str = "Subobjects";

/// Sublevel components file, relative to the schema root.
pub const SUBLEVELS_FILE: &str = "Sublevels/sublevels.schema";

/// Distance bucket components file, relative to the schema root.
pub const DISTANCES_FILE: &str = "NetCullDistance/ncdcomponents.schema";

///
/// SchemaEmitter
///
/// Writes schema text under one root directory. Every emit call looks up
/// ids in the database first and only allocates for pairs it has never
/// seen, so re-emitting an unchanged graph reproduces the same files.
///

#[derive(Clone, Debug)]
pub struct SchemaEmitter {
    schema_dir: PathBuf,
    dynamic_slots: u32,
}

impl SchemaEmitter {
    #[must_use]
    pub fn new(schema_dir: impl Into<PathBuf>, dynamic_slots: u32) -> Self {
        Self {
            schema_dir: schema_dir.into(),
            dynamic_slots,
        }
    }

    #[must_use]
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Empty the schema root so files of vanished classes do not linger.
    pub fn prepare(&self) -> Result<(), EmitError> {
        if self.schema_dir.exists() {
            fs::remove_dir_all(&self.schema_dir)
                .map_err(|e| EmitError::io("clear schema directory", &self.schema_dir, e))?;
        }

        fs::create_dir_all(&self.schema_dir)
            .map_err(|e| EmitError::io("create schema directory", &self.schema_dir, e))
    }
}

// lower-cased package segment for a class file
fn class_package(schema_name: &str) -> String {
    format!("unreal.generated.{}", schema_name.to_ascii_lowercase())
}
