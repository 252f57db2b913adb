//! `schemagen.toml` loading.
//!
//! Every field has a default, so an empty file (or no file at all) is a
//! valid configuration for the standard project layout.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// Conventional config file name.
pub const CONFIG_FILE_NAME: &str = "schemagen.toml";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

///
/// Config
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub compiler: CompilerConfig,
}

impl Config {
    /// Read, resolve and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_toml_str(&text, base).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse config text; relative paths resolve against `base`.
    pub fn from_toml_str(text: &str, base: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;

        config.resolve(base);
        config.validate()?;

        Ok(config)
    }

    /// Defaults resolved against `base`.
    #[must_use]
    pub fn defaults_at(base: &Path) -> Self {
        let mut config = Self::default();
        config.resolve(base);

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generator.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "generator.batch_size must be greater than zero".to_string(),
            ));
        }
        if self.compiler.schema_paths.is_empty() {
            return Err(ConfigError::Invalid(
                "compiler.schema_paths must name at least one directory".to_string(),
            ));
        }

        Ok(())
    }

    fn resolve(&mut self, base: &Path) {
        let generator = &mut self.generator;
        resolve_path(base, &mut generator.schema_dir);
        resolve_path(base, &mut generator.database);

        let compiler = &mut self.compiler;
        for path in &mut compiler.schema_paths {
            resolve_path(base, path);
        }
        resolve_path(base, &mut compiler.output_dir);

        // a bare executable name is looked up on PATH
        if compiler.exe.components().count() > 1 {
            resolve_path(base, &mut compiler.exe);
        }
    }
}

fn resolve_path(base: &Path, path: &mut PathBuf) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}

///
/// GeneratorConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Root of the generated schema tree. Wiped on every full pass.
    pub schema_dir: PathBuf,

    pub database: PathBuf,

    /// Classes emitted per batch.
    pub batch_size: usize,

    /// Dynamic component slots reserved for each subobject class.
    pub dynamic_subobject_slots: u32,

    /// Host directories whose classes never ship.
    pub never_cook_dirs: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            schema_dir: PathBuf::from("spatial/schema/unreal/generated"),
            database: PathBuf::from("spatial/schema_database.json"),
            batch_size: 100,
            dynamic_subobject_slots: 3,
            never_cook_dirs: Vec::new(),
        }
    }
}

///
/// CompilerConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    pub exe: PathBuf,
    pub schema_paths: Vec<PathBuf>,
    pub output_dir: PathBuf,

    /// Passed through to the compiler after the standard arguments.
    pub additional_args: Option<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            exe: PathBuf::from("schema_compiler"),
            schema_paths: vec![
                PathBuf::from("spatial/schema"),
                PathBuf::from("spatial/build/dependencies/schema/standard_library"),
            ],
            output_dir: PathBuf::from("spatial/build/assembly/schema"),
            additional_args: None,
        }
    }
}

///
/// TESTS
///
