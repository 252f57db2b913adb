use crate::{generator::PassState, source::SourceError};
use schemagen_build::{CompileError, EmitError};
use schemagen_config_build::ConfigError;
use schemagen_core::db::DatabaseError;
use schemagen_schema::error::ErrorTree;
use std::path::PathBuf;
use thiserror::Error as ThisError;

///
/// GenerateError
///
/// Everything that can end a pass. Each variant belongs to exactly one
/// pass state, reported by `stage`.
///

#[derive(Debug, ThisError)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to load schema database: {0}")]
    Load(DatabaseError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("type graph validation failed:\n{0}")]
    Validation(ErrorTree),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("compiled schema descriptor '{}' is missing: {source}", .path.display())]
    MissingDescriptor {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to persist schema database: {0}")]
    Persist(DatabaseError),
}

impl GenerateError {
    /// The pass state this error ended.
    #[must_use]
    pub const fn stage(&self) -> PassState {
        match self {
            Self::Config(_) => PassState::Idle,
            Self::Load(_) => PassState::Loading,
            Self::Source(_) => PassState::Discovering,
            Self::Validation(_) => PassState::Validating,
            Self::Emit(_) => PassState::Emitting,
            Self::Compile(_) => PassState::Compiling,
            Self::MissingDescriptor { .. } | Self::Persist(_) => PassState::Persisting,
        }
    }
}

///
/// TESTS
///
