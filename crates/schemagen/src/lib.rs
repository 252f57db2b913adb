//! ## Crate layout
//! - `build`: schema text emission and the external compiler.
//! - `config`: `schemagen.toml` loading.
//! - `core`: component ids, the schema database and name reservation.
//! - `schema`: the reflected type graph, sanitizer and validation.
//!
//! `Generator` runs one generation pass over a `TypeSource`; the `prelude`
//! collects what a host integration usually needs.

pub use schemagen_build as build;
pub use schemagen_config_build as config;
pub use schemagen_core as core;
pub use schemagen_schema as schema;

mod error;
mod filter;
mod generator;
mod source;

pub use error::GenerateError;
pub use filter::{SkipReason, SupportFilter};
pub use generator::{GenerateOptions, Generator, PassReport, PassState, full_scan_required};
pub use source::{ManifestSource, SourceError, TypeManifest, TypeSource};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        GenerateError, GenerateOptions, Generator, ManifestSource, PassReport, TypeSource,
        build::{ProcessCompiler, SchemaCompiler},
        config::Config,
        core::{discovery::discovery, types::ComponentId},
        schema::prelude::*,
    };
}
