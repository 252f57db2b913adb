//! Schema text emission and compiler invocation.

pub mod compiler;
pub mod emit;
pub mod writer;

pub use compiler::{CompileError, CompileOutput, CompilerInvocation, ProcessCompiler, SchemaCompiler};
pub use emit::SchemaEmitter;

use schemagen_core::allocator::AllocatorError;
use std::{io, path::PathBuf};
use thiserror::Error as ThisError;

///
/// EmitError
///

#[derive(Debug, ThisError)]
pub enum EmitError {
    #[error("failed to {action} '{}': {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error("'{0}' is not a class and cannot be emitted")]
    NotAClass(String),

    #[error(transparent)]
    Allocator(#[from] AllocatorError),
}

impl EmitError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
