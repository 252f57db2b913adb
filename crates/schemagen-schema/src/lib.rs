pub mod error;
pub mod node;
pub mod sanitize;
pub mod types;
pub mod validate;
pub mod visit;

/// Maximum number of dynamic subobject slots a subobject class may reserve.
pub const MAX_DYNAMIC_SUBOBJECT_SLOTS: u32 = 32;

use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        err,
        error::ErrorTree,
        node::*,
        sanitize::{NameScope, sanitize},
        types::{Category, ClassFlags, ClassKind},
        visit::Visitor,
    };
    pub use serde::{Deserialize, Serialize};
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("validation failed: {0}")]
    Validation(error::ErrorTree),
}
