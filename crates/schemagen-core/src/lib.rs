//! ## Crate layout
//! - `allocator`: monotonic component id allocation.
//! - `db`: the persisted schema database and its storage.
//! - `discovery`: cross-thread candidate notifications.
//! - `hash`: content hashing for compiled artifacts.
//! - `registry`: schema name reservation and collision reporting.
//! - `types`: component ids and their reserved values.

pub mod allocator;
pub mod db;
pub mod discovery;
pub mod hash;
pub mod registry;
pub mod types;

pub use schemagen_schema as schema;

use thiserror::Error as ThisError;

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    AllocatorError(#[from] allocator::AllocatorError),

    #[error(transparent)]
    DatabaseError(#[from] db::DatabaseError),
}
