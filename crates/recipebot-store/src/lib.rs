//! Persistence of the recipe collection.
//!
//! The collection lives in a single JSON document (`{"recipes": [...]}`)
//! which every append reads, extends and rewrites as a whole.
//!
//! # Main types
//!
//! - [`RecordRepository`]: Trait over append/load.
//! - [`JsonRecordRepository`]: The file-backed implementation.
//! - [`InMemoryRecordRepository`]: Volatile implementation for tests and dry runs.
//! - [`RecipeBook`]: The persisted document.

/// The persisted document.
pub mod book;
/// Repository trait and implementations.
pub mod repository;

pub use book::RecipeBook;
pub use repository::{InMemoryRecordRepository, JsonRecordRepository, RecordRepository};
