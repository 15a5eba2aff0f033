//! Model driven UI building blocks: columns, tables and forms derived from
//! resource metadata.

pub mod column;
pub mod form;
pub mod table;

use thiserror::Error;

/// Configuration failures raised when building widgets from metadata.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("resource description for '{id}' contains no attributes")]
    NoAttributes { id: String },
    #[error("table '{id}' has no columns")]
    NoColumns { id: String },
    #[error("form '{id}' has no fields")]
    NoFields { id: String },
}
