//! Utility modules for steward.

mod labels;

pub use labels::label;
