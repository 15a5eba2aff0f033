//! Resource metadata: addressing, schema descriptions, access control.

pub mod address;
pub mod description;
pub mod registry;
pub mod security;
