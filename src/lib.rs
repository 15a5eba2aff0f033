//! steward - a terminal management console for an application server.
//!
//! The console reads resource metadata (attribute schemas and access
//! rights) from a management endpoint, derives tables and forms from it
//! and runs operations against the addressed resources.
//!
//! The library is shared between:
//! - `steward` - the interactive console
//! - `steward-dump` - prints resource metadata and data as JSON

pub mod mbui;
pub mod meta;
pub mod mgmt;
pub mod model;
pub mod tui;
pub mod util;
