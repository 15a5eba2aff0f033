//! The console views.

pub mod extensions;
pub mod tls;

use thiserror::Error;

use crate::mbui::BuildError;
use crate::meta::address::AddressError;
use crate::meta::registry::MetaError;
use crate::mgmt::client::ClientError;
use crate::tui::table::TableError;

/// Failures while building or refreshing a view.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    Meta(#[from] MetaError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Table(#[from] TableError),
}
