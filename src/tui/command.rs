//! Commands emitted by widgets and executed by the application loop.
//!
//! Widgets never touch the management endpoint or each other. Their
//! handlers push commands into a sink; the application drains the sink
//! and acts on it, so every effect is plain data first.

use crate::meta::address::{AddressTemplate, ResourceAddress};

use super::dialog::Dialog;

/// What a widget asks the application to do.
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    OpenDialog(Box<Dialog>),
    CloseDialog,
    /// Run an operation against a fully resolved address.
    Execute {
        address: ResourceAddress,
        operation: String,
    },
    /// Add a resource named `name` under the template's trailing wildcard.
    AddResource {
        template: AddressTemplate,
        name: String,
    },
    /// Re-read the data of the active view.
    RefreshView,
    /// Verify that an extension script is reachable. The result comes
    /// back as an event carrying the same token.
    VerifyScript { token: u64, script: String },
    /// Show a message in the status line.
    Status(String),
    Quit,
}
