//! Management endpoint access: the client trait, the in-memory demo server
//! and asynchronous script verification.

pub mod client;
pub mod demo;
pub mod verify;

/// Well known resource addresses of the managed domain.
pub mod addresses {
    pub const KEY_MANAGER: &str = "/subsystem=tls/key-manager=*";
    pub const SECURITY_DOMAIN: &str = "/subsystem=tls/security-domain=*";
    pub const TRUST_MANAGER: &str = "/subsystem=tls/trust-manager=*";
    pub const EXTENSION: &str = "/console-extension=*";
}
