//! # DFContacts Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest-backed [`HttpTransport`](dfcontacts_core::HttpTransport)
//! - Configuration loading from environment and files
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `dfcontacts-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

use std::sync::Arc;

use dfcontacts_core::{ContactsService, RestClient};
use dfcontacts_domain::{ClientConfig, Result};

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{ReqwestTransport, ReqwestTransportBuilder};
pub use observability::{init_tracing, LogFormat};

/// Build a [`RestClient`] over a [`ReqwestTransport`] configured from `config`
///
/// # Errors
/// Returns `DfError::Config` if the configuration is invalid or the HTTP
/// client cannot be built.
pub fn connect(config: ClientConfig) -> Result<Arc<RestClient>> {
    config.validate()?;
    let transport = ReqwestTransport::from_config(&config)?;
    tracing::info!(base_url = %config.trimmed_base_url(), "Connecting to DreamFactory");
    Ok(Arc::new(RestClient::new(config, Arc::new(transport))?))
}

/// [`connect`] and wrap the client in a [`ContactsService`]
///
/// # Errors
/// See [`connect`].
pub fn contacts_service(config: ClientConfig) -> Result<ContactsService> {
    connect(config).map(ContactsService::new)
}
