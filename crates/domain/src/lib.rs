//! # DFContacts Domain
//!
//! Domain types shared by every DFContacts crate.
//!
//! This crate contains:
//! - Logical REST call descriptions and their outcomes
//! - Wire-level request/response values exchanged with a transport
//! - Contact, group and contact-detail records
//! - Client configuration and domain constants
//! - Domain error type and Result definition
//!
//! ## Architecture
//! - No dependencies on other DFContacts crates
//! - Only external dependencies allowed
//! - Pure data, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::ClientConfig;
pub use errors::*;
pub use types::*;
