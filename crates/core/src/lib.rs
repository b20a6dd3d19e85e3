//! # DFContacts Core
//!
//! Session-aware REST client logic - no concrete HTTP.
//!
//! This crate contains:
//! - The [`HttpTransport`] port a concrete HTTP stack implements
//! - Session state, request building and response classification
//! - The [`RestClient`] orchestrator with silent reauthentication and
//!   ordered call chains
//! - The UI-facing [`CallbackClient`] with explicit result dispatch
//! - The contacts data-access service
//!
//! ## Architecture Principles
//! - Only depends on `dfcontacts-domain`
//! - All I/O goes through traits
//! - Every call terminates in a delivered `CallResult`, never a panic

pub mod contacts;
pub mod rest;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export specific items to avoid ambiguity
pub use contacts::ContactsService;
pub use rest::activity::{ActivityCounter, ActivityGuard};
pub use rest::callback::{CallbackClient, InlineDispatcher, MainQueue, QueueDispatcher, ResultDispatcher};
pub use rest::client::RestClient;
pub use rest::ports::HttpTransport;
pub use rest::session::{SessionSnapshot, SessionState};
