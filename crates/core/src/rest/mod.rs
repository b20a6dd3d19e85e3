//! Session-aware REST plumbing
//!
//! Control flow for one logical call:
//! [`client::RestClient`] → [`request::build_request`] (reads
//! [`session::SessionState`]) → [`ports::HttpTransport`] →
//! [`classifier::classify`] → either deliver, or silently sign in again and
//! retry the same call.

pub mod activity;
pub mod callback;
pub mod classifier;
pub mod client;
pub mod ports;
pub mod request;
pub mod session;
