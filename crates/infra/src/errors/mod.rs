//! Error conversions owned by the infrastructure layer

pub mod conversions;

pub use conversions::{into_transport_error, InfraError};
