//! Contacts data access over the REST client

pub mod service;

pub use service::ContactsService;
