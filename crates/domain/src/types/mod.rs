//! Domain types and models

pub mod call;
pub mod outcome;
pub mod records;
pub mod wire;

pub use call::{HttpMethod, LogicalCall};
pub use outcome::{CallFailure, CallResult, FailureKind};
pub use records::{ContactDetailRecord, ContactRecord, GroupRecord};
pub use wire::{HttpRequest, HttpResponse, TransportError};
