//! Application constants
//!
//! Centralized location for the DreamFactory wire names and client defaults.

// Request headers
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_CONTENT_LENGTH: &str = "Content-Length";
pub const HEADER_API_KEY: &str = "X-DreamFactory-Api-Key";
pub const HEADER_SESSION_TOKEN: &str = "X-DreamFactory-Session-Token";
pub const CONTENT_TYPE_JSON: &str = "application/json";

// Client defaults
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Active-call count at which silent reauthentication stops retrying.
pub const DEFAULT_REAUTH_CEILING: usize = 20;

// Auth endpoints
pub const PATH_USER_SESSION: &str = "/user/session";
pub const PATH_USER_REGISTER: &str = "/user/register";

// Sign-in response fields
pub const FIELD_SESSION_TOKEN: &str = "session_token";
pub const FIELD_EMAIL: &str = "email";

// Table endpoints
pub const TABLE_CONTACT: &str = "/db/_table/contact";
pub const TABLE_CONTACT_GROUP: &str = "/db/_table/contact_group";
pub const TABLE_CONTACT_GROUP_RELATIONSHIP: &str = "/db/_table/contact_group_relationship";
pub const TABLE_CONTACT_INFO: &str = "/db/_table/contact_info";

// Query parameter names
pub const PARAM_FILTER: &str = "filter";
pub const PARAM_ORDER: &str = "order";
pub const PARAM_RELATED: &str = "related";
pub const PARAM_ID_FIELD: &str = "id_field";

/// Envelope key of list responses and bulk request bodies.
pub const RESOURCE_KEY: &str = "resource";
/// Relation embedded by the relationship table when `related` is requested.
pub const RELATED_CONTACT: &str = "contact_by_contact_id";

/// Message shown when the server did not supply one.
pub const GENERIC_FAILURE_MESSAGE: &str = "Unable to complete the request.";
pub const MISSING_SESSION_TOKEN_MESSAGE: &str = "No session token found.";
