//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`GeoRegError`]
//! via `From`. Adapters box their own error types into
//! [`GeoRegError::Storage`].

use crate::service_type::ServiceType;

/// Top-level error shared by the domain, application and adapter layers.
#[derive(Debug, thiserror::Error)]
pub enum GeoRegError {
    /// Input failed a domain invariant.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The requested record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A remote service registration was rejected.
    #[error("registration rejected")]
    Registration(#[from] RegistrationError),

    /// A write was attempted without an authenticated caller.
    #[error("authentication required")]
    Unauthorized,

    /// Persistence or other infrastructure failure.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Field-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was missing or blank.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// A field exceeded its maximum length.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// A URL could not be parsed or used an unsupported scheme.
    #[error("{value} is not a valid http(s) URL")]
    InvalidUrl { value: String },

    /// The declared service type is not one of the available choices.
    #[error("{value} is not one of the available service types")]
    InvalidChoice { value: String },

    /// An identifier in a path or body could not be parsed.
    #[error("{value} is not a valid identifier")]
    InvalidId { value: String },

    /// A bounding box did not have four finite coordinates.
    #[error("invalid bounding box: {value}")]
    InvalidBoundingBox { value: String },
}

/// The referenced record was not found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// User-facing reasons a service registration is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// A service with the same base URL is already registered.
    #[error("Service {url} is already registered")]
    DuplicateService { url: String },

    /// The endpoint could not be resolved or did not answer the probe.
    #[error("Could not connect to the service at {url}")]
    Connection { url: String },

    /// The endpoint answered as a different service type than declared.
    #[error("Found service of type {found} instead of {expected}")]
    TypeMismatch {
        url: String,
        expected: ServiceType,
        found: ServiceType,
    },
}
