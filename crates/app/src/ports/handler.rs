//! Service handler port: probing remote geospatial endpoints.
//!
//! A handler wraps one remote endpoint speaking one protocol family (WMS,
//! WFS, CSW, ArcGIS REST, …). The factory resolves a URL and a declared type
//! into a handler, performing detection when the declared type is a wildcard
//! (`AUTO` or `OWS`). Adapter crates provide the concrete factory.

use std::future::Future;

use georeg_domain::service::ServiceDescription;
use georeg_domain::service_type::ServiceType;

/// Optional credentials forwarded to the remote endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    #[must_use]
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self { username, password }
    }
}

/// Why a handler could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// No handler family implements this service type.
    #[error("unsupported service type {0}")]
    Unsupported(ServiceType),

    /// No handler family recognised the endpoint.
    #[error("no service handler recognised {url}")]
    Unrecognised { url: String },

    /// Transport or decoding failure talking to the endpoint.
    #[error("could not reach {url}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// A resolved remote endpoint.
pub trait ServiceHandler: Send + Sync {
    /// The URL the handler was resolved for.
    fn url(&self) -> &str;

    /// The concrete protocol type detected for the endpoint.
    fn service_type(&self) -> ServiceType;

    /// Check that the endpoint still answers. Never fails; unreachable
    /// endpoints report `false`.
    fn probe(&self) -> impl Future<Output = bool> + Send;

    /// Metadata read from the endpoint while resolving it.
    fn describe(&self) -> ServiceDescription;
}

/// Pluggable resolver turning a URL and declared type into a handler.
pub trait ServiceHandlerFactory: Send + Sync {
    type Handler: ServiceHandler;

    fn resolve(
        &self,
        url: &str,
        service_type: &ServiceType,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Self::Handler, HandlerError>> + Send;
}
