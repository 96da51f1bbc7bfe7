//! Handler factory: protocol detection and capabilities retrieval.

use std::time::Duration;

use georeg_app::ports::{Credentials, HandlerError, ServiceHandlerFactory};
use georeg_domain::service::ServiceDescription;
use georeg_domain::service_type::ServiceType;
use reqwest::Client;
use url::Url;

use crate::arcgis::{self, Server};
use crate::capabilities::{self, Protocol};
use crate::error::OwsError;
use crate::handler::{OwsHandler, authorised_get};

/// Path appended to a GeoNode site URL to reach its OWS endpoint.
const GEONODE_OWS_PATH: &str = "geoserver/ows";

/// Configuration for the HTTP client used to reach remote services.
pub struct Config {
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }
}

/// reqwest-backed [`ServiceHandlerFactory`].
#[derive(Debug, Clone)]
pub struct OwsHandlerFactory {
    client: Client,
}

impl OwsHandlerFactory {
    /// Build the factory and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`OwsError::Http`] if the TLS backend cannot be initialised.
    pub fn new(config: &Config) -> Result<Self, OwsError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("georeg/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Types tried, in order, for a declared type.
    fn candidates(declared: &ServiceType) -> Vec<ServiceType> {
        match declared {
            ServiceType::Auto => vec![
                ServiceType::Wms,
                ServiceType::GnWms,
                ServiceType::Wfs,
                ServiceType::Csw,
                ServiceType::RestMap,
                ServiceType::RestImg,
            ],
            ServiceType::Ows => vec![ServiceType::Wms, ServiceType::GnWms, ServiceType::Wfs],
            concrete => vec![concrete.clone()],
        }
    }

    async fn try_type(
        &self,
        url: &str,
        service_type: &ServiceType,
        credentials: &Credentials,
    ) -> Result<Option<OwsHandler>, OwsError> {
        let base = Url::parse(url)?;
        let (probe_url, kind) = match service_type {
            ServiceType::Wms => (capabilities_url(&base, Protocol::Wms), Kind::Ogc(Protocol::Wms)),
            ServiceType::GnWms => (
                capabilities_url(&geonode_ows(&base)?, Protocol::Wms),
                Kind::Ogc(Protocol::Wms),
            ),
            ServiceType::Wfs => (capabilities_url(&base, Protocol::Wfs), Kind::Ogc(Protocol::Wfs)),
            ServiceType::Csw => (capabilities_url(&base, Protocol::Csw), Kind::Ogc(Protocol::Csw)),
            ServiceType::RestMap => (descriptor_url(&base), Kind::ArcGis(Server::Map)),
            ServiceType::RestImg => (descriptor_url(&base), Kind::ArcGis(Server::Image)),
            _ => return Ok(None),
        };

        if let Kind::ArcGis(server) = kind
            && !server.matches(url)
        {
            return Err(OwsError::Unexpected {
                expected: "ArcGIS REST",
            });
        }

        let body = self.fetch(probe_url.clone(), credentials).await?;
        let description = kind.parse(&body)?;

        Ok(Some(OwsHandler {
            url: url.to_string(),
            service_type: service_type.clone(),
            probe_url,
            description,
            client: self.client.clone(),
            credentials: credentials.clone(),
        }))
    }

    async fn fetch(&self, url: Url, credentials: &Credentials) -> Result<String, OwsError> {
        let response = authorised_get(&self.client, url, credentials).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(OwsError::Status { status });
        }
        Ok(response.text().await?)
    }
}

impl ServiceHandlerFactory for OwsHandlerFactory {
    type Handler = OwsHandler;

    #[tracing::instrument(skip(self, credentials))]
    async fn resolve(
        &self,
        url: &str,
        service_type: &ServiceType,
        credentials: &Credentials,
    ) -> Result<OwsHandler, HandlerError> {
        let detecting = service_type.is_wildcard();
        for candidate in Self::candidates(service_type) {
            match self.try_type(url, &candidate, credentials).await {
                Ok(Some(handler)) => {
                    tracing::debug!(detected = %candidate, "endpoint recognised");
                    return Ok(handler);
                }
                Ok(None) => return Err(HandlerError::Unsupported(candidate)),
                Err(err) if detecting => {
                    tracing::debug!(candidate = %candidate, error = %err, "endpoint not recognised");
                }
                Err(err) => return Err(err.into_handler_error(url)),
            }
        }
        Err(HandlerError::Unrecognised {
            url: url.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Ogc(Protocol),
    ArcGis(Server),
}

impl Kind {
    fn parse(self, body: &str) -> Result<ServiceDescription, OwsError> {
        match self {
            Self::Ogc(protocol) => capabilities::parse(protocol, body),
            Self::ArcGis(_) => arcgis::parse(body),
        }
    }
}

/// `url` with `params` replacing any same-named query parameter.
fn with_query(url: &Url, params: &[(&str, &str)]) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !params.iter().any(|(name, _)| key.eq_ignore_ascii_case(name)))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    let mut out = url.clone();
    out.set_query(None);
    out.query_pairs_mut().extend_pairs(kept).extend_pairs(params);
    out
}

fn capabilities_url(base: &Url, protocol: Protocol) -> Url {
    with_query(
        base,
        &[
            ("service", protocol.service_param()),
            ("request", "GetCapabilities"),
        ],
    )
}

fn descriptor_url(base: &Url) -> Url {
    with_query(base, &[("f", "json")])
}

fn geonode_ows(base: &Url) -> Result<Url, OwsError> {
    let mut site = base.clone();
    site.set_query(None);
    if !site.path().ends_with('/') {
        let path = format!("{}/", site.path());
        site.set_path(&path);
    }
    Ok(site.join(GEONODE_OWS_PATH)?)
}
