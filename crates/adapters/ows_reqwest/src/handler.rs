//! Resolved remote endpoint.

use georeg_app::ports::{Credentials, ServiceHandler};
use georeg_domain::service::ServiceDescription;
use georeg_domain::service_type::ServiceType;
use reqwest::{Client, RequestBuilder};
use url::Url;

/// A remote endpoint whose protocol has been confirmed.
#[derive(Debug, Clone)]
pub struct OwsHandler {
    pub(crate) url: String,
    pub(crate) service_type: ServiceType,
    /// Document fetched again by [`probe`](ServiceHandler::probe).
    pub(crate) probe_url: Url,
    pub(crate) description: ServiceDescription,
    pub(crate) client: Client,
    pub(crate) credentials: Credentials,
}

impl ServiceHandler for OwsHandler {
    fn url(&self) -> &str {
        &self.url
    }

    fn service_type(&self) -> ServiceType {
        self.service_type.clone()
    }

    async fn probe(&self) -> bool {
        let request = authorised_get(&self.client, self.probe_url.clone(), &self.credentials);
        match request.send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(url = %self.probe_url, status = %response.status(), "probe rejected");
                false
            }
            Err(err) => {
                tracing::warn!(url = %self.probe_url, error = %err, "probe failed");
                false
            }
        }
    }

    fn describe(&self) -> ServiceDescription {
        self.description.clone()
    }
}

/// GET `url`, with basic auth when a username is configured.
pub(crate) fn authorised_get(client: &Client, url: Url, credentials: &Credentials) -> RequestBuilder {
    let request = client.get(url);
    match credentials.username.as_deref() {
        Some(username) => request.basic_auth(username, credentials.password.as_deref()),
        None => request,
    }
}
