//! ArcGIS REST `MapServer` / `ImageServer` descriptors (`?f=json`).

use georeg_domain::esri;
use georeg_domain::service::ServiceDescription;
use serde_json::Value;

use crate::error::OwsError;

/// Kind of ArcGIS REST endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Server {
    Map,
    Image,
}

impl Server {
    fn segment(self) -> &'static str {
        match self {
            Self::Map => "/MapServer",
            Self::Image => "/ImageServer",
        }
    }

    /// Whether `url` points at this kind of endpoint.
    #[must_use]
    pub fn matches(self, url: &str) -> bool {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        path.trim_end_matches('/').ends_with(self.segment())
    }
}

/// Parse an ArcGIS service descriptor.
///
/// # Errors
///
/// Returns [`OwsError::Json`] for invalid JSON and [`OwsError::Unexpected`]
/// when the body is not an object or carries an `error` member.
pub fn parse(body: &str) -> Result<ServiceDescription, OwsError> {
    let descriptor: Value = serde_json::from_str(body)?;
    if !descriptor.is_object() || descriptor.get("error").is_some() {
        return Err(OwsError::Unexpected {
            expected: "ArcGIS REST",
        });
    }

    let document_info = descriptor.get("documentInfo");
    let title = document_info
        .and_then(|info| non_empty(info.get("Title")))
        .or_else(|| non_empty(descriptor.get("mapName")))
        .or_else(|| non_empty(descriptor.get("name")));
    let abstract_text = non_empty(descriptor.get("serviceDescription"))
        .or_else(|| non_empty(descriptor.get("description")));
    let keywords = document_info
        .and_then(|info| non_empty(info.get("Keywords")))
        .map(|raw| raw.split(',').map(str::to_string).collect())
        .unwrap_or_default();

    Ok(ServiceDescription {
        title,
        abstract_text,
        keywords,
        extent: esri::extract_extent(&descriptor).geographic_bounds(),
    })
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
