//! Remote services: external map servers registered in the catalogue.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{GeoRegError, ValidationError};
use crate::geometry::BoundingBox;
use crate::id::ServiceId;
use crate::service_type::{ServiceType, ServiceTypeMap};
use crate::time::{self, Timestamp};

pub const URL_MAX_LENGTH: usize = 512;
pub const CREDENTIAL_MAX_LENGTH: usize = 200;
pub const TITLE_MAX_LENGTH: usize = 255;

/// A registered remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub base_url: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub title: String,
    pub description: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub keywords: Vec<String>,
    pub username: Option<String>,
    pub extent: Option<BoundingBox>,
    pub created: Timestamp,
}

impl Service {
    /// Build the record for a freshly validated registration.
    ///
    /// Falls back to `fallback_title` when the remote endpoint did not
    /// advertise a title.
    #[must_use]
    pub fn from_registration(
        request: &RegistrationRequest,
        service_type: ServiceType,
        description: ServiceDescription,
        fallback_title: &str,
    ) -> Self {
        let title = description
            .title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| fallback_title.to_string());
        let abstract_text = description.abstract_text.unwrap_or_default();
        Self {
            id: ServiceId::new(),
            base_url: request.url.clone(),
            service_type,
            title: truncate(&title, TITLE_MAX_LENGTH),
            description: abstract_text.clone(),
            abstract_text,
            keywords: normalize_keywords(description.keywords),
            username: request.username.clone(),
            extent: description.extent,
            created: time::now(),
        }
    }

    /// Apply a validated edit to the user-editable fields.
    pub fn apply(&mut self, edit: ServiceEdit) {
        self.title = edit.title;
        self.description = edit.description;
        self.abstract_text = edit.abstract_text;
        self.keywords = edit.keywords;
    }
}

/// Metadata a protocol handler read from the remote endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceDescription {
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub keywords: Vec<String>,
    /// Geographic (WGS 84) extent, when known.
    pub extent: Option<BoundingBox>,
}

/// Proposed registration of a remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub url: String,
    #[serde(rename = "type", default = "default_declared_type")]
    pub service_type: ServiceType,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

fn default_declared_type() -> ServiceType {
    ServiceType::Auto
}

impl RegistrationRequest {
    /// Check field rules and normalise credentials.
    ///
    /// The URL is trimmed and must be an http(s) URL of at most 512
    /// characters; the declared type must be one of `choices`; blank
    /// username or password become `None`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoRegError::Validation`] for the first failing field.
    pub fn clean(mut self, choices: &ServiceTypeMap) -> Result<Self, GeoRegError> {
        self.url = self.url.trim().to_string();
        if self.url.is_empty() {
            return Err(ValidationError::Required { field: "url" }.into());
        }
        check_length("url", &self.url, URL_MAX_LENGTH)?;
        validate_http_url(&self.url)?;

        if !choices.contains_key(&self.service_type) {
            return Err(ValidationError::InvalidChoice {
                value: self.service_type.to_string(),
            }
            .into());
        }

        self.username = blank_to_none(self.username);
        self.password = blank_to_none(self.password);
        if let Some(username) = &self.username {
            check_length("username", username, CREDENTIAL_MAX_LENGTH)?;
        }
        if let Some(password) = &self.password {
            check_length("password", password, CREDENTIAL_MAX_LENGTH)?;
        }
        Ok(self)
    }
}

/// Edit form for the descriptive fields of a [`Service`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEdit {
    pub title: String,
    pub description: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[serde(default, deserialize_with = "keywords::deserialize")]
    pub keywords: Vec<String>,
}

impl ServiceEdit {
    /// Validate required fields and normalise keywords.
    ///
    /// # Errors
    ///
    /// Returns [`GeoRegError::Validation`] when title, description or
    /// abstract is blank, or the title exceeds 255 characters.
    pub fn clean(mut self) -> Result<Self, GeoRegError> {
        self.title = self.title.trim().to_string();
        require("title", &self.title)?;
        check_length("title", &self.title, TITLE_MAX_LENGTH)?;
        require("description", &self.description)?;
        require("abstract", &self.abstract_text)?;
        self.keywords = normalize_keywords(self.keywords);
        Ok(self)
    }
}

/// Trim keywords, drop empty ones and remove duplicates, keeping first
/// occurrences in order.
#[must_use]
pub fn normalize_keywords<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for keyword in keywords {
        let keyword = keyword.as_ref().trim();
        if !keyword.is_empty() && !out.iter().any(|k| k == keyword) {
            out.push(keyword.to_string());
        }
    }
    out
}

mod keywords {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Keywords {
        List(Vec<String>),
        Comma(String),
    }

    /// Accept either `["a", "b"]` or `"a, b"`.
    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<String>, D::Error> {
        Ok(match Keywords::deserialize(deserializer)? {
            Keywords::List(list) => list,
            Keywords::Comma(text) => text.split(',').map(str::to_string).collect(),
        })
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::InvalidUrl {
            value: value.to_string(),
        }),
    }
}

fn truncate(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service_type::core_service_types;

    fn request(url: &str) -> RegistrationRequest {
        RegistrationRequest {
            url: url.to_string(),
            service_type: ServiceType::Auto,
            username: None,
            password: None,
        }
    }

    #[test]
    fn should_normalize_blank_credentials_to_none() {
        let mut req = request("https://example.com/wms");
        req.username = Some(String::new());
        req.password = Some("  ".to_string());
        let cleaned = req.clean(&core_service_types()).unwrap();
        assert_eq!(cleaned.username, None);
        assert_eq!(cleaned.password, None);
    }

    #[test]
    fn should_keep_provided_credentials() {
        let mut req = request("https://example.com/wms");
        req.username = Some("admin".to_string());
        req.password = Some("secret".to_string());
        let cleaned = req.clean(&core_service_types()).unwrap();
        assert_eq!(cleaned.username.as_deref(), Some("admin"));
        assert_eq!(cleaned.password.as_deref(), Some("secret"));
    }

    #[test]
    fn should_reject_missing_or_invalid_url() {
        let choices = core_service_types();
        assert!(matches!(
            request("   ").clean(&choices),
            Err(GeoRegError::Validation(ValidationError::Required { field: "url" }))
        ));
        assert!(matches!(
            request("ftp://example.com").clean(&choices),
            Err(GeoRegError::Validation(ValidationError::InvalidUrl { .. }))
        ));
        let long = format!("https://example.com/{}", "a".repeat(URL_MAX_LENGTH));
        assert!(matches!(
            request(&long).clean(&choices),
            Err(GeoRegError::Validation(ValidationError::TooLong { field: "url", .. }))
        ));
    }

    #[test]
    fn should_reject_type_outside_choices() {
        let mut req = request("https://example.com/wfs");
        req.service_type = ServiceType::Wfs;
        let result = req.clean(&core_service_types());
        assert!(matches!(
            result,
            Err(GeoRegError::Validation(ValidationError::InvalidChoice { value })) if value == "WFS"
        ));
    }

    #[test]
    fn should_default_declared_type_to_auto() {
        let req: RegistrationRequest =
            serde_json::from_str(r#"{"url": "https://example.com"}"#).unwrap();
        assert_eq!(req.service_type, ServiceType::Auto);
    }

    #[test]
    fn should_reject_edit_without_title() {
        let edit = ServiceEdit {
            title: "  ".to_string(),
            description: "d".to_string(),
            abstract_text: "a".to_string(),
            keywords: vec![],
        };
        assert!(matches!(
            edit.clean(),
            Err(GeoRegError::Validation(ValidationError::Required { field: "title" }))
        ));
    }

    #[test]
    fn should_reject_overlong_title() {
        let edit = ServiceEdit {
            title: "t".repeat(TITLE_MAX_LENGTH + 1),
            description: "d".to_string(),
            abstract_text: "a".to_string(),
            keywords: vec![],
        };
        assert!(matches!(
            edit.clean(),
            Err(GeoRegError::Validation(ValidationError::TooLong { field: "title", .. }))
        ));
    }

    #[test]
    fn should_accept_comma_separated_keywords() {
        let edit: ServiceEdit = serde_json::from_str(
            r#"{"title": "T", "description": "D", "abstract": "A", "keywords": "roads, rivers,,roads"}"#,
        )
        .unwrap();
        let cleaned = edit.clean().unwrap();
        assert_eq!(cleaned.keywords, vec!["roads", "rivers"]);
    }

    #[test]
    fn should_fall_back_to_given_title() {
        let req = request("https://host/arcgis/rest/services/Roads/MapServer");
        let service = Service::from_registration(
            &req,
            ServiceType::RestMap,
            ServiceDescription::default(),
            "Roads",
        );
        assert_eq!(service.title, "Roads");
        assert_eq!(service.service_type, ServiceType::RestMap);
        assert_eq!(service.base_url, req.url);
    }

    #[test]
    fn should_apply_edit_fields() {
        let req = request("https://example.com/wms");
        let mut service =
            Service::from_registration(&req, ServiceType::Wms, ServiceDescription::default(), "x");
        service.apply(ServiceEdit {
            title: "New".to_string(),
            description: "Desc".to_string(),
            abstract_text: "Abs".to_string(),
            keywords: vec!["k".to_string()],
        });
        assert_eq!(service.title, "New");
        assert_eq!(service.abstract_text, "Abs");
        assert_eq!(service.keywords, vec!["k"]);
    }
}
