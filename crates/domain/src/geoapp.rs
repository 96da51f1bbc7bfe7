//! GeoApp: a client application (geostory, dashboard, …) stored as a
//! resource with an owner and an opaque JSON configuration blob.

use serde::{Deserialize, Serialize};

use crate::error::{GeoRegError, ValidationError};
use crate::geometry::BoundingBox;
use crate::id::GeoAppId;
use crate::time::{self, Timestamp};

pub const TITLE_MAX_LENGTH: usize = 255;
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// A stored geo application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoApp {
    pub id: GeoAppId,
    pub title: String,
    pub resource_type: String,
    pub owner: String,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub data: serde_json::Value,
    pub extent: Option<BoundingBox>,
    pub created: Timestamp,
}

impl GeoApp {
    /// Create a builder for constructing a [`GeoApp`].
    #[must_use]
    pub fn builder() -> GeoAppBuilder {
        GeoAppBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`GeoRegError::Validation`] when the title, resource type or
    /// owner is blank, or the title exceeds 255 characters.
    pub fn validate(&self) -> Result<(), GeoRegError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Required { field: "title" }.into());
        }
        if self.title.chars().count() > TITLE_MAX_LENGTH {
            return Err(ValidationError::TooLong {
                field: "title",
                max: TITLE_MAX_LENGTH,
            }
            .into());
        }
        if self.resource_type.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "resource_type",
            }
            .into());
        }
        if self.owner.trim().is_empty() {
            return Err(ValidationError::Required { field: "owner" }.into());
        }
        Ok(())
    }

    /// Overwrite every client-editable field (PUT semantics).
    pub fn replace(&mut self, draft: GeoAppDraft) {
        self.title = draft.title;
        self.resource_type = draft.resource_type;
        self.abstract_text = draft.abstract_text;
        self.data = draft.data;
        self.extent = draft.extent;
    }

    /// Overwrite only the fields present in `patch` (PATCH semantics).
    pub fn patch(&mut self, patch: GeoAppPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(resource_type) = patch.resource_type {
            self.resource_type = resource_type;
        }
        if let Some(abstract_text) = patch.abstract_text {
            self.abstract_text = Some(abstract_text);
        }
        if let Some(data) = patch.data {
            self.data = data;
        }
        if let Some(extent) = patch.extent {
            self.extent = Some(extent);
        }
    }
}

/// Step-by-step builder for [`GeoApp`].
#[derive(Debug, Default)]
pub struct GeoAppBuilder {
    id: Option<GeoAppId>,
    title: Option<String>,
    resource_type: Option<String>,
    owner: Option<String>,
    abstract_text: Option<String>,
    data: Option<serde_json::Value>,
    extent: Option<BoundingBox>,
    created: Option<Timestamp>,
}

impl GeoAppBuilder {
    #[must_use]
    pub fn id(mut self, id: GeoAppId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    #[must_use]
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    #[must_use]
    pub fn abstract_text(mut self, abstract_text: impl Into<String>) -> Self {
        self.abstract_text = Some(abstract_text.into());
        self
    }

    #[must_use]
    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn extent(mut self, extent: BoundingBox) -> Self {
        self.extent = Some(extent);
        self
    }

    #[must_use]
    pub fn created(mut self, created: Timestamp) -> Self {
        self.created = Some(created);
        self
    }

    /// Consume the builder, validate, and return a [`GeoApp`].
    ///
    /// # Errors
    ///
    /// Returns [`GeoRegError::Validation`] if a required field is missing.
    pub fn build(self) -> Result<GeoApp, GeoRegError> {
        let app = GeoApp {
            id: self.id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            resource_type: self.resource_type.unwrap_or_else(|| "geostory".to_string()),
            owner: self.owner.unwrap_or_default(),
            abstract_text: self.abstract_text,
            data: self.data.unwrap_or(serde_json::Value::Null),
            extent: self.extent,
            created: self.created.unwrap_or_else(time::now),
        };
        app.validate()?;
        Ok(app)
    }
}

/// Client-supplied fields for creating or fully replacing a geoapp.
///
/// There is deliberately no owner field: the owner is always the caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoAppDraft {
    pub title: String,
    #[serde(default = "default_resource_type")]
    pub resource_type: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub extent: Option<BoundingBox>,
}

fn default_resource_type() -> String {
    "geostory".to_string()
}

impl GeoAppDraft {
    /// Turn the draft into a new geoapp owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoRegError::Validation`] on invariant violations.
    pub fn into_geoapp(self, owner: &str) -> Result<GeoApp, GeoRegError> {
        let mut builder = GeoApp::builder()
            .title(self.title)
            .resource_type(self.resource_type)
            .owner(owner)
            .data(self.data);
        if let Some(abstract_text) = self.abstract_text {
            builder = builder.abstract_text(abstract_text);
        }
        if let Some(extent) = self.extent {
            builder = builder.extent(extent);
        }
        builder.build()
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeoAppPatch {
    pub title: Option<String>,
    pub resource_type: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub data: Option<serde_json::Value>,
    pub extent: Option<BoundingBox>,
}

/// Listing filters and pagination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoAppQuery {
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
    /// Exact resource type, e.g. `geostory`.
    pub resource_type: Option<String>,
    /// Exact owner name.
    pub owner: Option<String>,
    /// Keep geoapps whose extent intersects this box.
    pub extent: Option<BoundingBox>,
    /// 1-based page number.
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl GeoAppQuery {
    #[must_use]
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Whether `app` passes every filter set on the query.
    #[must_use]
    pub fn matches(&self, app: &GeoApp) -> bool {
        let search_ok = self.search.as_deref().is_none_or(|needle| {
            app.title
                .to_lowercase()
                .contains(&needle.trim().to_lowercase())
        });
        let resource_type_ok = self
            .resource_type
            .as_deref()
            .is_none_or(|wanted| app.resource_type == wanted);
        let owner_ok = self
            .owner
            .as_deref()
            .is_none_or(|wanted| app.owner == wanted);
        let extent_ok = self.extent.as_ref().is_none_or(|wanted| {
            app.extent
                .as_ref()
                .is_some_and(|extent| extent.intersects(wanted))
        });
        search_ok && resource_type_ok && owner_ok && extent_ok
    }
}

/// One page of geoapps plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoAppPage {
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub geoapps: Vec<GeoApp>,
}
