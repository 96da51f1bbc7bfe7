//! GeoApp service: use-cases behind the geoapp resource endpoint.
//!
//! Reads are open to everyone. Writes need an authenticated caller, who
//! always becomes the owner of what they create.

use georeg_domain::error::{GeoRegError, NotFoundError};
use georeg_domain::execution_request::ExecutionRequestAction;
use georeg_domain::geoapp::{GeoApp, GeoAppDraft, GeoAppPage, GeoAppPatch, GeoAppQuery};
use georeg_domain::id::GeoAppId;

use crate::ports::GeoAppRepository;

/// Application service for geoapps.
pub struct GeoAppService<R> {
    repo: R,
}

impl<R: GeoAppRepository> GeoAppService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a geoapp owned by `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoRegError::Unauthorized`] without a caller,
    /// [`GeoRegError::Validation`] for an invalid draft, or a storage error.
    #[tracing::instrument(skip(self, draft), fields(action = %ExecutionRequestAction::Create))]
    pub async fn create(
        &self,
        caller: Option<&str>,
        draft: GeoAppDraft,
    ) -> Result<GeoApp, GeoRegError> {
        let owner = authenticated(caller)?;
        let app = draft.into_geoapp(owner)?;
        self.repo.create(app).await
    }

    /// Look up a geoapp by id.
    ///
    /// # Errors
    ///
    /// Returns [`GeoRegError::NotFound`] when no geoapp with `id` exists,
    /// or a storage error from the repository.
    pub async fn get(&self, id: GeoAppId) -> Result<GeoApp, GeoRegError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "GeoApp",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// One page of geoapps matching `query`, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self, query: &GeoAppQuery) -> Result<GeoAppPage, GeoRegError> {
        let matching: Vec<GeoApp> = self
            .repo
            .get_all()
            .await?
            .into_iter()
            .filter(|app| query.matches(app))
            .collect();

        let page = query.page();
        let page_size = query.page_size();
        let total = matching.len();
        let geoapps = matching
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();

        Ok(GeoAppPage {
            total,
            page,
            page_size,
            geoapps,
        })
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`GeoRegError::Unauthorized`] without a caller,
    /// [`GeoRegError::NotFound`] for an unknown id,
    /// [`GeoRegError::Validation`] if the result is invalid, or a storage
    /// error.
    #[tracing::instrument(skip(self, patch), fields(action = %ExecutionRequestAction::Update))]
    pub async fn patch(
        &self,
        caller: Option<&str>,
        id: GeoAppId,
        patch: GeoAppPatch,
    ) -> Result<GeoApp, GeoRegError> {
        authenticated(caller)?;
        let mut app = self.get(id).await?;
        app.patch(patch);
        app.validate()?;
        self.repo.update(app).await
    }

    /// Replace every editable field.
    ///
    /// # Errors
    ///
    /// Same as [`patch`](Self::patch).
    #[tracing::instrument(skip(self, draft), fields(action = %ExecutionRequestAction::Update))]
    pub async fn replace(
        &self,
        caller: Option<&str>,
        id: GeoAppId,
        draft: GeoAppDraft,
    ) -> Result<GeoApp, GeoRegError> {
        authenticated(caller)?;
        let mut app = self.get(id).await?;
        app.replace(draft);
        app.validate()?;
        self.repo.update(app).await
    }
}

fn authenticated(caller: Option<&str>) -> Result<&str, GeoRegError> {
    caller
        .map(str::trim)
        .filter(|user| !user.is_empty())
        .ok_or(GeoRegError::Unauthorized)
}
