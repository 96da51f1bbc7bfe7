//! Service catalogue: registering and maintaining remote services.

use std::sync::Arc;

use georeg_domain::error::{GeoRegError, NotFoundError};
use georeg_domain::esri;
use georeg_domain::execution_request::ExecutionRequestAction;
use georeg_domain::id::ServiceId;
use georeg_domain::service::{RegistrationRequest, Service, ServiceEdit};
use georeg_domain::service_type::ServiceTypeMap;

use crate::ports::{ServiceHandler, ServiceHandlerFactory, ServiceRepository};
use crate::services::registration::validate_registration;

/// Application service for remote services.
pub struct ServiceCatalog<R, F> {
    repo: R,
    factory: F,
    service_types: Arc<ServiceTypeMap>,
}

impl<R, F> ServiceCatalog<R, F>
where
    R: ServiceRepository,
    F: ServiceHandlerFactory,
{
    /// Create a catalogue offering `service_types` as the valid choices.
    pub fn new(repo: R, factory: F, service_types: Arc<ServiceTypeMap>) -> Self {
        Self {
            repo,
            factory,
            service_types,
        }
    }

    /// The service types a registration may declare.
    #[must_use]
    pub fn service_types(&self) -> &ServiceTypeMap {
        &self.service_types
    }

    /// Validate and persist a new remote service.
    ///
    /// The stored record takes its type from the handler, so `AUTO` and
    /// `OWS` declarations are replaced by the detected protocol.
    ///
    /// # Errors
    ///
    /// Returns [`GeoRegError::Validation`] for malformed fields,
    /// [`GeoRegError::Registration`] when the registration is rejected, or a
    /// storage error from the repository.
    #[tracing::instrument(skip_all, fields(action = %ExecutionRequestAction::Create))]
    pub async fn register(&self, request: RegistrationRequest) -> Result<Service, GeoRegError> {
        let request = request.clean(&self.service_types)?;
        let validated = validate_registration(&self.repo, &self.factory, request).await?;

        let handler = &validated.handler;
        let fallback_title = esri::service_name(handler.url()).to_string();
        let service = Service::from_registration(
            &validated.request,
            validated.service_type.clone(),
            handler.describe(),
            &fallback_title,
        );
        let created = self.repo.create(service).await?;
        tracing::info!(
            id = %created.id,
            url = %created.base_url,
            service_type = %created.service_type,
            "registered remote service"
        );
        Ok(created)
    }

    /// Look up a service by id.
    ///
    /// # Errors
    ///
    /// Returns [`GeoRegError::NotFound`] when no service with `id` exists,
    /// or a storage error from the repository.
    pub async fn get(&self, id: ServiceId) -> Result<Service, GeoRegError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Service",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all services, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self) -> Result<Vec<Service>, GeoRegError> {
        self.repo.get_all().await
    }

    /// Update the descriptive fields of a service.
    ///
    /// # Errors
    ///
    /// Returns [`GeoRegError::Validation`] if the edit is invalid,
    /// [`GeoRegError::NotFound`] for an unknown id, or a storage error.
    #[tracing::instrument(skip(self, edit), fields(action = %ExecutionRequestAction::Update))]
    pub async fn edit(&self, id: ServiceId, edit: ServiceEdit) -> Result<Service, GeoRegError> {
        let edit = edit.clean()?;
        let mut service = self.get(id).await?;
        service.apply(edit);
        self.repo.update(service).await
    }

    /// Remove a service.
    ///
    /// # Errors
    ///
    /// Returns [`GeoRegError::NotFound`] for an unknown id, or a storage
    /// error.
    #[tracing::instrument(skip(self), fields(action = %ExecutionRequestAction::Delete))]
    pub async fn delete(&self, id: ServiceId) -> Result<(), GeoRegError> {
        let service = self.get(id).await?;
        self.repo.delete(service.id).await?;
        tracing::info!(url = %service.base_url, "removed remote service");
        Ok(())
    }
}
