//! Storage port: repository traits for persistence.

use std::future::Future;

use georeg_domain::error::GeoRegError;
use georeg_domain::geoapp::GeoApp;
use georeg_domain::id::{GeoAppId, ServiceId};
use georeg_domain::service::Service;

/// Repository for registered remote [`Service`]s.
pub trait ServiceRepository: Send + Sync {
    /// Whether a service with exactly this base URL is already stored.
    fn exists_by_base_url(
        &self,
        base_url: &str,
    ) -> impl Future<Output = Result<bool, GeoRegError>> + Send;

    fn create(&self, service: Service) -> impl Future<Output = Result<Service, GeoRegError>> + Send;

    fn get_by_id(
        &self,
        id: ServiceId,
    ) -> impl Future<Output = Result<Option<Service>, GeoRegError>> + Send;

    /// All services, newest first.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Service>, GeoRegError>> + Send;

    fn update(&self, service: Service) -> impl Future<Output = Result<Service, GeoRegError>> + Send;

    fn delete(&self, id: ServiceId) -> impl Future<Output = Result<(), GeoRegError>> + Send;
}

/// Repository for [`GeoApp`]s. There is no delete: geoapps are never removed
/// through the API.
pub trait GeoAppRepository: Send + Sync {
    fn create(&self, app: GeoApp) -> impl Future<Output = Result<GeoApp, GeoRegError>> + Send;

    fn get_by_id(
        &self,
        id: GeoAppId,
    ) -> impl Future<Output = Result<Option<GeoApp>, GeoRegError>> + Send;

    /// All geoapps, newest first.
    fn get_all(&self) -> impl Future<Output = Result<Vec<GeoApp>, GeoRegError>> + Send;

    fn update(&self, app: GeoApp) -> impl Future<Output = Result<GeoApp, GeoRegError>> + Send;
}
