//! Shared application state for axum handlers.

use std::sync::Arc;

use georeg_app::ports::{GeoAppRepository, ServiceHandlerFactory, ServiceRepository};
use georeg_app::services::geoapp_service::GeoAppService;
use georeg_app::services::service_catalog::ServiceCatalog;

/// Application state shared across all axum handlers.
///
/// Generic over the service repository, handler factory and geoapp
/// repository to avoid dynamic dispatch. `Clone` is implemented manually so
/// the underlying types themselves do not need to be `Clone`; only the `Arc`
/// wrappers are cloned.
pub struct AppState<SR, F, GR> {
    /// Remote service catalogue.
    pub service_catalog: Arc<ServiceCatalog<SR, F>>,
    /// GeoApp CRUD service.
    pub geoapp_service: Arc<GeoAppService<GR>>,
}

impl<SR, F, GR> Clone for AppState<SR, F, GR> {
    fn clone(&self) -> Self {
        Self {
            service_catalog: Arc::clone(&self.service_catalog),
            geoapp_service: Arc::clone(&self.geoapp_service),
        }
    }
}

impl<SR, F, GR> AppState<SR, F, GR>
where
    SR: ServiceRepository + 'static,
    F: ServiceHandlerFactory + 'static,
    GR: GeoAppRepository + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(service_catalog: ServiceCatalog<SR, F>, geoapp_service: GeoAppService<GR>) -> Self {
        Self {
            service_catalog: Arc::new(service_catalog),
            geoapp_service: Arc::new(geoapp_service),
        }
    }
}
