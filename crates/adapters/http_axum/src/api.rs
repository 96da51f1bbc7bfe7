//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod geoapps;
pub mod service_types;
#[allow(clippy::missing_errors_doc)]
pub mod services;

use axum::Router;
use axum::routing::get;

use georeg_app::ports::{GeoAppRepository, ServiceHandlerFactory, ServiceRepository};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<SR, F, GR>() -> Router<AppState<SR, F, GR>>
where
    SR: ServiceRepository + 'static,
    F: ServiceHandlerFactory + 'static,
    GR: GeoAppRepository + 'static,
{
    Router::new()
        // Service types
        .route("/service-types", get(service_types::list::<SR, F, GR>))
        // Services
        .route(
            "/services",
            get(services::list::<SR, F, GR>).post(services::register::<SR, F, GR>),
        )
        .route(
            "/services/{id}",
            get(services::get::<SR, F, GR>)
                .patch(services::edit::<SR, F, GR>)
                .delete(services::delete::<SR, F, GR>),
        )
        // GeoApps
        .route(
            "/geoapps",
            get(geoapps::list::<SR, F, GR>).post(geoapps::create::<SR, F, GR>),
        )
        .route(
            "/geoapps/{id}",
            get(geoapps::get::<SR, F, GR>)
                .patch(geoapps::patch::<SR, F, GR>)
                .put(geoapps::replace::<SR, F, GR>),
        )
}
