//! JSON handler listing the service types a registration may declare.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use georeg_app::ports::{GeoAppRepository, ServiceHandlerFactory, ServiceRepository};

use crate::state::AppState;

/// One selectable service type.
#[derive(Debug, Serialize)]
pub struct ServiceTypeView {
    pub key: String,
    pub label: String,
    pub ows: bool,
}

/// `GET /api/service-types`
pub async fn list<SR, F, GR>(State(state): State<AppState<SR, F, GR>>) -> Json<Vec<ServiceTypeView>>
where
    SR: ServiceRepository + 'static,
    F: ServiceHandlerFactory + 'static,
    GR: GeoAppRepository + 'static,
{
    let types = state
        .service_catalog
        .service_types()
        .iter()
        .map(|(key, descriptor)| ServiceTypeView {
            key: key.to_string(),
            label: descriptor.label.clone(),
            ows: descriptor.ows,
        })
        .collect();
    Json(types)
}
