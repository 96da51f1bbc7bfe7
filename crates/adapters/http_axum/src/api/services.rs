//! JSON REST handlers for registered remote services.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use georeg_app::ports::{GeoAppRepository, ServiceHandlerFactory, ServiceRepository};
use georeg_domain::id::ServiceId;
use georeg_domain::service::{RegistrationRequest, Service, ServiceEdit};

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Service>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get and edit endpoints.
pub enum GetResponse {
    Ok(Json<Service>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the register endpoint.
pub enum RegisterResponse {
    Created(Json<Service>),
}

impl IntoResponse for RegisterResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/services`
pub async fn list<SR, F, GR>(
    State(state): State<AppState<SR, F, GR>>,
) -> Result<ListResponse, ApiError>
where
    SR: ServiceRepository + 'static,
    F: ServiceHandlerFactory + 'static,
    GR: GeoAppRepository + 'static,
{
    let services = state.service_catalog.list().await?;
    Ok(ListResponse::Ok(Json(services)))
}

/// `GET /api/services/:id`
pub async fn get<SR, F, GR>(
    State(state): State<AppState<SR, F, GR>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    SR: ServiceRepository + 'static,
    F: ServiceHandlerFactory + 'static,
    GR: GeoAppRepository + 'static,
{
    let id = ServiceId::parse(&id).map_err(georeg_domain::error::GeoRegError::from)?;
    let service = state.service_catalog.get(id).await?;
    Ok(GetResponse::Ok(Json(service)))
}

/// `POST /api/services`
pub async fn register<SR, F, GR>(
    State(state): State<AppState<SR, F, GR>>,
    Json(req): Json<RegistrationRequest>,
) -> Result<RegisterResponse, ApiError>
where
    SR: ServiceRepository + 'static,
    F: ServiceHandlerFactory + 'static,
    GR: GeoAppRepository + 'static,
{
    let created = state.service_catalog.register(req).await?;
    Ok(RegisterResponse::Created(Json(created)))
}

/// `PATCH /api/services/:id`
pub async fn edit<SR, F, GR>(
    State(state): State<AppState<SR, F, GR>>,
    Path(id): Path<String>,
    Json(req): Json<ServiceEdit>,
) -> Result<GetResponse, ApiError>
where
    SR: ServiceRepository + 'static,
    F: ServiceHandlerFactory + 'static,
    GR: GeoAppRepository + 'static,
{
    let id = ServiceId::parse(&id).map_err(georeg_domain::error::GeoRegError::from)?;
    let service = state.service_catalog.edit(id, req).await?;
    Ok(GetResponse::Ok(Json(service)))
}

/// `DELETE /api/services/:id`
pub async fn delete<SR, F, GR>(
    State(state): State<AppState<SR, F, GR>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    SR: ServiceRepository + 'static,
    F: ServiceHandlerFactory + 'static,
    GR: GeoAppRepository + 'static,
{
    let id = ServiceId::parse(&id).map_err(georeg_domain::error::GeoRegError::from)?;
    state.service_catalog.delete(id).await?;
    Ok(DeleteResponse::NoContent)
}
