//! JSON REST handlers for geoapps.
//!
//! Reads are anonymous; writes need a [`RemoteUser`].

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use georeg_app::ports::{GeoAppRepository, ServiceHandlerFactory, ServiceRepository};
use georeg_domain::error::GeoRegError;
use georeg_domain::geoapp::{GeoApp, GeoAppDraft, GeoAppPage, GeoAppPatch, GeoAppQuery};
use georeg_domain::geometry::BoundingBox;
use georeg_domain::id::GeoAppId;

use crate::auth::RemoteUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Query string of the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub resource_type: Option<String>,
    pub owner: Option<String>,
    /// `minx,miny,maxx,maxy`
    pub extent: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl TryFrom<ListParams> for GeoAppQuery {
    type Error = GeoRegError;

    fn try_from(params: ListParams) -> Result<Self, Self::Error> {
        let extent = params
            .extent
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| raw.parse::<BoundingBox>())
            .transpose()?;
        Ok(Self {
            search: non_blank(params.search),
            resource_type: non_blank(params.resource_type).map(|s| s.trim().to_string()),
            owner: non_blank(params.owner).map(|s| s.trim().to_string()),
            extent,
            page: params.page,
            page_size: params.page_size,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<GeoAppPage>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get, patch and replace endpoints.
pub enum GetResponse {
    Ok(Json<GeoApp>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<GeoApp>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

fn parse_id(id: &str) -> Result<GeoAppId, ApiError> {
    Ok(GeoAppId::parse(id).map_err(GeoRegError::from)?)
}

/// `GET /api/geoapps`
pub async fn list<SR, F, GR>(
    State(state): State<AppState<SR, F, GR>>,
    Query(params): Query<ListParams>,
) -> Result<ListResponse, ApiError>
where
    SR: ServiceRepository + 'static,
    F: ServiceHandlerFactory + 'static,
    GR: GeoAppRepository + 'static,
{
    let query = GeoAppQuery::try_from(params)?;
    let page = state.geoapp_service.list(&query).await?;
    Ok(ListResponse::Ok(Json(page)))
}

/// `GET /api/geoapps/:id`
pub async fn get<SR, F, GR>(
    State(state): State<AppState<SR, F, GR>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    SR: ServiceRepository + 'static,
    F: ServiceHandlerFactory + 'static,
    GR: GeoAppRepository + 'static,
{
    let app = state.geoapp_service.get(parse_id(&id)?).await?;
    Ok(GetResponse::Ok(Json(app)))
}

/// `POST /api/geoapps`
pub async fn create<SR, F, GR>(
    State(state): State<AppState<SR, F, GR>>,
    user: RemoteUser,
    Json(draft): Json<GeoAppDraft>,
) -> Result<CreateResponse, ApiError>
where
    SR: ServiceRepository + 'static,
    F: ServiceHandlerFactory + 'static,
    GR: GeoAppRepository + 'static,
{
    let created = state.geoapp_service.create(user.as_deref(), draft).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PATCH /api/geoapps/:id`
pub async fn patch<SR, F, GR>(
    State(state): State<AppState<SR, F, GR>>,
    user: RemoteUser,
    Path(id): Path<String>,
    Json(patch): Json<GeoAppPatch>,
) -> Result<GetResponse, ApiError>
where
    SR: ServiceRepository + 'static,
    F: ServiceHandlerFactory + 'static,
    GR: GeoAppRepository + 'static,
{
    let app = state
        .geoapp_service
        .patch(user.as_deref(), parse_id(&id)?, patch)
        .await?;
    Ok(GetResponse::Ok(Json(app)))
}

/// `PUT /api/geoapps/:id`
pub async fn replace<SR, F, GR>(
    State(state): State<AppState<SR, F, GR>>,
    user: RemoteUser,
    Path(id): Path<String>,
    Json(draft): Json<GeoAppDraft>,
) -> Result<GetResponse, ApiError>
where
    SR: ServiceRepository + 'static,
    F: ServiceHandlerFactory + 'static,
    GR: GeoAppRepository + 'static,
{
    let app = state
        .geoapp_service
        .replace(user.as_deref(), parse_id(&id)?, draft)
        .await?;
    Ok(GetResponse::Ok(Json(app)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_extent_parameter() {
        let query = GeoAppQuery::try_from(ListParams {
            extent: Some("0,0,10,10".to_string()),
            page: Some(2),
            ..ListParams::default()
        })
        .unwrap();
        assert_eq!(query.extent, Some(BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap()));
        assert_eq!(query.page, Some(2));
    }

    #[test]
    fn should_reject_malformed_extent_parameter() {
        let result = GeoAppQuery::try_from(ListParams {
            extent: Some("0,0,10".to_string()),
            ..ListParams::default()
        });
        assert!(matches!(result, Err(GeoRegError::Validation(_))));
    }

    #[test]
    fn should_ignore_blank_filters() {
        let query = GeoAppQuery::try_from(ListParams {
            search: Some("  ".to_string()),
            owner: Some(String::new()),
            extent: Some(String::new()),
            ..ListParams::default()
        })
        .unwrap();
        assert_eq!(query, GeoAppQuery::default());
    }

    #[test]
    fn should_pass_resource_type_and_owner_filters() {
        let query = GeoAppQuery::try_from(ListParams {
            resource_type: Some("dashboard".to_string()),
            owner: Some(" alice ".to_string()),
            ..ListParams::default()
        })
        .unwrap();
        assert_eq!(query.resource_type.as_deref(), Some("dashboard"));
        assert_eq!(query.owner.as_deref(), Some("alice"));
    }
}
