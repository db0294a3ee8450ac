//! Widget session API handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::geocoding::Geocoder;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::model::{Candidate, Field, Route};
use crate::overlay::{Bounds, OverlayHandle, OverlaySpec, OverlayState};
use crate::suggest::SuggestionList;
use crate::widget::{Resolution, SessionWidget};

#[derive(Serialize)]
pub struct HealthStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub sessions: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCreated {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InputUpdate {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SelectRequest {
    pub index: usize,
}

/// Body of a route submission. Missing sides use the current input text.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OpenRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShareLink {
    pub url: String,
}

/// What the front end needs to draw the current overlay.
#[derive(Debug, Serialize)]
pub struct OverlayView {
    pub state: &'static str,
    pub handle: Option<OverlayHandle>,
    pub spec: Option<OverlaySpec>,
    pub viewport: Option<Bounds>,
}

#[derive(Debug, Serialize)]
pub struct RouteView {
    pub route: Route,
    pub applied: bool,
    pub overlay: OverlayView,
}

fn session<G: Geocoder>(state: &AppState<G>, id: Uuid) -> Result<Arc<SessionWidget<G>>, ApiError> {
    state
        .registry
        .get(&id)
        .ok_or(ApiError::SessionNotFound(id))
}

fn overlay_view<G: Geocoder>(widget: &SessionWidget<G>) -> OverlayView {
    widget.with_overlay(|controller| {
        let viewport = controller.map().viewport();
        match controller.state() {
            OverlayState::Empty => OverlayView {
                state: "empty",
                handle: None,
                spec: None,
                viewport,
            },
            OverlayState::Attached { handle, .. } => OverlayView {
                state: "attached",
                handle: Some(handle),
                spec: controller.layer().spec(handle).cloned(),
                viewport,
            },
        }
    })
}

fn route_view<G: Geocoder>(widget: &SessionWidget<G>, resolution: Resolution) -> RouteView {
    RouteView {
        route: resolution.route,
        applied: resolution.applied,
        overlay: overlay_view(widget),
    }
}

pub async fn health<G: Geocoder>(State(state): State<AppState<G>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        sessions: state.registry.count(),
    })
}

pub async fn create_session<G: Geocoder>(
    State(state): State<AppState<G>>,
) -> Result<impl IntoResponse, ApiError> {
    let (id, _) = state.registry.create()?;
    Ok((StatusCode::CREATED, Json(SessionCreated { id })))
}

pub async fn close_session<G: Geocoder>(
    State(state): State<AppState<G>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.registry.close(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound(id))
    }
}

pub async fn update_input<G: Geocoder>(
    State(state): State<AppState<G>>,
    Path((id, field)): Path<(Uuid, Field)>,
    Json(update): Json<InputUpdate>,
) -> Result<StatusCode, ApiError> {
    session(&state, id)?.set_input(field, &update.text);
    Ok(StatusCode::ACCEPTED)
}

pub async fn get_suggestions<G: Geocoder>(
    State(state): State<AppState<G>>,
    Path((id, field)): Path<(Uuid, Field)>,
) -> Result<Json<SuggestionList>, ApiError> {
    Ok(Json(session(&state, id)?.suggestions(field)))
}

pub async fn select_suggestion<G: Geocoder>(
    State(state): State<AppState<G>>,
    Path((id, field)): Path<(Uuid, Field)>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<Candidate>, ApiError> {
    session(&state, id)?
        .select_suggestion(field, request.index)
        .map(Json)
        .ok_or(ApiError::SuggestionNotFound {
            field,
            index: request.index,
        })
}

pub async fn dismiss_suggestions<G: Geocoder>(
    State(state): State<AppState<G>>,
    Path((id, field)): Path<(Uuid, Field)>,
) -> Result<StatusCode, ApiError> {
    session(&state, id)?.dismiss_suggestions(field);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn submit_route<G: Geocoder>(
    State(state): State<AppState<G>>,
    Path(id): Path<Uuid>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<RouteView>, ApiError> {
    let widget = session(&state, id)?;
    let start = request.start.unwrap_or_else(|| widget.input(Field::Start));
    let end = request.end.unwrap_or_else(|| widget.input(Field::End));

    let resolution = widget.search(&start, &end).await?;
    Ok(Json(route_view(&widget, resolution)))
}

pub async fn get_overlay<G: Geocoder>(
    State(state): State<AppState<G>>,
    Path(id): Path<Uuid>,
) -> Result<Json<OverlayView>, ApiError> {
    let widget = session(&state, id)?;
    Ok(Json(overlay_view(&widget)))
}

pub async fn share<G: Geocoder>(
    State(state): State<AppState<G>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShareLink>, ApiError> {
    let url = session(&state, id)?.share()?;
    Ok(Json(ShareLink { url }))
}

pub async fn open_link<G: Geocoder>(
    State(state): State<AppState<G>>,
    Path(id): Path<Uuid>,
    Json(request): Json<OpenRequest>,
) -> Result<Json<RouteView>, ApiError> {
    let widget = session(&state, id)?;
    let resolution = widget.open_link(&request.url).await?;
    Ok(Json(route_view(&widget, resolution)))
}
