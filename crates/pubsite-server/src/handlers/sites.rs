//! Site management API.
//!
//! The caller's user id comes from a header set by a fronting
//! authentication proxy (`auth.owner_header`, default `x-owner-id`).

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use pubsite_registry::{NewSite, RegistryError, Site, SiteLookup, ValidationErrors};

use crate::error::ServerError;
use crate::state::AppState;

/// Message for a slug that is already registered.
const SLUG_TAKEN: &str = "This slug is already taken";

/// Owner id from the configured header.
fn owner_id(state: &AppState, headers: &HeaderMap) -> Result<i64, ServerError> {
    headers
        .get(&state.owner_header)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .ok_or(ServerError::Unauthorized)
}

/// Handle GET /api/sites.
pub(crate) async fn list_sites(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Site>>, ServerError> {
    let owner = owner_id(&state, &headers)?;
    let sites = state.registry.list_by_owner(owner).await?;
    Ok(Json(sites))
}

/// Handle POST /api/sites.
///
/// The owner is checked before the body, so an anonymous caller gets 401
/// whatever it sent.
pub(crate) async fn create_site(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<NewSite>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
    let owner = owner_id(&state, &headers)?;
    let Json(mut site) = body?;
    site.owner_id = owner;
    site.validate().map_err(ServerError::Validation)?;

    match state.registry.create(site).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(created))),
        Err(RegistryError::SlugTaken(_)) => {
            let mut errors = ValidationErrors::default();
            errors.add("slug", SLUG_TAKEN);
            Err(ServerError::Validation(errors))
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle DELETE /api/sites/{id}.
pub(crate) async fn delete_site(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let owner = owner_id(&state, &headers)?;
    let id: i64 = id.parse().map_err(|_| ServerError::InvalidSiteId(id))?;

    let site = match state.registry.find_by_id(id).await {
        SiteLookup::Found(site) => site,
        SiteLookup::NotFound => return Err(ServerError::SiteNotFound(id)),
        SiteLookup::Failure(e) => return Err(e.into()),
    };
    if site.owner_id != owner {
        tracing::warn!(id, owner, "Delete refused for non-owner");
        return Err(ServerError::Forbidden);
    }

    state.registry.delete(id).await?;
    Ok(StatusCode::OK)
}
