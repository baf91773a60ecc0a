use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::models::*;
use crate::AppState;

use super::{created, ApiError};

pub async fn list_tenants(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TenantListQuery>,
) -> Json<Vec<Tenant>> {
    Json(state.store.list_tenants(query.status).await)
}

pub async fn get_tenant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Tenant>, ApiError> {
    let tenant = state.store.require_tenant(&id).await?;
    Ok(Json(tenant))
}

pub async fn create_tenant(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTenantRequest>,
) -> Result<(axum::http::StatusCode, Json<Tenant>), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    if !req.rent_amount.is_finite() || req.rent_amount < 0.0 {
        return Err(ApiError::bad_request("rentAmount must be a non-negative number"));
    }

    let tenant = state.store.create_tenant(req).await;
    Ok(created(tenant))
}

pub async fn update_tenant_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Tenant>, ApiError> {
    let tenant = state.store.update_tenant_status(&id, req.status).await?;
    Ok(Json(tenant))
}

pub async fn tenant_summary(State(state): State<Arc<AppState>>) -> Json<RosterSummary> {
    Json(state.store.summary().await)
}
