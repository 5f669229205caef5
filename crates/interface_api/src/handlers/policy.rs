//! Policy handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Form, Json,
};

use core_kernel::{FieldMap, PolicyCode};

use crate::dto::policy::{PolicyDetailsResponse, PolicySummary};
use crate::dto::SearchQuery;
use crate::{error::ApiError, AppState};

/// Lists policies, optionally filtered by code or insured name
pub async fn list_policies(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<PolicySummary>>, ApiError> {
    let policies = state.service.list_policies(query.search.as_deref()).await?;
    Ok(Json(policies.into_iter().map(PolicySummary::from).collect()))
}

/// Gets a policy with its vehicle and insured person
pub async fn get_policy(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<PolicyDetailsResponse>, ApiError> {
    let details = state.service.get_policy(&PolicyCode::new(code)).await?;
    Ok(Json(details.into()))
}

/// Edits a policy and its vehicle
pub async fn update_policy(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Form(fields): Form<FieldMap>,
) -> Result<Json<PolicyDetailsResponse>, ApiError> {
    let details = state.service.edit_policy(&PolicyCode::new(code), &fields).await?;
    Ok(Json(details.into()))
}

/// Deletes a policy
pub async fn delete_policy(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_policy(&PolicyCode::new(code)).await?;
    Ok(StatusCode::NO_CONTENT)
}
