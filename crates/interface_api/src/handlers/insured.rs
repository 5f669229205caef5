//! Insured person handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Form, Json,
};

use core_kernel::{FieldMap, InsuredId};

use crate::dto::insured::{InsuredDetailsResponse, InsuredResponse};
use crate::dto::policy::PolicyDetailsResponse;
use crate::dto::SearchQuery;
use crate::{error::ApiError, AppState};

/// Lists insured persons, optionally filtered by name
pub async fn list_insured(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<InsuredResponse>>, ApiError> {
    let insured = state.service.list_insured(query.search.as_deref()).await?;
    Ok(Json(insured.into_iter().map(InsuredResponse::from).collect()))
}

/// Registers an insured person
pub async fn create_insured(
    State(state): State<AppState>,
    Form(fields): Form<FieldMap>,
) -> Result<(StatusCode, Json<InsuredResponse>), ApiError> {
    let insured = state.service.register_insured(&fields).await?;
    Ok((StatusCode::CREATED, Json(insured.into())))
}

/// Gets an insured person with their policies
pub async fn get_insured(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<InsuredDetailsResponse>, ApiError> {
    let details = state.service.get_insured(InsuredId::new(id)).await?;
    Ok(Json(details.into()))
}

/// Replaces an insured person's data
pub async fn update_insured(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(fields): Form<FieldMap>,
) -> Result<Json<InsuredResponse>, ApiError> {
    let insured = state.service.edit_insured(InsuredId::new(id), &fields).await?;
    Ok(Json(insured.into()))
}

/// Deletes an insured person with their policies
pub async fn delete_insured(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_insured(InsuredId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Registers a policy and its vehicle for an insured person
pub async fn create_policy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(fields): Form<FieldMap>,
) -> Result<(StatusCode, Json<PolicyDetailsResponse>), ApiError> {
    let details = state.service.register_policy(InsuredId::new(id), &fields).await?;
    Ok((StatusCode::CREATED, Json(details.into())))
}
