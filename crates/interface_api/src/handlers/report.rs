//! Commission report handler

use axum::{
    extract::{Query, State},
    Json,
};

use crate::dto::report::{ReportQuery, ReportResponse};
use crate::{error::ApiError, AppState};

/// Builds the commission report for the requested month
///
/// A missing or one-sided period yields an empty report without a total.
pub async fn commission_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse>, ApiError> {
    let report = state.service.report(query.period()).await?;
    Ok(Json(report.into()))
}
