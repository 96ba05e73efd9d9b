use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Extension, Json,
};
use placepulse_core::AnalysisRecord;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_analysis_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct CreateAnalysisRequest {
    /// A place name or a map URL. `url` is accepted for older clients.
    #[serde(alias = "url")]
    pub input: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListQuery {
    pub limit: Option<i64>,
}

/// `POST /api/v1/analyses`: 201 with a freshly computed analysis, or 200
/// with the stored one when the place was analysed before.
pub(super) async fn create_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<CreateAnalysisRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AnalysisRecord>>), ApiError> {
    let input = match body {
        Ok(Json(CreateAnalysisRequest { input: Some(input) })) => input,
        Ok(_) => {
            return Err(ApiError::new(
                req_id.0,
                "invalid_input",
                "request body must include \"input\"",
            ))
        }
        Err(rejection) => {
            return Err(ApiError::new(
                req_id.0,
                "invalid_input",
                rejection.body_text(),
            ))
        }
    };

    let outcome = state
        .pipeline
        .analyze(&input)
        .await
        .map_err(|e| map_analysis_error(req_id.0.clone(), &e))?;

    let status = if outcome.is_cached() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((
        status,
        Json(ApiResponse {
            data: outcome.into_record(),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// `GET /api/v1/analyses`: stored analyses, most recent first.
pub(super) async fn list_analyses(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<AnalysisRecord>>>, ApiError> {
    let limit = normalize_limit(query.limit, state.list_limit);
    let data = state
        .pipeline
        .list_analyses(limit)
        .await
        .map_err(|e| map_analysis_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
