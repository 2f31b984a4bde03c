use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::Html,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Neighbor, Recommendation},
};

use super::page::{self, PageOutcome};
use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub user_id: Option<String>,
    pub action: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub user_id: String,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize)]
pub struct NeighborsResponse {
    pub user_id: String,
    pub neighbors: Vec<Neighbor>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Users available for recommendation queries
pub async fn list_users(State(state): State<AppState>) -> Json<UsersResponse> {
    Json(UsersResponse {
        users: state.recommender.list_users().to_vec(),
    })
}

/// Ranked recommendations for one user
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    params: Result<Query<RecommendQuery>, QueryRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Query(params) = params.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let top_n = params.top_n.unwrap_or(state.default_top_n);
    if top_n == 0 {
        return Err(AppError::InvalidInput("top_n must be at least 1".to_string()));
    }

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        top_n,
        "Processing recommendation request"
    );

    let recommendations = state.recommender.recommend_scored(&user_id, top_n)?;

    tracing::info!(
        request_id = %request_id,
        count = recommendations.len(),
        "Recommendation completed"
    );

    Ok(Json(RecommendationResponse {
        user_id,
        recommendations,
    }))
}

/// Other users ordered by similarity to one user
pub async fn neighbors(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<NeighborsResponse>> {
    let neighbors = state.recommender.neighbors(&user_id)?;
    Ok(Json(NeighborsResponse { user_id, neighbors }))
}

/// Interactive demo page.
///
/// Submitting the form reloads the page with `user_id` and `action=recommend`.
pub async fn index(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<PageQuery>,
) -> Html<String> {
    let users = state.recommender.list_users();
    let selected = params.user_id.as_deref();

    let outcome = match (selected, params.action.as_deref()) {
        (Some(user_id), Some("recommend")) => {
            match state.recommender.recommend(user_id, state.default_top_n) {
                Ok(products) if products.is_empty() => PageOutcome::NoRecommendations,
                Ok(products) => PageOutcome::Recommended {
                    user_id: user_id.to_string(),
                    products,
                },
                Err(e) => {
                    tracing::warn!(request_id = %request_id, error = %e, "Page recommendation failed");
                    PageOutcome::Failed(e.to_string())
                }
            }
        }
        _ => PageOutcome::Idle,
    };

    Html(page::render(users, selected, &outcome))
}
