use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    SurfError,
    ranking::SkillProfile,
    recommend::{Recommendation, RecommendationService},
};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RecommendationService>,
    /// Profile used when a request names none
    pub default_skill: SkillProfile,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub location: Option<String>,
    pub skill: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiHealth {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub message: String,
}

/// Request failure rendered as a JSON body with a matching status code
pub struct ApiError(SurfError);

impl From<SurfError> for ApiError {
    fn from(err: SurfError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            SurfError::Validation { .. } => StatusCode::BAD_REQUEST,
            SurfError::LocationNotFound { .. } | SurfError::NoBeachesFound { .. } => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::BAD_GATEWAY,
        }
    }

    fn code(&self) -> &'static str {
        match &self.0 {
            SurfError::Config { .. } => "config",
            SurfError::Api { .. } => "upstream",
            SurfError::Validation { .. } => "validation",
            SurfError::LocationNotFound { .. } => "location_not_found",
            SurfError::NoBeachesFound { .. } => "no_beaches_found",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("Recommendation request failed: {}", self.0);
        }

        let body = ApiErrorBody {
            error: self.code().to_string(),
            message: self.0.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .route("/recommendations", get(get_recommendations))
        .with_state(state)
}

async fn get_health() -> Json<ApiHealth> {
    Json(ApiHealth {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

async fn get_recommendations(
    State(state): State<AppState>,
    Query(query): Query<RecommendationQuery>,
) -> Result<Json<Recommendation>, ApiError> {
    let location = query.location.unwrap_or_default();
    let skill = query
        .skill
        .as_deref()
        .map_or(state.default_skill, SkillProfile::from_label);

    let recommendation = state.service.recommend(&location, skill).await?;
    Ok(Json(recommendation))
}
