use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;
use passion_domain::{CATEGORY_TABLE_VERSION, Category};
use passion_service::{
	Error as ServiceError, MatchRequest, MatchResponse, MatchStatus, SourceReport,
};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/jobs/match", post(match_jobs))
		.route("/v1/categories", get(categories))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn match_jobs(
	State(state): State<AppState>,
	Json(payload): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, ApiError> {
	let response = state.service.match_jobs(payload).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
	pub version: &'static str,
	pub categories: &'static [Category],
}

async fn categories() -> Json<CategoriesResponse> {
	Json(CategoriesResponse {
		version: CATEGORY_TABLE_VERSION,
		categories: passion_domain::categories(),
	})
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	#[serde(skip_serializing_if = "Option::is_none")]
	status: Option<MatchStatus>,
	error_code: String,
	message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	suggested_titles: Option<Vec<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	sources: Option<Vec<SourceReport>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	/// Set when the failure still reads as a match outcome to clients.
	match_status: Option<MatchStatus>,
	error_code: &'static str,
	message: String,
	suggested_titles: Option<Vec<String>>,
	sources: Option<Vec<SourceReport>>,
}
impl ApiError {
	fn new(status: StatusCode, error_code: &'static str, message: impl Into<String>) -> Self {
		Self {
			status,
			match_status: None,
			error_code,
			message: message.into(),
			suggested_titles: None,
			sources: None,
		}
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let message = err.to_string();

		match err {
			ServiceError::EmptyQuery => Self::new(StatusCode::BAD_REQUEST, "empty_query", message),
			ServiceError::InvalidRequest { .. } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message),
			ServiceError::FilterUnsupported { .. } =>
				Self::new(StatusCode::UNPROCESSABLE_ENTITY, "filter_unsupported", message),
			ServiceError::EmbeddingUnavailable { .. } =>
				Self::new(StatusCode::BAD_GATEWAY, "embedding_unavailable", message),
			ServiceError::EmbeddingMalformed { .. } =>
				Self::new(StatusCode::BAD_GATEWAY, "embedding_malformed", message),
			ServiceError::AllSourcesFailed { failures, suggested_titles } => Self {
				match_status: Some(MatchStatus::NoResults),
				suggested_titles: Some(suggested_titles),
				sources: Some(failures),
				..Self::new(StatusCode::SERVICE_UNAVAILABLE, "all_sources_failed", message)
			},
			ServiceError::Timeout { .. } =>
				Self::new(StatusCode::GATEWAY_TIMEOUT, "timeout", message),
			ServiceError::Startup { .. } => {
				tracing::error!(error = %message, "Unexpected startup error during a request.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			status: self.match_status,
			error_code: self.error_code.to_string(),
			message: self.message,
			suggested_titles: self.suggested_titles,
			sources: self.sources,
		};

		(self.status, Json(body)).into_response()
	}
}
