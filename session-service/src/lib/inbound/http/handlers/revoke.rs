use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;

use super::ApiError;
use crate::domain::session::ports::SessionServicePort;
use crate::inbound::http::router::AppState;

pub async fn revoke<S: SessionServicePort>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state
        .session_service
        .revoke(&headers)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
