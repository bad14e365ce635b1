use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use crate::domain::session::ports::SessionServicePort;
use crate::inbound::http::router::AppState;

pub async fn reset<S: SessionServicePort>(
    State(state): State<AppState<S>>,
) -> Result<StatusCode, ApiError> {
    state.session_service.reset().await.map_err(ApiError::from)?;

    tracing::warn!("All users and refresh tokens deleted");
    Ok(StatusCode::OK)
}
