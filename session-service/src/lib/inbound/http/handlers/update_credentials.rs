use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::session::models::UpdateCredentialsCommand;
use crate::domain::session::models::User;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::session::ports::SessionServicePort;

/// HTTP request body for replacing credentials (raw JSON)
#[derive(Debug, Deserialize)]
pub struct UpdateCredentialsRequest {
    pub email: String,
    pub password: String,
}

impl From<UpdateCredentialsRequest> for UpdateCredentialsCommand {
    fn from(req: UpdateCredentialsRequest) -> Self {
        UpdateCredentialsCommand::new(req.email, req.password)
    }
}

/// Response body for user operations
#[derive(Debug, Serialize, PartialEq)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

/// Update the caller's own email and password.
///
/// The target user is the subject of the bearer access token, never a
/// request parameter.
pub async fn update_credentials<S: SessionServicePort>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Json(req): Json<UpdateCredentialsRequest>,
) -> Result<ApiSuccess<UserResponse>, ApiError> {
    state
        .session_service
        .update_credentials(&headers, req.into())
        .await
        .map_err(ApiError::from)
        .map(|user| ApiSuccess::new(StatusCode::OK, user.into()))
}
