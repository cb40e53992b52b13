use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::auth::RequireSession;
use crate::server::AppState;
use crate::server::dto::{CredentialsRequest, LoginResponse, SessionResponse};
use crate::server::response::{ApiError, ApiResponse};
use crate::session::Session;

/// POST /register - Create an account
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .portal
        .register(&Session::Anonymous, &req.username, &req.password, req.role)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

/// POST /login - Authenticate and open a session
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let login = state
        .portal
        .login(&Session::Anonymous, &req.username, &req.password, req.role)?;

    Ok(Json(ApiResponse::success(LoginResponse {
        token: login.token,
        user: login.user,
    })))
}

/// POST /logout - Close the caller's session
pub async fn logout(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let RequireSession { token, mut session } = auth;
    state.portal.logout(&mut session, &token)?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /session - Describe the caller's session
pub async fn current_session(auth: RequireSession) -> impl IntoResponse {
    Json(ApiResponse::success(SessionResponse::from(&auth.session)))
}
