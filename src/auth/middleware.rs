use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderValue, StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::parse_token;
use crate::server::AppState;
use crate::session::Session;

/// Extractor that requires a bearer token bound to a live session.
///
/// Role checks are left to the portal, which knows which operation is
/// being attempted.
pub struct RequireSession {
    pub token: String,
    pub session: Session,
}

#[derive(Debug)]
pub enum AuthError {
    MissingAuth,
    InvalidScheme,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingAuth => "Authentication required",
            AuthError::InvalidScheme => "Invalid authorization scheme",
            AuthError::InvalidToken => "Invalid or expired session",
        };

        let body = json!({ "data": null, "error": message });

        let mut response = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
        response.headers_mut().insert(
            "WWW-Authenticate",
            HeaderValue::from_static("Bearer realm=\"docportal\""),
        );

        response
    }
}

impl FromRequestParts<Arc<AppState>> for RequireSession {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts)?;
        parse_token(&token).map_err(|_| AuthError::InvalidToken)?;

        let session = state.portal.session(&token);
        if !session.is_authenticated() {
            return Err(AuthError::InvalidToken);
        }

        Ok(RequireSession { token, session })
    }
}

fn extract_bearer_token(parts: &Parts) -> Result<String, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingAuth)?;

    header
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .ok_or(AuthError::InvalidScheme)
}
