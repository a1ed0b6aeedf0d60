//! JWT authentication and the AuthUser extractor

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::jwt::ConsoleClaims;
use crate::state::ConsoleState;

/// Authenticated caller extracted from a console token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    /// User ID from the token's `sub` claim
    pub user_id: Uuid,
    /// User's email address
    pub email: String,
    /// Organization the session is scoped to
    pub org_id: Uuid,
    /// Roles within that organization
    pub roles: Vec<String>,
}

impl AuthUser {
    /// Create AuthUser from console token claims
    pub fn from_claims(claims: ConsoleClaims) -> Result<Self, AuthError> {
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AuthError::InvalidToken("Invalid user ID in token".to_string()))?;

        let org_id = Uuid::parse_str(&claims.org_id)
            .map_err(|_| AuthError::InvalidToken("Invalid organization ID in token".to_string()))?;

        Ok(Self {
            user_id,
            email: claims.email,
            org_id,
            roles: claims.roles,
        })
    }

    /// Check if the caller has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Authentication errors
#[derive(Debug, Clone)]
pub enum AuthError {
    /// No Authorization header present
    MissingToken,
    /// Invalid Authorization header format
    InvalidHeader(String),
    /// Token validation failed
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authorization token"),
            AuthError::InvalidHeader(_) => {
                (StatusCode::UNAUTHORIZED, "Invalid authorization header")
            }
            AuthError::InvalidToken(_) => (StatusCode::UNAUTHORIZED, "Invalid token"),
        };

        let body = serde_json::json!({
            "error": message,
            "code": "UNAUTHORIZED"
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Extract and validate Bearer token from Authorization header
pub(crate) fn extract_bearer_token(headers: &axum::http::HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader("Invalid header encoding".to_string()))?;

    if !auth_header.starts_with("Bearer ") {
        return Err(AuthError::InvalidHeader(
            "Authorization header must use Bearer scheme".to_string(),
        ));
    }

    Ok(&auth_header[7..])
}

/// Axum extractor for authenticated callers.
///
/// The admin gate middleware inserts the verified caller into the request
/// extensions; this extractor reads it back, falling back to verifying the
/// Bearer token directly for routes outside the gate.
impl<S> FromRequestParts<S> for AuthUser
where
    S: ConsoleState,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<AuthUser>() {
            return Ok(auth.clone());
        }

        let token = extract_bearer_token(&parts.headers)?;
        let claims = state
            .jwt_manager()
            .verify_console_token(token)
            .map_err(|_| AuthError::InvalidToken("Token validation failed".to_string()))?;

        AuthUser::from_claims(claims)
    }
}
