//! Organization-admin gate applied uniformly to all console routes.
//!
//! Verifies the console token, enforces the org-admin policy, and injects
//! the verified caller into the request extensions. Handler bodies never run
//! for unauthenticated or unauthorized requests.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::auth::{extract_bearer_token, AuthError, AuthUser};
use crate::policy;
use crate::state::ConsoleState;

pub async fn admin_gate<S: ConsoleState>(
    State(state): State<S>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth = match authenticate(&state, request.headers()) {
        Ok(auth) => auth,
        Err(e) => return e.into_response(),
    };

    if let Err(e) = policy::require_org_admin(state.config(), &auth) {
        return e.into_response();
    }

    request.extensions_mut().insert(auth);
    next.run(request).await
}

fn authenticate<S: ConsoleState>(
    state: &S,
    headers: &axum::http::HeaderMap,
) -> Result<AuthUser, AuthError> {
    let token = extract_bearer_token(headers)?;
    let claims = state
        .jwt_manager()
        .verify_console_token(token)
        .map_err(|_| AuthError::InvalidToken("Token validation failed".to_string()))?;
    AuthUser::from_claims(claims)
}
