//! Authentication middleware for bearer token validation.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use budget_types::{AppError, IdentityError, TransactionRepository};

use super::handlers::{ApiError, AppState};

/// Extracts the token from the Authorization header.
/// Expected format: "Bearer <token>" or just "<token>"
fn extract_bearer_token(auth_header: Option<&str>) -> Option<&str> {
    let header = auth_header?;
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    (!token.is_empty()).then_some(token)
}

/// Authentication middleware for the protected routes.
///
/// Verifies the bearer token with the identity provider and stores the
/// resulting [`budget_types::UserRef`] in the request extensions. Any
/// failure ends the request with 401.
pub async fn auth_middleware<R: TransactionRepository>(
    State(state): State<Arc<AppState<R>>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let Some(token) = extract_bearer_token(auth_header).map(str::to_owned) else {
        return unauthorized_response("Missing or invalid Authorization header");
    };

    match state.identity.verify(&token).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(IdentityError::InvalidToken(reason)) => {
            tracing::debug!(%reason, "bearer token rejected");
            unauthorized_response("Invalid token")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    ApiError(AppError::Unauthorized(message.to_string())).into_response()
}
