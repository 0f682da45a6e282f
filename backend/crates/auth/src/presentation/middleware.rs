//! Auth Middleware
//!
//! Turns an `Authorization: Bearer <token>` header into an [`Actor`] in
//! the request extensions. Requests without a bearer token pass through
//! anonymously; handlers that need an identity reject them.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use kernel::actor::Actor;

use crate::application::TokenCodec;
use crate::error::AuthError;

/// Decode the bearer token, if any, and attach the actor
///
/// A present but invalid or expired token is rejected with 401.
pub async fn authenticate(
    State(tokens): State<TokenCodec>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if let Some(token) = bearer_token(req.headers()) {
        let claims = tokens.decode_access(token)?;
        let actor: Actor = claims.actor();
        tracing::debug!(actor_id = %actor.id, role = %actor.role, "Request authenticated");
        req.extensions_mut().insert(actor);
    }

    Ok(next.run(req).await)
}

/// Token part of a `Bearer` authorization header (scheme is case-insensitive)
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ').unwrap_or((value, ""));
    scheme
        .eq_ignore_ascii_case("bearer")
        .then_some(token.trim())
}
