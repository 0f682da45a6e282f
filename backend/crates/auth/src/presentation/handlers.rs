//! HTTP Handlers

use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::IntoResponse;
use kernel::actor::Actor;
use kernel::extract::ValidJson;
use kernel::response::ApiResponse;
use platform::cookie::extract_cookie;
use std::sync::Arc;

use crate::application::config::{AuthConfig, REFRESH_COOKIE_NAME};
use crate::application::{
    CurrentUserUseCase, LoginUseCase, RefreshTokenUseCase, RegisterUseCase, TokenCodec,
};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AccessTokenResponse, AuthResponse, LoginRequest, RegisterRequest, UserResponse,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub tokens: TokenCodec,
}

// ============================================================================
// Register / Login
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let input = req.validate()?;
    let session = RegisterUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.tokens.clone(),
    )
    .execute(input)
    .await?;

    let cookie = refresh_cookie(&state.config, &session.tokens.refresh_token)?;
    Ok((
        [(header::SET_COOKIE, cookie)],
        ApiResponse::created("User registered successfully", AuthResponse::from(session)),
    ))
}

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let input = req.validate()?;
    let session = LoginUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.tokens.clone(),
    )
    .execute(input)
    .await?;

    let cookie = refresh_cookie(&state.config, &session.tokens.refresh_token)?;
    Ok((
        [(header::SET_COOKIE, cookie)],
        ApiResponse::ok("Login successful", AuthResponse::from(session)),
    ))
}

// ============================================================================
// Tokens
// ============================================================================

/// POST /api/auth/refresh-token
pub async fn refresh_token<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<ApiResponse<AccessTokenResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token =
        extract_cookie(&headers, REFRESH_COOKIE_NAME).ok_or(AuthError::MissingRefreshToken)?;
    let access_token = RefreshTokenUseCase::new(state.repo.clone(), state.tokens.clone())
        .execute(&token)
        .await?;

    Ok(ApiResponse::ok(
        "Access token refreshed successfully",
        AccessTokenResponse { access_token },
    ))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; this only expires the refresh cookie.
pub async fn logout<R>(State(state): State<AuthAppState<R>>) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let cookie = HeaderValue::from_str(&state.config.refresh_cookie().build_delete_cookie())
        .map_err(|e| AuthError::Internal(format!("Invalid cookie header: {e}")))?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        ApiResponse::<Option<()>>::ok("Logged out successfully", None),
    ))
}

// ============================================================================
// Profile
// ============================================================================

/// GET /api/auth/me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    actor: Actor,
) -> AuthResult<ApiResponse<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user = CurrentUserUseCase::new(state.repo.clone())
        .execute(&actor.id)
        .await?;

    Ok(ApiResponse::ok("User profile retrieved successfully", user.into()))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn refresh_cookie(config: &AuthConfig, token: &str) -> AuthResult<HeaderValue> {
    config
        .refresh_cookie()
        .set_cookie_header(token)
        .ok_or_else(|| AuthError::Internal("Refresh token is not a valid cookie value".to_string()))
}
