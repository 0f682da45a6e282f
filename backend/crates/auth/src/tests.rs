//! Unit tests for Auth crate

use kernel::actor::Role;
use kernel::validation::Email;
use platform::password::ClearTextPassword;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{RegisterInput, TokenCodec};
use crate::domain::entity::user::{NewUser, UserProfile};
use crate::infra::memory::InMemoryUserRepository;

const PASSWORD: &str = "secret1";

fn register_input(email: &str, role: Role) -> RegisterInput {
    RegisterInput {
        user: NewUser {
            full_name: "Jo Doe".to_string(),
            email: Email::new(email).unwrap(),
            username: None,
            role,
            profession: None,
            profile: UserProfile::default(),
        },
        password: ClearTextPassword::new(PASSWORD.to_string()).unwrap(),
    }
}

fn setup() -> (Arc<InMemoryUserRepository>, Arc<AuthConfig>, TokenCodec) {
    let config = AuthConfig::development();
    let tokens = TokenCodec::new(&config);
    (Arc::new(InMemoryUserRepository::new()), Arc::new(config), tokens)
}

#[cfg(test)]
mod use_case_tests {
    use super::*;
    use crate::application::{
        CurrentUserUseCase, LoginInput, LoginUseCase, RefreshTokenUseCase, RegisterUseCase,
        SeedSuperAdminUseCase, SuperAdminSeed,
    };
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::username::Username;
    use crate::domain::entity::user::AccountBlock;
    use crate::error::AuthError;
    use kernel::id::UserId;
    use tokio_test::{assert_err, assert_ok};

    fn login_input(email: &str, password: &str) -> LoginInput {
        LoginInput {
            email: Email::new(email).unwrap(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_issues_tokens_for_new_user() {
        let (repo, config, tokens) = setup();
        let session = RegisterUseCase::new(repo.clone(), config, tokens.clone())
            .execute(register_input("jo@example.com", Role::User))
            .await
            .unwrap();

        assert!(session.user.is_active);
        assert_eq!(session.user.role, Role::User);
        let claims = tokens.decode_access(&session.tokens.access_token).unwrap();
        assert_eq!(claims.actor(), session.user.actor());
        assert_ok!(tokens.decode_refresh(&session.tokens.refresh_token));

        let stored = repo.find_by_id(&session.user.id).await.unwrap().unwrap();
        let password = ClearTextPassword::new(PASSWORD.to_string()).unwrap();
        assert!(stored.password_hash.verify(&password, None));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (repo, config, tokens) = setup();
        let use_case = RegisterUseCase::new(repo, config, tokens);
        assert_ok!(use_case.execute(register_input("jo@example.com", Role::User)).await);

        let err = use_case
            .execute(register_input("JO@example.com", Role::Guest))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let (repo, config, tokens) = setup();
        let use_case = RegisterUseCase::new(repo, config, tokens);

        let mut first = register_input("a@example.com", Role::User);
        first.user.username = Some(Username::new("jodoe").unwrap());
        assert_ok!(use_case.execute(first).await);

        let mut second = register_input("b@example.com", Role::User);
        second.user.username = Some(Username::new("JoDoe").unwrap());
        let err = use_case.execute(second).await.unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken));
    }

    #[tokio::test]
    async fn test_register_rejects_privileged_roles() {
        let (repo, config, tokens) = setup();
        let use_case = RegisterUseCase::new(repo.clone(), config, tokens);

        for role in [Role::Admin, Role::SuperAdmin, Role::Moderator] {
            let err = use_case
                .execute(register_input("boss@example.com", role))
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::RoleNotAllowed));
        }
        assert!(!repo.exists_with_role(Role::Admin).await.unwrap());
    }

    #[tokio::test]
    async fn test_login_records_last_login() {
        let (repo, config, tokens) = setup();
        RegisterUseCase::new(repo.clone(), config.clone(), tokens.clone())
            .execute(register_input("jo@example.com", Role::User))
            .await
            .unwrap();

        let session = LoginUseCase::new(repo.clone(), config, tokens)
            .execute(login_input("Jo@Example.com", PASSWORD))
            .await
            .unwrap();

        assert!(session.user.last_login.is_some());
        let stored = repo.find_by_id(&session.user.id).await.unwrap().unwrap();
        assert_eq!(stored.last_login, session.user.last_login);
    }

    #[tokio::test]
    async fn test_login_invalid_credentials() {
        let (repo, config, tokens) = setup();
        RegisterUseCase::new(repo.clone(), config.clone(), tokens.clone())
            .execute(register_input("jo@example.com", Role::User))
            .await
            .unwrap();
        let use_case = LoginUseCase::new(repo, config, tokens);

        let wrong = use_case
            .execute(login_input("jo@example.com", "wrong-password"))
            .await
            .unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidCredentials));

        let unknown = use_case
            .execute(login_input("nobody@example.com", PASSWORD))
            .await
            .unwrap_err();
        assert!(matches!(unknown, AuthError::InvalidCredentials));

        let too_short = use_case
            .execute(login_input("jo@example.com", "abc"))
            .await
            .unwrap_err();
        assert!(matches!(too_short, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_blocked_account() {
        let (repo, config, tokens) = setup();
        let session = RegisterUseCase::new(repo.clone(), config.clone(), tokens.clone())
            .execute(register_input("jo@example.com", Role::User))
            .await
            .unwrap();

        let mut user = session.user;
        user.is_deactivated = true;
        repo.put(user).await;

        let err = LoginUseCase::new(repo, config, tokens)
            .execute(login_input("jo@example.com", PASSWORD))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AccountBlocked(AccountBlock::Deactivated)));
    }

    #[tokio::test]
    async fn test_refresh_token() {
        let (repo, config, tokens) = setup();
        let session = RegisterUseCase::new(repo.clone(), config, tokens.clone())
            .execute(register_input("jo@example.com", Role::Guest))
            .await
            .unwrap();
        let use_case = RefreshTokenUseCase::new(repo.clone(), tokens.clone());

        let access = use_case.execute(&session.tokens.refresh_token).await.unwrap();
        let claims = tokens.decode_access(&access).unwrap();
        assert_eq!(claims.sub, session.user.id);
        assert_eq!(claims.role, Role::Guest);

        // An access token is not a refresh token
        let err = use_case
            .execute(&session.tokens.access_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));

        let mut user = session.user;
        user.is_deleted = true;
        repo.put(user).await;
        let err = use_case
            .execute(&session.tokens.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AccountBlocked(AccountBlock::Deleted)));
    }

    #[tokio::test]
    async fn test_current_user_not_found() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let err = CurrentUserUseCase::new(repo)
            .execute(&UserId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn test_seed_super_admin_once() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let config = Arc::new(AuthConfig {
            super_admin: Some(SuperAdminSeed {
                email: "root@example.com".to_string(),
                password: "change-me-now".to_string(),
            }),
            ..AuthConfig::development()
        });
        let use_case = SeedSuperAdminUseCase::new(repo.clone(), config);

        let admin = use_case.execute().await.unwrap().unwrap();
        assert_eq!(admin.role, Role::SuperAdmin);
        assert_eq!(admin.full_name, "Super Admin");
        assert_eq!(admin.username.as_ref().map(Username::as_str), Some("superadmin"));
        assert_eq!(admin.profile.location.as_deref(), Some("Headquarters"));
        assert!(admin.is_email_verified);

        assert!(use_case.execute().await.unwrap().is_none());
        assert!(repo.exists_with_role(Role::SuperAdmin).await.unwrap());
    }

    #[tokio::test]
    async fn test_seed_skipped_without_credentials() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let use_case =
            SeedSuperAdminUseCase::new(repo.clone(), Arc::new(AuthConfig::development()));
        assert!(use_case.execute().await.unwrap().is_none());
        assert!(!repo.exists_with_role(Role::SuperAdmin).await.unwrap());
    }

    #[tokio::test]
    async fn test_seed_rejects_weak_password() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let config = Arc::new(AuthConfig {
            super_admin: Some(SuperAdminSeed {
                email: "root@example.com".to_string(),
                password: "123".to_string(),
            }),
            ..AuthConfig::development()
        });
        assert_err!(SeedSuperAdminUseCase::new(repo, config).execute().await);
    }
}

#[cfg(test)]
mod router_tests {
    use super::*;
    use crate::presentation::middleware::authenticate;
    use crate::presentation::router::auth_router_generic;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{HeaderMap, Method, Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app(repo: &InMemoryUserRepository, config: &AuthConfig) -> Router {
        auth_router_generic(repo.clone(), config.clone()).layer(
            axum::middleware::from_fn_with_state(TokenCodec::new(config), authenticate),
        )
    }

    async fn send(
        app: Router,
        method: Method,
        uri: &str,
        headers: &[(header::HeaderName, String)],
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, value)
    }

    fn register_body(email: &str) -> Value {
        json!({
            "fullName": "Jo Doe",
            "email": email,
            "password": PASSWORD,
            "username": "jodoe"
        })
    }

    fn set_cookie(headers: &HeaderMap) -> String {
        headers
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_register_route() {
        let repo = InMemoryUserRepository::new();
        let config = AuthConfig::development();
        let (status, headers, body) = send(
            app(&repo, &config),
            Method::POST,
            "/register",
            &[],
            Some(register_body("jo@example.com")),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "User registered successfully");
        assert_eq!(body["data"]["user"]["email"], "jo@example.com");
        assert_eq!(body["data"]["user"]["role"], "user");
        assert!(body["data"]["user"].get("passwordHash").is_none());
        assert!(body["data"]["accessToken"].is_string());

        let cookie = set_cookie(&headers);
        let refresh = body["data"]["refreshToken"].as_str().unwrap();
        assert!(cookie.starts_with(&format!("refreshToken={refresh}")));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=2592000"));
        assert!(!cookie.contains("Secure"));
    }

    #[tokio::test]
    async fn test_register_errors() {
        let repo = InMemoryUserRepository::new();
        let config = AuthConfig::development();
        send(
            app(&repo, &config),
            Method::POST,
            "/register",
            &[],
            Some(register_body("jo@example.com")),
        )
        .await;

        let (status, _, body) = send(
            app(&repo, &config),
            Method::POST,
            "/register",
            &[],
            Some(json!({ "fullName": "Other", "email": "jo@example.com", "password": PASSWORD })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Email already in use");

        let (status, _, _) = send(
            app(&repo, &config),
            Method::POST,
            "/register",
            &[],
            Some(register_body("other@example.com")),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _, _) = send(
            app(&repo, &config),
            Method::POST,
            "/register",
            &[],
            Some(json!({
                "fullName": "Boss",
                "email": "boss@example.com",
                "password": PASSWORD,
                "role": "admin"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _, body) = send(
            app(&repo, &config),
            Method::POST,
            "/register",
            &[],
            Some(json!({ "email": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_login_and_me() {
        let repo = InMemoryUserRepository::new();
        let config = AuthConfig::development();
        send(
            app(&repo, &config),
            Method::POST,
            "/register",
            &[],
            Some(register_body("jo@example.com")),
        )
        .await;

        let (status, _, body) = send(
            app(&repo, &config),
            Method::POST,
            "/login",
            &[],
            Some(json!({ "email": "jo@example.com", "password": "nope-nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Invalid credentials");

        let (status, headers, body) = send(
            app(&repo, &config),
            Method::POST,
            "/login",
            &[],
            Some(json!({ "email": "jo@example.com", "password": PASSWORD })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(set_cookie(&headers).starts_with("refreshToken="));
        let access = body["data"]["accessToken"].as_str().unwrap().to_string();

        let (status, _, body) = send(
            app(&repo, &config),
            Method::GET,
            "/me",
            &[(header::AUTHORIZATION, format!("Bearer {access}"))],
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["username"], "jodoe");
        assert!(body["data"]["lastLogin"].is_string());
    }

    #[tokio::test]
    async fn test_me_requires_valid_token() {
        let repo = InMemoryUserRepository::new();
        let config = AuthConfig::development();

        let (status, _, _) = send(app(&repo, &config), Method::GET, "/me", &[], None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _, body) = send(
            app(&repo, &config),
            Method::GET,
            "/me",
            &[(header::AUTHORIZATION, "Bearer not.a.token".to_string())],
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_refresh_and_logout() {
        let repo = InMemoryUserRepository::new();
        let config = AuthConfig::development();
        let (_, headers, _) = send(
            app(&repo, &config),
            Method::POST,
            "/register",
            &[],
            Some(register_body("jo@example.com")),
        )
        .await;
        let cookie = set_cookie(&headers);
        let pair = cookie.split(';').next().unwrap().to_string();

        let (status, _, body) = send(
            app(&repo, &config),
            Method::POST,
            "/refresh-token",
            &[(header::COOKIE, pair)],
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let access = body["data"]["accessToken"].as_str().unwrap();
        assert!(TokenCodec::new(&config).decode_access(access).is_ok());

        let (status, _, _) =
            send(app(&repo, &config), Method::POST, "/refresh-token", &[], None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, headers, _) =
            send(app(&repo, &config), Method::POST, "/logout", &[], None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(set_cookie(&headers).contains("Max-Age=0"));
    }
}
