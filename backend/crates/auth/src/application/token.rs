//! Token Codec
//!
//! HS256 access and refresh tokens. The two kinds use separate secrets,
//! so a refresh token never passes as an access token.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::application::config::AuthConfig;
use crate::domain::entity::{claims::Claims, user::User};
use crate::error::{AuthError, AuthResult};

/// Freshly issued token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl Keys {
    fn new(secret: &[u8], ttl: std::time::Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs: i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
        }
    }
}

#[derive(Clone)]
pub struct TokenCodec {
    access: Keys,
    refresh: Keys,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access: Keys::new(&config.access_secret, config.access_ttl),
            refresh: Keys::new(&config.refresh_secret, config.refresh_ttl),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn issue_pair(&self, user: &User) -> AuthResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.issue_access(user)?,
            refresh_token: Self::encode(user, &self.refresh)?,
        })
    }

    pub fn issue_access(&self, user: &User) -> AuthResult<String> {
        Self::encode(user, &self.access)
    }

    pub fn decode_access(&self, token: &str) -> AuthResult<Claims> {
        self.decode(token, &self.access)
    }

    pub fn decode_refresh(&self, token: &str) -> AuthResult<Claims> {
        self.decode(token, &self.refresh)
    }

    fn encode(user: &User, keys: &Keys) -> AuthResult<String> {
        let claims = Claims::for_user(user, Utc::now().timestamp(), keys.ttl_secs);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| AuthError::Internal(format!("Token encoding failed: {e}")))
    }

    fn decode(&self, token: &str, keys: &Keys) -> AuthResult<Claims> {
        jsonwebtoken::decode::<Claims>(token, &keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                AuthError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::actor::Role;
    use kernel::validation::Email;
    use platform::password::ClearTextPassword;

    use crate::domain::entity::user::{NewUser, UserProfile};

    fn user() -> User {
        let hash = ClearTextPassword::new("secret1".to_string())
            .unwrap()
            .hash(None)
            .unwrap();
        User::register(
            NewUser {
                full_name: "Ada Admin".to_string(),
                email: Email::new("ada@example.com").unwrap(),
                username: None,
                role: Role::Admin,
                profession: None,
                profile: UserProfile {
                    avatar: Some("https://cdn.example.com/ada.png".to_string()),
                    ..Default::default()
                },
            },
            hash,
        )
    }

    #[test]
    fn test_access_roundtrip_yields_same_actor() {
        let codec = TokenCodec::new(&AuthConfig::development());
        let user = user();

        let pair = codec.issue_pair(&user).unwrap();
        let claims = codec.decode_access(&pair.access_token).unwrap();

        assert_eq!(claims.actor(), user.actor());
        assert_eq!(claims.name, "Ada Admin");
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.profile_img.as_deref(), Some("https://cdn.example.com/ada.png"));
        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[test]
    fn test_kinds_are_not_interchangeable() {
        let codec = TokenCodec::new(&AuthConfig::development());
        let pair = codec.issue_pair(&user()).unwrap();

        assert!(codec.decode_refresh(&pair.refresh_token).is_ok());
        assert!(matches!(
            codec.decode_access(&pair.refresh_token),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            codec.decode_refresh(&pair.access_token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_foreign_secret_and_garbage_rejected() {
        let ours = TokenCodec::new(&AuthConfig::development());
        let theirs = TokenCodec::new(&AuthConfig::development());
        let token = theirs.issue_access(&user()).unwrap();

        assert!(ours.decode_access(&token).is_err());
        assert!(ours.decode_access("not.a.token").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = AuthConfig::development();
        let codec = TokenCodec::new(&config);
        let user = user();

        let issued = Utc::now().timestamp() - 7_200;
        let claims = Claims::for_user(&user, issued, 3_600);
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&config.access_secret),
        )
        .unwrap();

        assert!(matches!(codec.decode_access(&token), Err(AuthError::InvalidToken)));
    }
}
