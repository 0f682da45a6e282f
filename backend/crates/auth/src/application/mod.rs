//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod current_user;
pub mod login;
pub mod refresh_token;
pub mod register;
pub mod seed_super_admin;
pub mod token;

// Re-exports
pub use config::{AuthConfig, SuperAdminSeed};
pub use current_user::CurrentUserUseCase;
pub use login::{LoginInput, LoginUseCase};
pub use refresh_token::RefreshTokenUseCase;
pub use register::{AuthSession, RegisterInput, RegisterUseCase};
pub use seed_super_admin::SeedSuperAdminUseCase;
pub use token::{TokenCodec, TokenPair};
