//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no domain vocabulary:
//! - Password hashing (Argon2id, zeroized clear text)
//! - Cookie building and parsing
//! - Client identification (IP, User-Agent)

pub mod client;
pub mod cookie;
pub mod password;
