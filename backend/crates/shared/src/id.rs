//! Common ID Types
//!
//! Type-safe 12-byte identifiers rendered as 24 lowercase hex characters.
//! Layout: 4-byte big-endian Unix seconds, 5 random bytes, 3-byte counter.
//! Ids sort roughly by creation time.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::app_error::AppError;

/// Length of the textual form
pub const ID_HEX_LEN: usize = 24;

const ID_BYTES: usize = 12;

static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
static PROCESS_RANDOM: OnceLock<[u8; 5]> = OnceLock::new();

fn next_counter() -> u32 {
    COUNTER
        .get_or_init(|| AtomicU32::new(rand::rng().next_u32()))
        .fetch_add(1, Ordering::Relaxed)
        & 0x00ff_ffff
}

fn process_random() -> &'static [u8; 5] {
    PROCESS_RANDOM.get_or_init(|| {
        let mut bytes = [0u8; 5];
        rand::rng().fill_bytes(&mut bytes);
        bytes
    })
}

/// Generic typed ID wrapper
///
/// ```
/// use kernel::id::{Id, markers};
/// type ContactId = Id<markers::Contact>;
///
/// let id = ContactId::new();
/// let parsed: ContactId = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
pub struct Id<T> {
    bytes: [u8; ID_BYTES],
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Generate a fresh id stamped with the current time
    pub fn new() -> Self {
        let secs = chrono::Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
        let counter = next_counter();

        let mut bytes = [0u8; ID_BYTES];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(process_random());
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);

        Self::from_bytes(bytes)
    }

    pub const fn from_bytes(bytes: [u8; ID_BYTES]) -> Self {
        Self {
            bytes,
            _marker: PhantomData,
        }
    }

    /// Parse the 24-character hex form (case-insensitive)
    pub fn parse_str(s: &str) -> Result<Self, AppError> {
        if s.len() != ID_HEX_LEN {
            return Err(invalid_id(s));
        }
        let mut bytes = [0u8; ID_BYTES];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| invalid_id(s))?;
        Ok(Self::from_bytes(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

fn invalid_id(s: &str) -> AppError {
    AppError::bad_request(format!("Invalid ID: {s}"))
        .with_field("id", "Must be a 24 character hexadecimal string")
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl<T> Eq for Id<T> {}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.bytes.cmp(&other.bytes)
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.to_hex())
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl<T> FromStr for Id<T> {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_str(&s).map_err(|e| serde::de::Error::custom(e.message().to_string()))
    }
}

/// Marker types for different entity IDs
pub mod markers {
    pub struct User;

    pub struct Contact;

    pub struct Feedback;
}

pub type UserId = Id<markers::User>;
pub type ContactId = Id<markers::Contact>;
pub type FeedbackId = Id<markers::Feedback>;
