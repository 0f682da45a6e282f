//! Value Object Module

pub mod profession;
pub mod username;
