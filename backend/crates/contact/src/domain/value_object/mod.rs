//! Value Object Module

pub mod contact_query;
pub mod contact_status;
