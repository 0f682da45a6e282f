//! Value Object Module

pub mod classification;
pub mod feedback_query;
pub mod feedback_status;
