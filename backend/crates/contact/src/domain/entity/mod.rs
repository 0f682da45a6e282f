pub mod contact;
pub mod statistics;
