//! Payload rules shared by the attendance and leave endpoints.

pub mod rules;

pub use validator::Validate;
