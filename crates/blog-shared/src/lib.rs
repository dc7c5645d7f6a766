//! # Blog Shared
//!
//! Request/response types of the JSON and form endpoints.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
