//! # Blog Core
//!
//! The domain layer of the Quill blog.
//! This crate contains the business logic with zero infrastructure dependencies:
//! entities, ports, form validation and the content service.

pub mod domain;
pub mod error;
pub mod forms;
pub mod ports;
pub mod service;

pub use error::DomainError;
pub use service::ContentService;
