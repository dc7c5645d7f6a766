//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//! This crate contains the record stores, authentication, mail and media
//! integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `postgres` - PostgreSQL record store via SeaORM
//! - `auth` - JWT + Argon2 authentication
//! - `smtp` - Comment notifications over SMTP via lettre

pub mod database;
pub mod mail;
pub mod media;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory / local
pub use database::{InMemoryCommentRepository, InMemoryPostRepository, InMemoryUserRepository};
pub use mail::LogNotifier;
pub use media::LocalMediaStore;

#[cfg(feature = "postgres")]
pub use database::{
    DatabaseConfig, DatabaseConnections, PostgresCommentRepository, PostgresPostRepository,
    PostgresUserRepository,
};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "smtp")]
pub use mail::{SmtpConfig, SmtpNotifier};
