//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod clock;
mod media;
mod notifier;
mod policy;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use clock::{Clock, FixedClock, SystemClock};
pub use media::MediaStore;
pub use notifier::{Notification, Notifier, NotifyError};
pub use policy::{AnyAuthenticated, AuthorOnly, EditPolicy};
pub use repository::{BaseRepository, CommentRepository, PostRepository, UserRepository};
