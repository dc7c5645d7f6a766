//! Authorization policies for post edits.

use crate::domain::{Actor, Post};

/// Decides whether an authenticated actor may edit a post.
pub trait EditPolicy: Send + Sync {
    fn may_edit(&self, actor: &Actor, post: &Post) -> bool;
}

/// Any authenticated user may edit any post.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyAuthenticated;

impl EditPolicy for AnyAuthenticated {
    fn may_edit(&self, _actor: &Actor, _post: &Post) -> bool {
        true
    }
}

/// Only the post's current author may edit it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorOnly;

impl EditPolicy for AuthorOnly {
    fn may_edit(&self, actor: &Actor, post: &Post) -> bool {
        actor.user_id == post.author_id
    }
}
