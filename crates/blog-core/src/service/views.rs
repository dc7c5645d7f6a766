//! View models handed to the renderer.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Comment, Post};
use crate::forms::{CommentForm, FieldErrors, PostForm};

/// Result of a page operation: either show a page or go to a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page<V> {
    Render(V),
    RedirectToPost(Uuid),
}

impl<V> Page<V> {
    pub fn redirect_target(&self) -> Option<Uuid> {
        match self {
            Page::RedirectToPost(id) => Some(*id),
            Page::Render(_) => None,
        }
    }

    pub fn into_view(self) -> Option<V> {
        match self {
            Page::Render(view) => Some(view),
            Page::RedirectToPost(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostListView {
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostDetailView {
    pub post: Post,
    pub comments: Vec<Comment>,
    pub form: CommentForm,
    pub errors: FieldErrors,
}

/// Create/edit form page. `post_id` is `None` when creating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostEditView {
    pub post_id: Option<Uuid>,
    pub form: PostForm,
    pub attachment: Option<String>,
    pub errors: FieldErrors,
}

impl PostEditView {
    pub(crate) fn blank() -> Self {
        Self {
            post_id: None,
            form: PostForm::default(),
            attachment: None,
            errors: FieldErrors::default(),
        }
    }

    pub(crate) fn for_post(post: &Post) -> Self {
        Self {
            post_id: Some(post.id),
            form: PostForm {
                title: post.title.clone(),
                content: post.content.clone(),
            },
            attachment: post.attachment.clone(),
            errors: FieldErrors::default(),
        }
    }
}
