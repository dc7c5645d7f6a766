//! The content service: listing, viewing/commenting, creating and editing
//! posts.
//!
//! Every operation takes the current time (and, where relevant, the acting
//! identity) as arguments; nothing here reads ambient state.

mod views;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Actor, Comment, Post};
use crate::error::DomainError;
use crate::forms::{Clean, CommentForm, FieldErrors, PostSubmission, Upload};
use crate::ports::{
    AnyAuthenticated, CommentRepository, EditPolicy, MediaStore, Notification, Notifier,
    PostRepository,
};

pub use views::{Page, PostDetailView, PostEditView, PostListView};

/// Subject line of the new-comment notification.
pub const COMMENT_NOTIFICATION_SUBJECT: &str = "New Comment on Your Blog Post";

/// Build the notification sent when `comment` is posted on `post`.
pub fn comment_notification(post: &Post, comment: &Comment, post_url: &str) -> Notification {
    Notification {
        subject: COMMENT_NOTIFICATION_SUBJECT.to_string(),
        body: format!(
            "A new comment was posted on \"{}\" by {}.\n\nRead it here: {}",
            post.title, comment.author, post_url
        ),
    }
}

#[derive(Clone)]
pub struct ContentService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    media: Arc<dyn MediaStore>,
    notifier: Arc<dyn Notifier>,
    policy: Arc<dyn EditPolicy>,
}

impl ContentService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        media: Arc<dyn MediaStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            posts,
            comments,
            media,
            notifier,
            policy: Arc::new(AnyAuthenticated),
        }
    }

    /// Replace the edit authorization policy.
    pub fn with_policy(mut self, policy: Arc<dyn EditPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Published posts, most recently published first.
    pub async fn list_published(&self, now: DateTime<Utc>) -> Result<PostListView, DomainError> {
        let posts = self.posts.find_published(now).await?;
        tracing::debug!(count = posts.len(), "Listed published posts");
        Ok(PostListView { posts })
    }

    /// Show a post, accepting a comment when one is submitted.
    ///
    /// A valid comment is stored once and then announced through the
    /// notifier. If the notifier fails the error is returned, but the
    /// comment stays stored.
    pub async fn view_post(
        &self,
        id: Uuid,
        submission: Option<CommentForm>,
        now: DateTime<Utc>,
        post_url: &str,
    ) -> Result<Page<PostDetailView>, DomainError> {
        let post = self.find_post(id).await?;

        let (form, errors) = match submission {
            None => (CommentForm::default(), FieldErrors::default()),
            Some(form) => match form.clone().clean() {
                Ok(cleaned) => {
                    let comment = Comment::new(post.id, cleaned.author, cleaned.text, now);
                    let comment = self.comments.save(comment).await?;
                    tracing::info!(
                        post_id = %post.id,
                        comment_id = %comment.id,
                        "Comment stored"
                    );

                    self.notifier
                        .notify(comment_notification(&post, &comment, post_url))
                        .await?;

                    return Ok(Page::RedirectToPost(post.id));
                }
                Err(errors) => (form, errors),
            },
        };

        let comments = self.comments.find_by_post_id(post.id).await?;
        Ok(Page::Render(PostDetailView {
            post,
            comments,
            form,
            errors,
        }))
    }

    pub async fn create_post(
        &self,
        actor: Option<&Actor>,
        submission: Option<PostSubmission>,
        now: DateTime<Utc>,
    ) -> Result<Page<PostEditView>, DomainError> {
        let actor = actor.ok_or(DomainError::Unauthorized)?;

        let Some(PostSubmission { form, upload }) = submission else {
            return Ok(Page::Render(PostEditView::blank()));
        };

        let cleaned = match form.clone().clean() {
            Ok(cleaned) => cleaned,
            Err(errors) => {
                return Ok(Page::Render(PostEditView {
                    form,
                    errors,
                    ..PostEditView::blank()
                }));
            }
        };

        let mut post = Post::new(actor.user_id, cleaned.title, cleaned.content, now);
        post.attachment = self.store_upload(upload).await?;

        let post = self.posts.save(post).await?;
        tracing::info!(post_id = %post.id, author_id = %actor.user_id, "Post created");

        Ok(Page::RedirectToPost(post.id))
    }

    /// Edit a post. Saving always republishes it under the acting user.
    pub async fn edit_post(
        &self,
        actor: Option<&Actor>,
        id: Uuid,
        submission: Option<PostSubmission>,
        now: DateTime<Utc>,
    ) -> Result<Page<PostEditView>, DomainError> {
        let actor = actor.ok_or(DomainError::Unauthorized)?;
        let mut post = self.find_post(id).await?;

        if !self.policy.may_edit(actor, &post) {
            tracing::warn!(post_id = %id, user_id = %actor.user_id, "Edit denied");
            return Err(DomainError::Forbidden {
                entity_type: "Post",
                id,
            });
        }

        let Some(PostSubmission { form, upload }) = submission else {
            return Ok(Page::Render(PostEditView::for_post(&post)));
        };

        let cleaned = match form.clone().clean() {
            Ok(cleaned) => cleaned,
            Err(errors) => {
                return Ok(Page::Render(PostEditView {
                    form,
                    errors,
                    ..PostEditView::for_post(&post)
                }));
            }
        };

        post.title = cleaned.title;
        post.content = cleaned.content;
        if let Some(reference) = self.store_upload(upload).await? {
            post.attachment = Some(reference);
        }
        post.publish(actor.user_id, now);

        let post = self.posts.save(post).await?;
        tracing::info!(post_id = %post.id, author_id = %actor.user_id, "Post updated");

        Ok(Page::RedirectToPost(post.id))
    }

    async fn find_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    async fn store_upload(&self, upload: Option<Upload>) -> Result<Option<String>, DomainError> {
        match upload {
            Some(upload) => {
                let reference = self.media.store(&upload.file_name, &upload.bytes).await?;
                Ok(Some(reference))
            }
            None => Ok(None),
        }
    }
}
