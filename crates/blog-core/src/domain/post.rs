use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a publishable blog article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    /// Stored file reference, relative to the media root.
    pub attachment: Option<String>,
    pub created_date: DateTime<Utc>,
    pub published_date: Option<DateTime<Utc>>,
}

impl Post {
    /// Create a new post, published at `now`.
    pub fn new(author_id: Uuid, title: String, content: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            attachment: None,
            created_date: now,
            published_date: Some(now),
        }
    }

    /// Stamp the saving author and (re)publish at `now`.
    ///
    /// `created_date` is left untouched.
    pub fn publish(&mut self, author_id: Uuid, now: DateTime<Utc>) {
        self.author_id = author_id;
        self.published_date = Some(now);
    }

    /// Whether the post is visible in listings at `now`.
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.published_date.is_some_and(|published| published <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_new_post_is_published_immediately() {
        let now = Utc::now();
        let post = Post::new(Uuid::new_v4(), "Hello".into(), "World".into(), now);

        assert_eq!(post.created_date, now);
        assert_eq!(post.published_date, Some(now));
        assert!(post.is_published(now));
    }

    #[test]
    fn test_future_or_missing_publish_date_is_not_published() {
        let now = Utc::now();
        let mut post = Post::new(Uuid::new_v4(), "Draft".into(), "Soon".into(), now);

        post.published_date = Some(now + TimeDelta::minutes(5));
        assert!(!post.is_published(now));

        post.published_date = None;
        assert!(!post.is_published(now));
    }

    #[test]
    fn test_publish_restamps_author_but_keeps_created_date() {
        let created = Utc::now();
        let mut post = Post::new(Uuid::new_v4(), "Title".into(), "Body".into(), created);

        let editor = Uuid::new_v4();
        let later = created + TimeDelta::hours(1);
        post.publish(editor, later);

        assert_eq!(post.author_id, editor);
        assert_eq!(post.published_date, Some(later));
        assert_eq!(post.created_date, created);
    }
}
