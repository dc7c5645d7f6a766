use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - a reply bound to exactly one post.
///
/// The author is free text supplied by the submitter, not a user reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: String,
    pub text: String,
    pub created_date: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, author: String, text: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author,
            text,
            created_date: now,
        }
    }
}
