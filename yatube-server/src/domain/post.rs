use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub group_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(author_id: Uuid, text: String, group_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            text,
            group_id,
            created_at: Utc::now(),
        }
    }
}

/// A post joined with the author and group it is displayed with.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PostEntry {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub text: String,
    pub group_id: Option<Uuid>,
    pub group_slug: Option<String>,
    pub group_title: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PostEntry {
    /// Display name of the post's group, empty when it has none.
    pub fn group_name(&self) -> &str {
        self.group_title
            .as_deref()
            .or(self.group_slug.as_deref())
            .unwrap_or_default()
    }
}

/// Selects which posts a listing page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(Uuid),
    Author(Uuid),
    /// Posts by every author the given user follows.
    FollowedBy(Uuid),
}

impl PostFilter {
    /// Bind values for `(group_id, author_id, follower_id)` predicates, `None` meaning "any".
    pub fn binds(&self) -> (Option<Uuid>, Option<Uuid>, Option<Uuid>) {
        match *self {
            PostFilter::All => (None, None, None),
            PostFilter::Group(id) => (Some(id), None, None),
            PostFilter::Author(id) => (None, Some(id), None),
            PostFilter::FollowedBy(id) => (None, None, Some(id)),
        }
    }
}

/// Validated input for creating or editing a post.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub text: String,
    pub group_id: Option<Uuid>,
}
