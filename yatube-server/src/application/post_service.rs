use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::comment_repository::CommentRepository;
use crate::data::group_repository::GroupRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::comment::{Comment, CommentEntry};
use crate::domain::error::DomainError;
use crate::domain::group::Group;
use crate::domain::page::{Page, PageWindow};
use crate::domain::post::{Post, PostDraft, PostEntry, PostFilter};

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    comments: Arc<dyn CommentRepository>,
    per_page: u32,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
        comments: Arc<dyn CommentRepository>,
        per_page: u32,
    ) -> Self {
        Self {
            posts,
            groups,
            comments,
            per_page,
        }
    }

    pub async fn list_posts(
        &self,
        filter: PostFilter,
        page: Option<u32>,
    ) -> Result<Page<PostEntry>, DomainError> {
        let total = self.posts.count(filter).await?;
        let window = PageWindow::resolve(page, self.per_page, total);
        let items = self
            .posts
            .list(filter, window.limit, window.offset)
            .await?;
        Ok(window.into_page(items, total))
    }

    pub async fn count_posts(&self, filter: PostFilter) -> Result<u64, DomainError> {
        self.posts.count(filter).await
    }

    pub async fn group_posts(
        &self,
        slug: &str,
        page: Option<u32>,
    ) -> Result<(Group, Page<PostEntry>), DomainError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::GroupNotFound(slug.to_string()))?;
        let posts = self.list_posts(PostFilter::Group(group.id), page).await?;
        Ok((group, posts))
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    pub async fn get_entry(&self, id: Uuid) -> Result<PostEntry, DomainError> {
        self.posts
            .find_entry(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    pub async fn comments(&self, post_id: Uuid) -> Result<Vec<CommentEntry>, DomainError> {
        self.comments.list_for_post(post_id).await
    }

    pub async fn groups(&self) -> Result<Vec<Group>, DomainError> {
        self.groups.list().await
    }

    /// Validates submitted form fields. An empty `group_slug` files the post
    /// under no group.
    pub async fn prepare_draft(
        &self,
        text: &str,
        group_slug: &str,
    ) -> Result<PostDraft, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::Validation("post text is required".to_string()));
        }

        let group_slug = group_slug.trim();
        let group_id = if group_slug.is_empty() {
            None
        } else {
            let group = self.groups.find_by_slug(group_slug).await?.ok_or_else(|| {
                DomainError::Validation(format!("unknown group: {}", group_slug))
            })?;
            Some(group.id)
        };

        Ok(PostDraft {
            text: text.to_string(),
            group_id,
        })
    }

    #[instrument(skip(self, draft))]
    pub async fn create_post(&self, author_id: Uuid, draft: PostDraft) -> Result<Post, DomainError> {
        let post = Post::new(author_id, draft.text, draft.group_id);
        self.posts.create(post).await
    }

    /// Only the author may edit; anyone else gets `Forbidden`.
    #[instrument(skip(self, draft))]
    pub async fn update_post(
        &self,
        author_id: Uuid,
        post_id: Uuid,
        draft: PostDraft,
    ) -> Result<Post, DomainError> {
        let post = self.get_post(post_id).await?;
        if post.author_id != author_id {
            return Err(DomainError::Forbidden);
        }

        self.posts
            .update(post_id, author_id, &draft)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))
    }

    #[instrument(skip(self, text))]
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        text: &str,
    ) -> Result<Comment, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::Validation("comment text is required".to_string()));
        }
        self.get_post(post_id).await?;
        self.comments
            .create(Comment::new(post_id, author_id, text.to_string()))
            .await
    }
}
