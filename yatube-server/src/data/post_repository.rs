use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostDraft, PostEntry, PostFilter};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: Post) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    async fn find_entry(&self, id: Uuid) -> Result<Option<PostEntry>, DomainError>;
    /// Applies `draft` only when `author_id` wrote the post.
    async fn update(
        &self,
        id: Uuid,
        author_id: Uuid,
        draft: &PostDraft,
    ) -> Result<Option<Post>, DomainError>;
    async fn count(&self, filter: PostFilter) -> Result<u64, DomainError>;
    /// Newest first.
    async fn list(
        &self,
        filter: PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostEntry>, DomainError>;
}

const ENTRY_COLUMNS: &str = r#"
    p.id, p.author_id, u.username AS author_username, p.text,
    p.group_id, g.slug AS group_slug, g.title AS group_title, p.created_at
"#;

const FILTER_CLAUSE: &str = r#"
    ($1::uuid IS NULL OR p.group_id = $1)
    AND ($2::uuid IS NULL OR p.author_id = $2)
    AND ($3::uuid IS NULL OR p.author_id IN (SELECT author_id FROM follows WHERE user_id = $3))
"#;

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, text, group_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(post.id)
        .bind(post.author_id)
        .bind(&post.text)
        .bind(post.group_id)
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create post: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(post_id = %post.id, author_id = %post.author_id, "post created");
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author_id, text, group_id, created_at
            FROM posts WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find_by_id {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn find_entry(&self, id: Uuid) -> Result<Option<PostEntry>, DomainError> {
        let sql = format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            LEFT JOIN groups g ON g.id = p.group_id
            WHERE p.id = $1
            "#
        );
        sqlx::query_as::<_, PostEntry>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find_entry {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn update(
        &self,
        id: Uuid,
        author_id: Uuid,
        draft: &PostDraft,
    ) -> Result<Option<Post>, DomainError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET text = $1, group_id = $2
            WHERE id = $3 AND author_id = $4
            RETURNING id, author_id, text, group_id, created_at
            "#,
        )
        .bind(&draft.text)
        .bind(draft.group_id)
        .bind(id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update post {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })?;

        if post.is_some() {
            info!(post_id = %id, "post updated");
        }

        Ok(post)
    }

    async fn count(&self, filter: PostFilter) -> Result<u64, DomainError> {
        let (group_id, author_id, follower_id) = filter.binds();
        let sql = format!("SELECT COUNT(*) FROM posts p WHERE {FILTER_CLAUSE}");
        let total: i64 = sqlx::query_scalar(&sql)
            .bind(group_id)
            .bind(author_id)
            .bind(follower_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while counting posts: {}", e);
                DomainError::Internal(e.to_string())
            })?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn list(
        &self,
        filter: PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostEntry>, DomainError> {
        let (group_id, author_id, follower_id) = filter.binds();
        let sql = format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            LEFT JOIN groups g ON g.id = p.group_id
            WHERE {FILTER_CLAUSE}
            ORDER BY p.created_at DESC
            LIMIT $4 OFFSET $5
            "#
        );

        sqlx::query_as::<_, PostEntry>(&sql)
            .bind(group_id)
            .bind(author_id)
            .bind(follower_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching posts: {}", e);
                DomainError::Internal(e.to_string())
            })
    }
}
