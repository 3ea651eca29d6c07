use crate::domain::error::DomainError;
use crate::domain::follow::Follow;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Returns `false` when the pair already exists.
    async fn follow(&self, follow: Follow) -> Result<bool, DomainError>;
    /// Returns `false` when there was nothing to remove.
    async fn unfollow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError>;
    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError>;
    async fn count_followers(&self, author_id: Uuid) -> Result<u64, DomainError>;
    async fn count_following(&self, user_id: Uuid) -> Result<u64, DomainError>;
}

#[derive(Clone)]
pub struct PostgresFollowRepository {
    pool: PgPool,
}

impl PostgresFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count_where(&self, sql: &str, id: Uuid) -> Result<u64, DomainError> {
        let total: i64 = sqlx::query_scalar(sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while counting follows for {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;
        Ok(u64::try_from(total).unwrap_or_default())
    }
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn follow(&self, follow: Follow) -> Result<bool, DomainError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO follows (id, user_id, author_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, author_id) DO NOTHING
            "#,
        )
        .bind(follow.id)
        .bind(follow.user_id)
        .bind(follow.author_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create follow: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        let created = inserted.rows_affected() > 0;
        if created {
            info!(user_id = %follow.user_id, author_id = %follow.author_id, "follow created");
        }
        Ok(created)
    }

    async fn unfollow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM follows WHERE user_id = $1 AND author_id = $2")
            .bind(user_id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let removed = deleted.rows_affected() > 0;
        if removed {
            info!(user_id = %user_id, author_id = %author_id, "follow removed");
        }
        Ok(removed)
    }

    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2)",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))
    }

    async fn count_followers(&self, author_id: Uuid) -> Result<u64, DomainError> {
        self.count_where("SELECT COUNT(*) FROM follows WHERE author_id = $1", author_id)
            .await
    }

    async fn count_following(&self, user_id: Uuid) -> Result<u64, DomainError> {
        self.count_where("SELECT COUNT(*) FROM follows WHERE user_id = $1", user_id)
            .await
    }
}
