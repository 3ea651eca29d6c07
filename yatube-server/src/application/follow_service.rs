use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::follow_repository::FollowRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::follow::Follow;
use crate::domain::user::User;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FollowStats {
    pub followers: u64,
    pub following: u64,
}

#[derive(Clone)]
pub struct FollowService {
    follows: Arc<dyn FollowRepository>,
    users: Arc<dyn UserRepository>,
}

impl FollowService {
    pub fn new(follows: Arc<dyn FollowRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { follows, users }
    }

    async fn author(&self, username: &str) -> Result<User, DomainError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))
    }

    /// Subscribes `user_id` to `username`. Following yourself or an author
    /// you already follow changes nothing.
    #[instrument(skip(self))]
    pub async fn follow(&self, user_id: Uuid, username: &str) -> Result<User, DomainError> {
        let author = self.author(username).await?;
        if author.id != user_id {
            self.follows.follow(Follow::new(user_id, author.id)).await?;
        }
        Ok(author)
    }

    #[instrument(skip(self))]
    pub async fn unfollow(&self, user_id: Uuid, username: &str) -> Result<User, DomainError> {
        let author = self.author(username).await?;
        self.follows.unfollow(user_id, author.id).await?;
        Ok(author)
    }

    pub async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError> {
        self.follows.exists(user_id, author_id).await
    }

    pub async fn stats(&self, user_id: Uuid) -> Result<FollowStats, DomainError> {
        Ok(FollowStats {
            followers: self.follows.count_followers(user_id).await?,
            following: self.follows.count_following(user_id).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Repositories;

    #[tokio::test]
    async fn follow_unfollow_cycle() {
        let repos = Repositories::in_memory();
        let service = FollowService::new(repos.follows.clone(), repos.users.clone());
        let reader = repos
            .users
            .create(User::new("reader".into(), "h".into()))
            .await
            .unwrap();
        let author = repos
            .users
            .create(User::new("author".into(), "h".into()))
            .await
            .unwrap();

        service.follow(reader.id, "author").await.unwrap();
        service.follow(reader.id, "author").await.unwrap();
        assert!(service.is_following(reader.id, author.id).await.unwrap());
        assert_eq!(service.stats(author.id).await.unwrap().followers, 1);

        service.unfollow(reader.id, "author").await.unwrap();
        assert!(!service.is_following(reader.id, author.id).await.unwrap());
    }

    #[tokio::test]
    async fn self_follow_is_ignored() {
        let repos = Repositories::in_memory();
        let service = FollowService::new(repos.follows.clone(), repos.users.clone());
        let user = repos
            .users
            .create(User::new("narcissus".into(), "h".into()))
            .await
            .unwrap();

        service.follow(user.id, "narcissus").await.unwrap();
        assert!(!service.is_following(user.id, user.id).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_author_is_not_found() {
        let repos = Repositories::in_memory();
        let service = FollowService::new(repos.follows.clone(), repos.users.clone());
        assert!(matches!(
            service.follow(Uuid::new_v4(), "ghost").await,
            Err(DomainError::UserNotFound(_))
        ));
    }
}
