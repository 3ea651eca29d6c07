use std::sync::Arc;

use tracing::instrument;

use crate::data::group_repository::GroupRepository;
use crate::domain::{error::DomainError, group::Group};

const SLUG_MAX_LEN: usize = 50;

#[derive(Clone)]
pub struct GroupService {
    repo: Arc<dyn GroupRepository>,
}

impl GroupService {
    pub fn new(repo: Arc<dyn GroupRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_group(&self, slug: &str) -> Result<Group, DomainError> {
        self.repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::GroupNotFound(slug.to_string()))
    }

    #[instrument(skip(self, description))]
    pub async fn create_group(
        &self,
        title: &str,
        slug: &str,
        description: &str,
    ) -> Result<Group, DomainError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::Validation("title is required".to_string()));
        }
        validate_slug(slug)?;
        self.repo
            .create(Group::new(
                title.to_string(),
                slug.to_string(),
                description.trim().to_string(),
            ))
            .await
    }

    /// Deletes the group. Its posts remain, without a group.
    #[instrument(skip(self))]
    pub async fn delete_group(&self, slug: &str) -> Result<(), DomainError> {
        let group = self.get_group(slug).await?;
        if !self.repo.delete(group.id).await? {
            return Err(DomainError::GroupNotFound(slug.to_string()));
        }
        Ok(())
    }
}

fn validate_slug(slug: &str) -> Result<(), DomainError> {
    let valid = !slug.is_empty()
        && slug.len() <= SLUG_MAX_LEN
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "slug must be 1 to {} lowercase letters, digits, '-' or '_'",
            SLUG_MAX_LEN
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::MemoryStore;

    #[tokio::test]
    async fn create_and_delete() {
        let groups = GroupService::new(Arc::new(MemoryStore::new()));
        groups.create_group("Cats", "cats", "").await.unwrap();

        assert!(matches!(
            groups.create_group("Cats again", "cats", "").await,
            Err(DomainError::GroupAlreadyExists(_))
        ));
        assert!(matches!(
            groups.create_group("Dogs", "Dogs!", "").await,
            Err(DomainError::Validation(_))
        ));

        groups.delete_group("cats").await.unwrap();
        assert!(matches!(
            groups.get_group("cats").await,
            Err(DomainError::GroupNotFound(_))
        ));
    }
}
