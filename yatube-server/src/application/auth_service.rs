use std::sync::Arc;

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::data::user_repository::UserRepository;
use crate::domain::{error::DomainError, user::User};
use crate::infrastructure::security::{JwtKeys, hash_password, verify_password};

const USERNAME_MAX_LEN: usize = 150;
const PASSWORD_MIN_LEN: usize = 8;

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub async fn get_by_username(&self, username: &str) -> Result<User, DomainError> {
        self.repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))
    }

    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let username = username.trim();
        validate_username(username)?;
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(DomainError::Validation(format!(
                "password must be at least {} characters",
                PASSWORD_MIN_LEN
            )));
        }

        let hash =
            hash_password(password).map_err(|err| DomainError::Internal(err.to_string()))?;
        self.repo.create(User::new(username.to_string(), hash)).await
    }

    /// Checks credentials. Unknown users and wrong passwords are indistinguishable.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .repo
            .find_by_username(username.trim())
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|_| DomainError::Unauthorized)?;
        if !valid {
            return Err(DomainError::Unauthorized);
        }
        Ok(user)
    }

    pub fn issue_session(&self, user: &User) -> Result<String, DomainError> {
        self.keys
            .generate_token(user.id)
            .map_err(|err| DomainError::Internal(err.to_string()))
    }

    /// The user a session token belongs to, or `None` for anything invalid,
    /// expired, or pointing at a deleted account.
    pub async fn resolve_session(&self, token: &str) -> Option<User> {
        let claims = match self.keys.verify_token(token) {
            Ok(claims) => claims,
            Err(err) => {
                debug!(%err, "rejected session token");
                return None;
            }
        };
        let user_id = Uuid::parse_str(&claims.sub).ok()?;
        self.repo.find_by_id(user_id).await.ok().flatten()
    }
}

fn validate_username(username: &str) -> Result<(), DomainError> {
    if username.is_empty() || username.chars().count() > USERNAME_MAX_LEN {
        return Err(DomainError::Validation(format!(
            "username must be 1 to {} characters",
            USERNAME_MAX_LEN
        )));
    }
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !username.chars().all(allowed) {
        return Err(DomainError::Validation(
            "username may contain only letters, digits and @/./+/-/_".to_string(),
        ));
    }
    Ok(())
}
