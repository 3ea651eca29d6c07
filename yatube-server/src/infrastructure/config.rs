use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the site on the in-memory store.
    pub database_url: Option<String>,
    pub secret_key: String,
    pub posts_per_page: u32,
    pub session_ttl_hours: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let secret_key =
            lookup("SECRET_KEY").ok_or_else(|| anyhow::anyhow!("SECRET_KEY must be set"))?;
        let posts_per_page = lookup("POSTS_PER_PAGE")
            .unwrap_or_else(|| "10".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid POSTS_PER_PAGE: {}", e))?;
        let session_ttl_hours = lookup("SESSION_TTL_HOURS")
            .unwrap_or_else(|| "24".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid SESSION_TTL_HOURS: {}", e))?;

        if posts_per_page == 0 {
            anyhow::bail!("POSTS_PER_PAGE must be positive");
        }

        Ok(Self {
            host,
            port,
            database_url,
            secret_key,
            posts_per_page,
            session_ttl_hours,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = AppConfig::from_lookup(lookup(&[("SECRET_KEY", "s3cret")])).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, None);
        assert_eq!(config.posts_per_page, 10);
        assert_eq!(config.session_ttl_hours, 24);
    }

    #[test]
    fn secret_key_is_required() {
        assert!(AppConfig::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn rejects_bad_numbers() {
        let vars = [("SECRET_KEY", "s"), ("PORT", "http")];
        assert!(AppConfig::from_lookup(lookup(&vars)).is_err());
        let vars = [("SECRET_KEY", "s"), ("POSTS_PER_PAGE", "0")];
        assert!(AppConfig::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn blank_database_url_means_memory() {
        let vars = [("SECRET_KEY", "s"), ("DATABASE_URL", " ")];
        let config = AppConfig::from_lookup(lookup(&vars)).unwrap();
        assert!(config.database_url.is_none());
    }
}
