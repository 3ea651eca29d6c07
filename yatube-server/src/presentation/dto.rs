use serde::Deserialize;

// ======================= POSTS =======================

#[derive(Debug, Default, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub text: String,
    /// Group slug; empty for none.
    #[serde(default)]
    pub group: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
}

impl PageQuery {
    /// Unparseable page numbers fall back to the first page.
    pub fn number(&self) -> Option<u32> {
        self.page.as_deref().and_then(|raw| raw.trim().parse().ok())
    }
}

// ======================= AUTH =======================

#[derive(Debug, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    #[serde(default)]
    pub next: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_numbers_parse_leniently() {
        let query = |page: Option<&str>| PageQuery {
            page: page.map(str::to_string),
        };
        assert_eq!(query(Some("3")).number(), Some(3));
        assert_eq!(query(Some("last")).number(), None);
        assert_eq!(query(None).number(), None);
    }
}
