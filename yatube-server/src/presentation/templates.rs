use askama::Template;
use uuid::Uuid;

use crate::application::follow_service::FollowStats;
use crate::domain::comment::CommentEntry;
use crate::domain::group::Group;
use crate::domain::page::Page;
use crate::domain::post::PostEntry;
use crate::domain::user::User;
use crate::presentation::urls;
use crate::presentation::view::NamedTemplate;

// Links rendered by the templates go through the same builders as redirects.

impl PostEntry {
    pub fn url(&self) -> String {
        urls::post_detail(self.id)
    }

    pub fn edit_url(&self) -> String {
        urls::post_edit(self.id)
    }

    pub fn comment_url(&self) -> String {
        urls::add_comment(self.id)
    }

    pub fn author_url(&self) -> String {
        urls::profile(&self.author_username)
    }

    pub fn group_url(&self) -> Option<String> {
        self.group_slug.as_deref().map(urls::group_list)
    }
}

impl CommentEntry {
    pub fn author_url(&self) -> String {
        urls::profile(&self.author_username)
    }
}

impl User {
    pub fn follow_url(&self) -> String {
        urls::profile_follow(&self.username)
    }

    pub fn unfollow_url(&self) -> String {
        urls::profile_unfollow(&self.username)
    }
}

/// Profile link for the signed-in username in the page header.
pub trait ProfileLink {
    fn profile_url(&self) -> String;
}

impl ProfileLink for str {
    fn profile_url(&self) -> String {
        urls::profile(self)
    }
}

#[derive(Template)]
#[template(path = "posts/index.html")]
pub struct IndexTemplate<'a> {
    pub viewer: Option<&'a str>,
    pub page: &'a Page<PostEntry>,
}

impl NamedTemplate for IndexTemplate<'_> {
    const NAME: &'static str = "posts/index.html";
}

#[derive(Template)]
#[template(path = "posts/group_list.html")]
pub struct GroupListTemplate<'a> {
    pub viewer: Option<&'a str>,
    pub group: &'a Group,
    pub page: &'a Page<PostEntry>,
}

impl NamedTemplate for GroupListTemplate<'_> {
    const NAME: &'static str = "posts/group_list.html";
}

#[derive(Template)]
#[template(path = "posts/profile.html")]
pub struct ProfileTemplate<'a> {
    pub viewer: Option<&'a str>,
    pub author: &'a User,
    pub page: &'a Page<PostEntry>,
    pub stats: FollowStats,
    pub following: bool,
    pub is_self: bool,
}

impl NamedTemplate for ProfileTemplate<'_> {
    const NAME: &'static str = "posts/profile.html";
}

#[derive(Template)]
#[template(path = "posts/post_detail.html")]
pub struct PostDetailTemplate<'a> {
    pub viewer: Option<&'a str>,
    pub post: &'a PostEntry,
    pub comments: &'a [CommentEntry],
    pub author_post_count: u64,
    pub is_author: bool,
}

impl NamedTemplate for PostDetailTemplate<'_> {
    const NAME: &'static str = "posts/post_detail.html";
}

pub struct GroupOption {
    pub slug: String,
    pub title: String,
    pub selected: bool,
}

impl GroupOption {
    pub fn list(groups: &[Group], selected: &str) -> Vec<Self> {
        groups
            .iter()
            .map(|group| GroupOption {
                slug: group.slug.clone(),
                title: group.title.clone(),
                selected: group.slug == selected,
            })
            .collect()
    }
}

/// Shared by create and edit.
#[derive(Template)]
#[template(path = "posts/create_post.html")]
pub struct PostFormTemplate<'a> {
    pub viewer: Option<&'a str>,
    pub editing: Option<Uuid>,
    pub action: String,
    pub text: &'a str,
    pub groups: Vec<GroupOption>,
    pub errors: &'a [String],
}

impl NamedTemplate for PostFormTemplate<'_> {
    const NAME: &'static str = "posts/create_post.html";
}

#[derive(Template)]
#[template(path = "posts/follow.html")]
pub struct FollowTemplate<'a> {
    pub viewer: Option<&'a str>,
    pub page: &'a Page<PostEntry>,
}

impl NamedTemplate for FollowTemplate<'_> {
    const NAME: &'static str = "posts/follow.html";
}

#[derive(Template)]
#[template(path = "users/signup.html")]
pub struct SignupTemplate<'a> {
    pub viewer: Option<&'a str>,
    pub username: &'a str,
    pub errors: &'a [String],
}

impl NamedTemplate for SignupTemplate<'_> {
    const NAME: &'static str = "users/signup.html";
}

#[derive(Template)]
#[template(path = "users/login.html")]
pub struct LoginTemplate<'a> {
    pub viewer: Option<&'a str>,
    pub username: &'a str,
    pub next: &'a str,
    pub errors: &'a [String],
}

impl NamedTemplate for LoginTemplate<'_> {
    const NAME: &'static str = "users/login.html";
}

#[derive(Template)]
#[template(path = "users/logged_out.html")]
pub struct LoggedOutTemplate<'a> {
    pub viewer: Option<&'a str>,
}

impl NamedTemplate for LoggedOutTemplate<'_> {
    const NAME: &'static str = "users/logged_out.html";
}

#[derive(Template)]
#[template(path = "core/404.html")]
pub struct NotFoundTemplate<'a> {
    pub viewer: Option<&'a str>,
}

impl NamedTemplate for NotFoundTemplate<'_> {
    const NAME: &'static str = "core/404.html";
}

#[derive(Template)]
#[template(path = "core/403.html")]
pub struct ForbiddenTemplate<'a> {
    pub viewer: Option<&'a str>,
}

impl NamedTemplate for ForbiddenTemplate<'_> {
    const NAME: &'static str = "core/403.html";
}

#[derive(Template)]
#[template(path = "core/405.html")]
pub struct MethodNotAllowedTemplate<'a> {
    pub viewer: Option<&'a str>,
}

impl NamedTemplate for MethodNotAllowedTemplate<'_> {
    const NAME: &'static str = "core/405.html";
}

#[derive(Template)]
#[template(path = "core/500.html")]
pub struct ServerErrorTemplate<'a> {
    pub viewer: Option<&'a str>,
    pub status: u16,
}

impl NamedTemplate for ServerErrorTemplate<'_> {
    const NAME: &'static str = "core/500.html";
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(author: &str, group_slug: Option<&str>) -> PostEntry {
        PostEntry {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            author_username: author.to_string(),
            text: "text".to_string(),
            group_id: group_slug.map(|_| Uuid::new_v4()),
            group_slug: group_slug.map(str::to_string),
            group_title: group_slug.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn post_links_match_routes() {
        let post = entry("leo", Some("cats"));
        assert_eq!(post.url(), format!("/posts/{}/", post.id));
        assert_eq!(post.edit_url(), format!("/posts/{}/edit/", post.id));
        assert_eq!(post.comment_url(), format!("/posts/{}/comment/", post.id));
        assert_eq!(post.author_url(), "/profile/leo/");
        assert_eq!(post.group_url().as_deref(), Some("/group/cats/"));
        assert_eq!(entry("leo", None).group_url(), None);
    }

    #[test]
    fn usernames_are_encoded_in_links() {
        let post = entry("лев", None);
        assert_eq!(post.author_url(), "/profile/%D0%BB%D0%B5%D0%B2/");
        assert_eq!("a b".profile_url(), "/profile/a%20b/");

        let user = User::new("a/b".into(), String::new());
        assert_eq!(user.follow_url(), "/profile/a%2Fb/follow/");
        assert_eq!(user.unfollow_url(), "/profile/a%2Fb/unfollow/");
    }
}
