#![allow(dead_code)]

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::LOCATION;

use yatube::data::Repositories;
use yatube::domain::group::Group;
use yatube::domain::post::Post;
use yatube::domain::user::User;
use yatube::infrastructure::security::JwtKeys;
use yatube::presentation::middleware::SESSION_COOKIE;
use yatube::presentation::view::TemplateUsed;
use yatube::server::AppServices;

pub const USER_NAME: &str = "auth";
pub const SLUG: &str = "test-slug";
pub const POST_TEXT: &str = "Test post text";

/// An author with one post filed under one group.
pub struct Fixture {
    pub repos: Repositories,
    pub services: AppServices,
    pub author: User,
    pub group: Group,
    pub post: Post,
}

impl Fixture {
    pub async fn new() -> Self {
        let repos = Repositories::in_memory();
        let services = AppServices::new(repos.clone(), JwtKeys::new("test-secret".into(), 1), 10);

        let author = repos
            .users
            .create(User::new(USER_NAME.into(), "unused".into()))
            .await
            .expect("create author");
        let group = repos
            .groups
            .create(Group::new(
                "Test group".into(),
                SLUG.into(),
                "Test description".into(),
            ))
            .await
            .expect("create group");
        let post = repos
            .posts
            .create(Post::new(author.id, POST_TEXT.into(), Some(group.id)))
            .await
            .expect("create post");

        Self {
            repos,
            services,
            author,
            group,
            post,
        }
    }

    pub async fn user(&self, username: &str) -> User {
        self.repos
            .users
            .create(User::new(username.into(), "unused".into()))
            .await
            .expect("create user")
    }

    /// A session cookie logging the client in as `user`.
    pub fn login(&self, user: &User) -> Cookie<'static> {
        let token = self.services.auth.issue_session(user).expect("issue session");
        Cookie::new(SESSION_COOKIE, token)
    }
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(LOCATION)
        .expect("redirect has a location")
        .to_str()
        .expect("ascii location")
        .to_string()
}

pub fn template<B>(resp: &ServiceResponse<B>) -> Option<&'static str> {
    resp.response()
        .extensions()
        .get::<TemplateUsed>()
        .map(|used| used.0)
}
