use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, web};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::presentation::dto::PageQuery;
use crate::presentation::middleware::RequestId;
use crate::presentation::urls;
use crate::presentation::view::View;

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
}

/// Who is making the current request. Resolved once per request by the
/// session middleware; anonymous when there is no valid session.
#[derive(Debug, Clone, Default)]
pub struct Viewer(Option<AuthenticatedUser>);

impl Viewer {
    pub fn of(req: &HttpRequest) -> Self {
        Self(req.extensions().get::<AuthenticatedUser>().cloned())
    }

    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.0.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.0.as_ref().map(|user| user.username.as_str())
    }

    pub fn is(&self, user_id: Uuid) -> bool {
        self.0.as_ref().is_some_and(|user| user.id == user_id)
    }
}

impl FromRequest for Viewer {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Viewer::of(req)))
    }
}

/// Sends an anonymous visitor to the login page, returning them to the
/// requested path afterwards.
pub fn login_required(req: &HttpRequest) -> View {
    let next = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| req.path());
    View::redirect(urls::login_with_next(next))
}

/// Form bodies are taken as `Option` so gates run before the body matters.
/// A missing or malformed body counts as an empty submission.
pub fn submitted<T: Default>(form: Option<web::Form<T>>) -> T {
    form.map(web::Form::into_inner).unwrap_or_default()
}

/// Page number from the query string. A query that does not deserialize,
/// such as a repeated `page`, means the first page.
pub fn page_number(query: Option<web::Query<PageQuery>>) -> Option<u32> {
    query.and_then(|query| query.number())
}

pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

/// Separates "no such entity" from real failures so handlers can answer
/// with the 404 page.
pub fn found<T>(result: Result<T, DomainError>) -> Result<Option<T>, DomainError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}
