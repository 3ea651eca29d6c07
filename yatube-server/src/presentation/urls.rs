//! Path builders for every named route, so redirects and links agree with
//! the routing table.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use uuid::Uuid;

pub const INDEX: &str = "/";
pub const POST_CREATE: &str = "/create/";
pub const FOLLOW_INDEX: &str = "/follow/";
pub const SIGNUP: &str = "/auth/signup/";
pub const LOGIN: &str = "/auth/login/";
pub const LOGOUT: &str = "/auth/logout/";

/// `next` keeps slashes readable: `/auth/login/?next=/create/`.
const NEXT_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'@')
    .remove(b'+');

fn segment(value: &str) -> impl std::fmt::Display + '_ {
    utf8_percent_encode(value, PATH_SEGMENT)
}

pub fn group_list(slug: &str) -> String {
    format!("/group/{}/", segment(slug))
}

pub fn profile(username: &str) -> String {
    format!("/profile/{}/", segment(username))
}

pub fn profile_follow(username: &str) -> String {
    format!("/profile/{}/follow/", segment(username))
}

pub fn profile_unfollow(username: &str) -> String {
    format!("/profile/{}/unfollow/", segment(username))
}

pub fn post_detail(id: Uuid) -> String {
    format!("/posts/{}/", id)
}

pub fn post_edit(id: Uuid) -> String {
    format!("/posts/{}/edit/", id)
}

pub fn add_comment(id: Uuid) -> String {
    format!("/posts/{}/comment/", id)
}

pub fn login_with_next(next: &str) -> String {
    format!("{}?next={}", LOGIN, utf8_percent_encode(next, NEXT_VALUE))
}

/// Accepts only same-site paths as a post-login destination.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => INDEX,
    }
}
