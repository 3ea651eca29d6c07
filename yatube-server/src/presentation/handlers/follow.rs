use actix_web::{HttpRequest, web};
use tracing::info;

use crate::application::follow_service::FollowService;
use crate::domain::error::DomainError;
use crate::presentation::urls;
use crate::presentation::utils::{Viewer, found, login_required, request_id};
use crate::presentation::view::View;

pub async fn profile_follow(
    req: HttpRequest,
    viewer: Viewer,
    follows: web::Data<FollowService>,
    path: web::Path<String>,
) -> Result<View, DomainError> {
    let Some(user) = viewer.user() else {
        return Ok(login_required(&req));
    };
    let Some(author) = found(follows.follow(user.id, &path).await)? else {
        return Ok(View::not_found());
    };

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        author = %author.username,
        "followed author"
    );
    Ok(View::redirect(urls::profile(&author.username)))
}

pub async fn profile_unfollow(
    req: HttpRequest,
    viewer: Viewer,
    follows: web::Data<FollowService>,
    path: web::Path<String>,
) -> Result<View, DomainError> {
    let Some(user) = viewer.user() else {
        return Ok(login_required(&req));
    };
    let Some(author) = found(follows.unfollow(user.id, &path).await)? else {
        return Ok(View::not_found());
    };

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        author = %author.username,
        "unfollowed author"
    );
    Ok(View::redirect(urls::profile(&author.username)))
}
