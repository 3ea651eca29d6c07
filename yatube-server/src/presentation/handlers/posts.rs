use actix_web::{HttpRequest, web};
use tracing::info;
use uuid::Uuid;

use crate::application::auth_service::AuthService;
use crate::application::follow_service::FollowService;
use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::domain::group::Group;
use crate::domain::post::PostFilter;
use crate::presentation::dto::{CommentForm, PageQuery, PostForm};
use crate::presentation::templates::{
    FollowTemplate, GroupListTemplate, GroupOption, IndexTemplate, PostDetailTemplate,
    PostFormTemplate, ProfileTemplate,
};
use crate::presentation::urls;
use crate::presentation::utils::{
    Viewer, found, login_required, page_number, parse_id, request_id, submitted,
};
use crate::presentation::view::View;

pub async fn index(
    viewer: Viewer,
    posts: web::Data<PostService>,
    query: Option<web::Query<PageQuery>>,
) -> Result<View, DomainError> {
    let page = posts.list_posts(PostFilter::All, page_number(query)).await?;
    View::render(&IndexTemplate {
        viewer: viewer.username(),
        page: &page,
    })
}

pub async fn group_list(
    viewer: Viewer,
    posts: web::Data<PostService>,
    path: web::Path<String>,
    query: Option<web::Query<PageQuery>>,
) -> Result<View, DomainError> {
    let Some((group, page)) = found(posts.group_posts(&path, page_number(query)).await)? else {
        return Ok(View::not_found());
    };
    View::render(&GroupListTemplate {
        viewer: viewer.username(),
        group: &group,
        page: &page,
    })
}

pub async fn profile(
    viewer: Viewer,
    auth: web::Data<AuthService>,
    posts: web::Data<PostService>,
    follows: web::Data<FollowService>,
    path: web::Path<String>,
    query: Option<web::Query<PageQuery>>,
) -> Result<View, DomainError> {
    let Some(author) = found(auth.get_by_username(&path).await)? else {
        return Ok(View::not_found());
    };

    let page = posts
        .list_posts(PostFilter::Author(author.id), page_number(query))
        .await?;
    let stats = follows.stats(author.id).await?;
    let following = match viewer.user() {
        Some(user) => follows.is_following(user.id, author.id).await?,
        None => false,
    };

    View::render(&ProfileTemplate {
        viewer: viewer.username(),
        author: &author,
        page: &page,
        stats,
        following,
        is_self: viewer.is(author.id),
    })
}

pub async fn post_detail(
    viewer: Viewer,
    posts: web::Data<PostService>,
    path: web::Path<String>,
) -> Result<View, DomainError> {
    let Some(id) = parse_id(&path) else {
        return Ok(View::not_found());
    };
    let Some(post) = found(posts.get_entry(id).await)? else {
        return Ok(View::not_found());
    };

    let comments = posts.comments(id).await?;
    let author_post_count = posts.count_posts(PostFilter::Author(post.author_id)).await?;

    View::render(&PostDetailTemplate {
        viewer: viewer.username(),
        post: &post,
        comments: &comments,
        author_post_count,
        is_author: viewer.is(post.author_id),
    })
}

fn post_form(
    viewer: &Viewer,
    editing: Option<Uuid>,
    text: &str,
    group_slug: &str,
    groups: &[Group],
    errors: &[String],
) -> Result<View, DomainError> {
    let action = match editing {
        Some(id) => urls::post_edit(id),
        None => urls::POST_CREATE.to_string(),
    };
    View::render(&PostFormTemplate {
        viewer: viewer.username(),
        editing,
        action,
        text,
        groups: GroupOption::list(groups, group_slug),
        errors,
    })
}

pub async fn post_create_form(
    req: HttpRequest,
    viewer: Viewer,
    posts: web::Data<PostService>,
) -> Result<View, DomainError> {
    if viewer.user().is_none() {
        return Ok(login_required(&req));
    }
    let groups = posts.groups().await?;
    post_form(&viewer, None, "", "", &groups, &[])
}

pub async fn post_create(
    req: HttpRequest,
    viewer: Viewer,
    posts: web::Data<PostService>,
    form: Option<web::Form<PostForm>>,
) -> Result<View, DomainError> {
    let Some(user) = viewer.user() else {
        return Ok(login_required(&req));
    };
    let form = submitted(form);

    match posts.prepare_draft(&form.text, &form.group).await {
        Ok(draft) => {
            let post = posts.create_post(user.id, draft).await?;
            info!(
                request_id = %request_id(&req),
                username = %user.username,
                post_id = %post.id,
                "post created"
            );
            Ok(View::redirect(urls::profile(&user.username)))
        }
        Err(DomainError::Validation(message)) => {
            let groups = posts.groups().await?;
            post_form(&viewer, None, &form.text, &form.group, &groups, &[message])
        }
        Err(err) => Err(err),
    }
}

pub async fn post_edit_form(
    req: HttpRequest,
    viewer: Viewer,
    posts: web::Data<PostService>,
    path: web::Path<String>,
) -> Result<View, DomainError> {
    let Some(user) = viewer.user() else {
        return Ok(login_required(&req));
    };
    let Some(id) = parse_id(&path) else {
        return Ok(View::not_found());
    };
    let Some(post) = found(posts.get_entry(id).await)? else {
        return Ok(View::not_found());
    };
    if post.author_id != user.id {
        return Ok(View::redirect(urls::post_detail(id)));
    }

    let groups = posts.groups().await?;
    post_form(
        &viewer,
        Some(id),
        &post.text,
        post.group_slug.as_deref().unwrap_or_default(),
        &groups,
        &[],
    )
}

pub async fn post_edit(
    req: HttpRequest,
    viewer: Viewer,
    posts: web::Data<PostService>,
    path: web::Path<String>,
    form: Option<web::Form<PostForm>>,
) -> Result<View, DomainError> {
    let Some(user) = viewer.user() else {
        return Ok(login_required(&req));
    };
    let form = submitted(form);
    let Some(id) = parse_id(&path) else {
        return Ok(View::not_found());
    };
    let Some(post) = found(posts.get_post(id).await)? else {
        return Ok(View::not_found());
    };
    if post.author_id != user.id {
        return Ok(View::redirect(urls::post_detail(id)));
    }

    let draft = match posts.prepare_draft(&form.text, &form.group).await {
        Ok(draft) => draft,
        Err(DomainError::Validation(message)) => {
            let groups = posts.groups().await?;
            return post_form(&viewer, Some(id), &form.text, &form.group, &groups, &[message]);
        }
        Err(err) => return Err(err),
    };

    match posts.update_post(user.id, id, draft).await {
        Ok(_) => {
            info!(
                request_id = %request_id(&req),
                username = %user.username,
                post_id = %id,
                "post updated"
            );
            Ok(View::redirect(urls::post_detail(id)))
        }
        Err(DomainError::Forbidden) => Ok(View::redirect(urls::post_detail(id))),
        Err(err) if err.is_not_found() => Ok(View::not_found()),
        Err(err) => Err(err),
    }
}

pub async fn add_comment(
    req: HttpRequest,
    viewer: Viewer,
    posts: web::Data<PostService>,
    path: web::Path<String>,
    form: Option<web::Form<CommentForm>>,
) -> Result<View, DomainError> {
    let Some(user) = viewer.user() else {
        return Ok(login_required(&req));
    };
    let form = submitted(form);
    let Some(id) = parse_id(&path) else {
        return Ok(View::not_found());
    };

    match posts.add_comment(id, user.id, &form.text).await {
        // a blank comment is dropped silently
        Ok(_) | Err(DomainError::Validation(_)) => Ok(View::redirect(urls::post_detail(id))),
        Err(err) if err.is_not_found() => Ok(View::not_found()),
        Err(err) => Err(err),
    }
}

pub async fn follow_index(
    req: HttpRequest,
    viewer: Viewer,
    posts: web::Data<PostService>,
    query: Option<web::Query<PageQuery>>,
) -> Result<View, DomainError> {
    let Some(user) = viewer.user() else {
        return Ok(login_required(&req));
    };
    let page = posts
        .list_posts(PostFilter::FollowedBy(user.id), page_number(query))
        .await?;
    View::render(&FollowTemplate {
        viewer: viewer.username(),
        page: &page,
    })
}
