//! The routing table: every public path, its name, and the handler per method.
//! Anything else falls through to the 404 page.

use actix_web::{Resource, web};

use crate::presentation::handlers::{auth, core, follow, posts};

/// A named resource that answers unsupported methods with the 405 page.
fn resource(path: &str, name: &str) -> Resource {
    web::resource(path)
        .name(name)
        .default_service(web::to(core::method_not_allowed))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        resource("/", "posts:index")
            .route(web::get().to(posts::index)),
    )
    .service(
        resource("/group/{slug}/", "posts:group_list")
            .route(web::get().to(posts::group_list)),
    )
    .service(
        resource("/profile/{username}/", "posts:profile")
            .route(web::get().to(posts::profile)),
    )
    .service(
        resource("/profile/{username}/follow/", "posts:profile_follow")
            .route(web::get().to(follow::profile_follow)),
    )
    .service(
        resource("/profile/{username}/unfollow/", "posts:profile_unfollow")
            .route(web::get().to(follow::profile_unfollow)),
    )
    .service(
        resource("/posts/{id}/", "posts:post_detail")
            .route(web::get().to(posts::post_detail)),
    )
    .service(
        resource("/posts/{id}/edit/", "posts:post_edit")
            .route(web::get().to(posts::post_edit_form))
            .route(web::post().to(posts::post_edit)),
    )
    .service(
        resource("/posts/{id}/comment/", "posts:add_comment")
            .route(web::post().to(posts::add_comment)),
    )
    .service(
        resource("/create/", "posts:post_create")
            .route(web::get().to(posts::post_create_form))
            .route(web::post().to(posts::post_create)),
    )
    .service(
        resource("/follow/", "posts:follow_index")
            .route(web::get().to(posts::follow_index)),
    )
    .service(
        resource("/auth/signup/", "users:signup")
            .route(web::get().to(auth::signup_form))
            .route(web::post().to(auth::signup)),
    )
    .service(
        resource("/auth/login/", "users:login")
            .route(web::get().to(auth::login_form))
            .route(web::post().to(auth::login)),
    )
    .service(
        resource("/auth/logout/", "users:logout")
            .route(web::get().to(auth::logout)),
    )
    .default_service(web::to(core::not_found));
}
