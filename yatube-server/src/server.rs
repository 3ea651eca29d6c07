use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpServer, web};
use tracing::info;

use crate::application::auth_service::AuthService;
use crate::application::follow_service::FollowService;
use crate::application::group_service::GroupService;
use crate::application::post_service::PostService;
use crate::data::Repositories;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::security::JwtKeys;
use crate::presentation::middleware::{RequestIdMiddleware, SessionMiddleware, TimingMiddleware};
use crate::presentation::routes;

/// Everything the handlers need, built once and cloned into each worker.
#[derive(Clone)]
pub struct AppServices {
    pub auth: AuthService,
    pub posts: PostService,
    pub groups: GroupService,
    pub follows: FollowService,
}

impl AppServices {
    pub fn new(repos: Repositories, keys: JwtKeys, posts_per_page: u32) -> Self {
        Self {
            auth: AuthService::new(repos.users.clone(), keys),
            posts: PostService::new(
                repos.posts.clone(),
                repos.groups.clone(),
                repos.comments.clone(),
                posts_per_page,
            ),
            groups: GroupService::new(repos.groups.clone()),
            follows: FollowService::new(repos.follows.clone(), repos.users.clone()),
        }
    }

    pub fn from_config(config: &AppConfig, repos: Repositories) -> Self {
        Self::new(
            repos,
            JwtKeys::new(config.secret_key.clone(), config.session_ttl_hours),
            config.posts_per_page,
        )
    }
}

pub fn build_app(
    services: AppServices,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(SessionMiddleware::new(services.auth.clone()))
        .wrap(TimingMiddleware)
        .wrap(RequestIdMiddleware)
        .wrap(
            DefaultHeaders::new()
                .add(("X-Content-Type-Options", "nosniff"))
                .add(("Referrer-Policy", "same-origin"))
                .add(("X-Frame-Options", "DENY"))
                .add(("Cross-Origin-Opener-Policy", "same-origin")),
        )
        .wrap(Logger::default())
        .app_data(web::Data::new(services.auth))
        .app_data(web::Data::new(services.posts))
        .app_data(web::Data::new(services.groups))
        .app_data(web::Data::new(services.follows))
        .configure(routes::configure)
}

pub async fn start_http_server(config: &AppConfig, services: AppServices) -> anyhow::Result<()> {
    let bind_address = (config.host.as_str(), config.port);
    info!(host = %bind_address.0, port = bind_address.1, "HTTP server starting");

    HttpServer::new(move || build_app(services.clone()))
        .bind(bind_address)?
        .run()
        .await
        .map_err(anyhow::Error::new)?;

    info!("HTTP server stopped");
    Ok(())
}
