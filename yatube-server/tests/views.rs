mod common;

use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::test;

use common::{Fixture, POST_TEXT, SLUG, location, template};
use yatube::domain::post::{Post, PostFilter};
use yatube::server::build_app;

fn body_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[actix_web::test]
async fn create_post_redirects_to_profile() {
    let fx = Fixture::new().await;
    let app = test::init_service(build_app(fx.services.clone())).await;

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(fx.login(&fx.author))
        .set_form([("text", "Fresh post"), ("group", SLUG)])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/auth/");

    let index = fx.services.posts.list_posts(PostFilter::All, None).await.unwrap();
    assert_eq!(index.total, 2);
    assert_eq!(index.items[0].text, "Fresh post");
    assert_eq!(index.items[0].group_slug.as_deref(), Some(SLUG));
}

#[actix_web::test]
async fn blank_post_rerenders_form() {
    let fx = Fixture::new().await;
    let app = test::init_service(build_app(fx.services.clone())).await;

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(fx.login(&fx.author))
        .set_form([("text", "   "), ("group", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(template(&resp), Some("posts/create_post.html"));
    assert_eq!(
        fx.services.posts.count_posts(PostFilter::All).await.unwrap(),
        1
    );
}

#[actix_web::test]
async fn anonymous_create_is_not_saved() {
    let fx = Fixture::new().await;
    let app = test::init_service(build_app(fx.services.clone())).await;

    let req = test::TestRequest::post()
        .uri("/create/")
        .set_form([("text", "Sneaky"), ("group", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), "/auth/login/?next=/create/");
    assert_eq!(
        fx.services.posts.count_posts(PostFilter::All).await.unwrap(),
        1
    );
}

#[actix_web::test]
async fn guest_posts_without_form_body_go_to_login() {
    let fx = Fixture::new().await;
    let app = test::init_service(build_app(fx.services.clone())).await;

    let paths = [
        "/create/".to_string(),
        format!("/posts/{}/edit/", fx.post.id),
        format!("/posts/{}/comment/", fx.post.id),
    ];
    for path in &paths {
        let bare = test::TestRequest::post().uri(path).to_request();
        let resp = test::call_service(&app, bare).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "POST {}", path);
        assert_eq!(location(&resp), format!("/auth/login/?next={path}"));

        let json = test::TestRequest::post()
            .uri(path)
            .insert_header((CONTENT_TYPE, "application/json"))
            .set_payload(r#"{"text":"Sneaky"}"#)
            .to_request();
        let resp = test::call_service(&app, json).await;
        assert_eq!(location(&resp), format!("/auth/login/?next={path}"));
    }
    assert_eq!(
        fx.services.posts.count_posts(PostFilter::All).await.unwrap(),
        1
    );
}

#[actix_web::test]
async fn author_post_without_form_body_rerenders_form() {
    let fx = Fixture::new().await;
    let app = test::init_service(build_app(fx.services.clone())).await;

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(fx.login(&fx.author))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(template(&resp), Some("posts/create_post.html"));
    assert_eq!(
        fx.services.posts.count_posts(PostFilter::All).await.unwrap(),
        1
    );
}

#[actix_web::test]
async fn author_edits_post() {
    let fx = Fixture::new().await;
    let app = test::init_service(build_app(fx.services.clone())).await;

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", fx.post.id))
        .cookie(fx.login(&fx.author))
        .set_form([("text", "Edited"), ("group", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", fx.post.id));

    let post = fx.services.posts.get_post(fx.post.id).await.unwrap();
    assert_eq!(post.text, "Edited");
    assert_eq!(post.group_id, None);
}

#[actix_web::test]
async fn stranger_cannot_edit_post() {
    let fx = Fixture::new().await;
    let stranger = fx.user("stranger").await;
    let app = test::init_service(build_app(fx.services.clone())).await;

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", fx.post.id))
        .cookie(fx.login(&stranger))
        .set_form([("text", "Defaced"), ("group", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), format!("/posts/{}/", fx.post.id));
    let post = fx.services.posts.get_post(fx.post.id).await.unwrap();
    assert_eq!(post.text, POST_TEXT);
    assert_eq!(post.group_id, Some(fx.group.id));
}

#[actix_web::test]
async fn comments_need_login() {
    let fx = Fixture::new().await;
    let reader = fx.user("reader").await;
    let app = test::init_service(build_app(fx.services.clone())).await;
    let path = format!("/posts/{}/comment/", fx.post.id);

    let anonymous = test::TestRequest::post()
        .uri(&path)
        .set_form([("text", "Anonymous words")])
        .to_request();
    let resp = test::call_service(&app, anonymous).await;
    assert_eq!(location(&resp), format!("/auth/login/?next={path}"));

    let signed_in = test::TestRequest::post()
        .uri(&path)
        .cookie(fx.login(&reader))
        .set_form([("text", "Nice post")])
        .to_request();
    let resp = test::call_service(&app, signed_in).await;
    assert_eq!(location(&resp), format!("/posts/{}/", fx.post.id));

    let comments = fx.services.posts.comments(fx.post.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author_username, "reader");

    let detail = test::TestRequest::get()
        .uri(&format!("/posts/{}/", fx.post.id))
        .to_request();
    let body = test::call_and_read_body(&app, detail).await;
    assert!(body_text(&body).contains("Nice post"));
}

#[actix_web::test]
async fn follow_feed_shows_followed_authors_only() {
    let fx = Fixture::new().await;
    let writer = fx.user("writer").await;
    let other = fx.user("other").await;
    fx.repos
        .posts
        .create(Post::new(writer.id, "Followed words".into(), None))
        .await
        .unwrap();
    fx.repos
        .posts
        .create(Post::new(other.id, "Unfollowed words".into(), None))
        .await
        .unwrap();
    let app = test::init_service(build_app(fx.services.clone())).await;
    let session = fx.login(&fx.author);

    let follow = test::TestRequest::get()
        .uri("/profile/writer/follow/")
        .cookie(session.clone())
        .to_request();
    test::call_service(&app, follow).await;

    let feed = test::TestRequest::get()
        .uri("/follow/")
        .cookie(session)
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, feed).await);
    assert!(body.contains("Followed words"));
    assert!(!body.contains("Unfollowed words"));
    assert!(!body.contains(POST_TEXT));
}

#[actix_web::test]
async fn following_yourself_changes_nothing() {
    let fx = Fixture::new().await;
    let app = test::init_service(build_app(fx.services.clone())).await;

    let req = test::TestRequest::get()
        .uri("/profile/auth/follow/")
        .cookie(fx.login(&fx.author))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), "/profile/auth/");
    assert!(
        !fx.services
            .follows
            .is_following(fx.author.id, fx.author.id)
            .await
            .unwrap()
    );
}

#[actix_web::test]
async fn deleted_group_keeps_its_posts() {
    let fx = Fixture::new().await;
    fx.services.groups.delete_group(SLUG).await.unwrap();
    let app = test::init_service(build_app(fx.services.clone())).await;

    let group = test::TestRequest::get()
        .uri(&format!("/group/{SLUG}/"))
        .to_request();
    assert_eq!(
        test::call_service(&app, group).await.status(),
        StatusCode::NOT_FOUND
    );

    let detail = test::TestRequest::get()
        .uri(&format!("/posts/{}/", fx.post.id))
        .to_request();
    assert_eq!(test::call_service(&app, detail).await.status(), StatusCode::OK);

    let post = fx.services.posts.get_post(fx.post.id).await.unwrap();
    assert_eq!(post.group_id, None);
}

#[actix_web::test]
async fn listing_pages_accept_any_page_number() {
    let fx = Fixture::new().await;
    for i in 0..12 {
        fx.repos
            .posts
            .create(Post::new(fx.author.id, format!("post {i}"), None))
            .await
            .unwrap();
    }
    let app = test::init_service(build_app(fx.services.clone())).await;

    for uri in [
        "/?page=2",
        "/?page=99",
        "/?page=abc",
        "/?page=1&page=2",
        "/profile/auth/?page=2",
        "/group/test-slug/?page=1&page=2",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {}", uri);
    }

    let second = test::TestRequest::get().uri("/?page=2").to_request();
    let body = body_text(&test::call_and_read_body(&app, second).await);
    assert!(body.contains("page 2 of 2"));
}

#[actix_web::test]
async fn signup_logs_in() {
    let fx = Fixture::new().await;
    let app = test::init_service(build_app(fx.services.clone())).await;

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form([
            ("username", "newcomer"),
            ("password1", "a-long-password"),
            ("password2", "a-long-password"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    let session = resp
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "sessionid")
        .expect("session cookie")
        .into_owned();
    assert!(session.http_only().unwrap_or(false));

    let create = test::TestRequest::get()
        .uri("/create/")
        .cookie(session)
        .to_request();
    assert_eq!(test::call_service(&app, create).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn signup_rejects_mismatched_passwords() {
    let fx = Fixture::new().await;
    let app = test::init_service(build_app(fx.services.clone())).await;

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form([
            ("username", "newcomer"),
            ("password1", "a-long-password"),
            ("password2", "another-password"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(template(&resp), Some("users/signup.html"));
    assert!(fx.services.auth.get_by_username("newcomer").await.is_err());
}

#[actix_web::test]
async fn login_returns_to_next() {
    let fx = Fixture::new().await;
    fx.services
        .auth
        .register("reader", "correct-horse")
        .await
        .unwrap();
    let app = test::init_service(build_app(fx.services.clone())).await;

    let wrong = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form([
            ("username", "reader"),
            ("password", "battery-staple"),
            ("next", "/follow/"),
        ])
        .to_request();
    let resp = test::call_service(&app, wrong).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(template(&resp), Some("users/login.html"));

    let right = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form([
            ("username", "reader"),
            ("password", "correct-horse"),
            ("next", "/follow/"),
        ])
        .to_request();
    let resp = test::call_service(&app, right).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/follow/");
    assert!(
        resp.response()
            .cookies()
            .any(|cookie| cookie.name() == "sessionid")
    );
}

#[actix_web::test]
async fn login_ignores_foreign_next() {
    let fx = Fixture::new().await;
    fx.services
        .auth
        .register("reader", "correct-horse")
        .await
        .unwrap();
    let app = test::init_service(build_app(fx.services.clone())).await;

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form([
            ("username", "reader"),
            ("password", "correct-horse"),
            ("next", "//evil.example/"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/");
}

#[actix_web::test]
async fn logout_clears_session() {
    let fx = Fixture::new().await;
    let app = test::init_service(build_app(fx.services.clone())).await;

    let req = test::TestRequest::get()
        .uri("/auth/logout/")
        .cookie(fx.login(&fx.author))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(template(&resp), Some("users/logged_out.html"));
    let cleared = resp
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "sessionid")
        .expect("removal cookie");
    assert_eq!(cleared.value(), "");
}
