use actix_web::{HttpRequest, web};
use tracing::info;

use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{LoginForm, NextQuery, SignupForm};
use crate::presentation::middleware::{session_cookie, session_removal_cookie};
use crate::presentation::templates::{LoggedOutTemplate, LoginTemplate, SignupTemplate};
use crate::presentation::urls;
use crate::presentation::utils::{Viewer, request_id, submitted};
use crate::presentation::view::View;

const BAD_CREDENTIALS: &str = "Please enter a correct username and password.";

pub async fn signup_form(viewer: Viewer) -> Result<View, DomainError> {
    View::render(&SignupTemplate {
        viewer: viewer.username(),
        username: "",
        errors: &[],
    })
}

pub async fn signup(
    req: HttpRequest,
    viewer: Viewer,
    auth: web::Data<AuthService>,
    form: Option<web::Form<SignupForm>>,
) -> Result<View, DomainError> {
    let form = submitted(form);
    let rejected = |message: String| {
        View::render(&SignupTemplate {
            viewer: viewer.username(),
            username: &form.username,
            errors: &[message],
        })
    };

    if form.password1 != form.password2 {
        return rejected("The two password fields didn't match.".to_string());
    }

    let user = match auth.register(&form.username, &form.password1).await {
        Ok(user) => user,
        Err(DomainError::Validation(message)) => return rejected(message),
        Err(DomainError::UserAlreadyExists(_)) => {
            return rejected("A user with that username already exists.".to_string());
        }
        Err(err) => return Err(err),
    };

    let token = auth.issue_session(&user)?;
    info!(request_id = %request_id(&req), username = %user.username, "user registered");

    Ok(View::redirect(urls::INDEX).with_cookie(session_cookie(token, auth.keys().ttl_hours())))
}

pub async fn login_form(
    viewer: Viewer,
    query: Option<web::Query<NextQuery>>,
) -> Result<View, DomainError> {
    View::render(&LoginTemplate {
        viewer: viewer.username(),
        username: "",
        next: urls::safe_next(query.as_ref().and_then(|query| query.next.as_deref())),
        errors: &[],
    })
}

pub async fn login(
    req: HttpRequest,
    viewer: Viewer,
    auth: web::Data<AuthService>,
    form: Option<web::Form<LoginForm>>,
) -> Result<View, DomainError> {
    let form = submitted(form);
    let next = urls::safe_next(form.next.as_deref());

    let user = match auth.login(&form.username, &form.password).await {
        Ok(user) => user,
        Err(DomainError::Unauthorized) => {
            return View::render(&LoginTemplate {
                viewer: viewer.username(),
                username: &form.username,
                next,
                errors: &[BAD_CREDENTIALS.to_string()],
            });
        }
        Err(err) => return Err(err),
    };

    let token = auth.issue_session(&user)?;
    info!(request_id = %request_id(&req), username = %user.username, "user logged in");

    Ok(View::redirect(next).with_cookie(session_cookie(token, auth.keys().ttl_hours())))
}

pub async fn logout(req: HttpRequest, viewer: Viewer) -> Result<View, DomainError> {
    if let Some(user) = viewer.user() {
        info!(request_id = %request_id(&req), username = %user.username, "user logged out");
    }
    Ok(View::render(&LoggedOutTemplate { viewer: None })?.with_cookie(session_removal_cookie()))
}
