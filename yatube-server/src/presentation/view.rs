//! What a handler decided: render a template, redirect, or show the 404 page.

use actix_web::body::BoxBody;
use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::http::header::{ContentType, LOCATION};
use actix_web::{HttpRequest, HttpResponse, Responder};
use askama::Template;

use crate::domain::error::DomainError;
use crate::presentation::templates::{
    ForbiddenTemplate, MethodNotAllowedTemplate, NotFoundTemplate, ServerErrorTemplate,
};
use crate::presentation::utils::Viewer;

/// A template that knows the path it was compiled from.
pub trait NamedTemplate: Template {
    const NAME: &'static str;
}

/// Stored in response extensions so callers can tell which template a
/// response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateUsed(pub &'static str);

#[derive(Debug)]
pub enum Outcome {
    Render {
        template: &'static str,
        status: StatusCode,
        html: String,
    },
    Redirect(String),
    NotFound,
}

#[derive(Debug)]
pub struct View {
    outcome: Outcome,
    cookies: Vec<Cookie<'static>>,
}

impl View {
    pub fn render<T: NamedTemplate>(template: &T) -> Result<Self, DomainError> {
        Self::render_with_status(template, StatusCode::OK)
    }

    pub fn render_with_status<T: NamedTemplate>(
        template: &T,
        status: StatusCode,
    ) -> Result<Self, DomainError> {
        let html = template
            .render()
            .map_err(|err| DomainError::Internal(format!("template {}: {}", T::NAME, err)))?;
        Ok(Self::from(Outcome::Render {
            template: T::NAME,
            status,
            html,
        }))
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Self::from(Outcome::Redirect(location.into()))
    }

    pub fn not_found() -> Self {
        Self::from(Outcome::NotFound)
    }

    pub fn with_cookie(mut self, cookie: Cookie<'static>) -> Self {
        self.cookies.push(cookie);
        self
    }
}

impl From<Outcome> for View {
    fn from(outcome: Outcome) -> Self {
        Self {
            outcome,
            cookies: Vec::new(),
        }
    }
}

impl Responder for View {
    type Body = BoxBody;

    fn respond_to(self, req: &HttpRequest) -> HttpResponse<Self::Body> {
        let mut res = match self.outcome {
            Outcome::Render {
                template,
                status,
                html,
            } => html_response(status, template, html),
            Outcome::Redirect(location) => HttpResponse::Found()
                .insert_header((LOCATION, location))
                .finish(),
            Outcome::NotFound => error_page(StatusCode::NOT_FOUND, Viewer::of(req).username()),
        };

        for cookie in &self.cookies {
            if let Err(err) = res.add_cookie(cookie) {
                tracing::warn!(%err, "failed to attach cookie");
            }
        }
        res
    }
}

fn html_response(status: StatusCode, template: &'static str, html: String) -> HttpResponse {
    let mut res = HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(html);
    res.extensions_mut().insert(TemplateUsed(template));
    res
}

/// Renders the custom page for an error status.
pub fn error_page(status: StatusCode, viewer: Option<&str>) -> HttpResponse {
    let rendered = match status {
        StatusCode::NOT_FOUND => NotFoundTemplate { viewer }
            .render()
            .map(|html| (NotFoundTemplate::NAME, html)),
        StatusCode::FORBIDDEN => ForbiddenTemplate { viewer }
            .render()
            .map(|html| (ForbiddenTemplate::NAME, html)),
        StatusCode::METHOD_NOT_ALLOWED => MethodNotAllowedTemplate { viewer }
            .render()
            .map(|html| (MethodNotAllowedTemplate::NAME, html)),
        _ => ServerErrorTemplate {
            viewer,
            status: status.as_u16(),
        }
        .render()
        .map(|html| (ServerErrorTemplate::NAME, html)),
    };

    match rendered {
        Ok((template, html)) => html_response(status, template, html),
        Err(err) => {
            tracing::error!(%err, "failed to render error page");
            HttpResponse::build(status).body(status.to_string())
        }
    }
}
