use actix_web::HttpResponse;
use actix_web::http::StatusCode;

use crate::presentation::utils::Viewer;
use crate::presentation::view::{View, error_page};

/// Fallback for every path the routing table does not know.
pub async fn not_found() -> View {
    View::not_found()
}

/// Fallback for a known path requested with a method it does not serve.
pub async fn method_not_allowed(viewer: Viewer) -> HttpResponse {
    error_page(StatusCode::METHOD_NOT_ALLOWED, viewer.username())
}
