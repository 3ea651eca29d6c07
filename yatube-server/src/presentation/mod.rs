pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod templates;
pub mod urls;
pub mod utils;
pub mod view;
