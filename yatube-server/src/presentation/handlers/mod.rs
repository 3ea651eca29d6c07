pub mod auth;
pub mod core;
pub mod follow;
pub mod posts;
