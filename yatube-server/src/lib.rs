//! Yatube: a small blogging site. Authors publish posts, file them under
//! groups, comment, and follow each other.

pub mod application;
pub mod data;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod server;
