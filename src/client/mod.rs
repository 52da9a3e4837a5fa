//! Presentation rules shared with the web front end.

pub mod post_view;
pub mod route_config;
