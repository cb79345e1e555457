pub mod auth_handlers;
pub mod link_handlers;
