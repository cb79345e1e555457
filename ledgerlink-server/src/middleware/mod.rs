pub mod auth;

pub use auth::{Subject, auth_middleware};
