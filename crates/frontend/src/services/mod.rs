//! API access for the console views

pub mod admin;
pub mod auth;

pub use admin::AdminApi;
pub use auth::AuthApiService;
