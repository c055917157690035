//! ShlokSagar admin console, browser build

pub mod app;
pub mod auth;
pub mod browser;
pub mod components;
pub mod config;
pub mod hooks;
pub mod pages;
pub mod routes;
pub mod services;

pub use app::App;
pub use routes::Route;
