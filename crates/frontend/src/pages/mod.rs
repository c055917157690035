//! Routed views

pub mod dashboard;
pub mod login;
pub mod not_found;

pub use dashboard::DashboardPage;
pub use login::LoginPage;
pub use not_found::NotFoundPage;
