//! Custom hooks for the console

pub mod use_session_guard;

pub use use_session_guard::use_session_guard;
