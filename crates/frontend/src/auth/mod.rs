//! Session wiring for the component tree

pub mod context;
pub mod unauthorized;

pub use context::{SessionHandle, SessionProvider, use_session};
