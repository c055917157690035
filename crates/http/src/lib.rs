//! HTTP client for the ShlokSagar admin API
//!
//! The console only ever talks to three kinds of endpoint: the public login
//! endpoint, the token verification endpoint, and the authenticated
//! `/admin/*` resources used by the content panels. This crate provides typed
//! clients for all three and the wire types they exchange.

pub mod client;
pub mod types;

pub use client::error::ClientError;
pub use client::{AuthenticatedAdminClient, PublicAdminClient, TypedClientBuilder};
pub use types::{AdminIdentity, LoginRequest, LoginResponse};
