//! Shared components

pub mod route_gate;
pub mod spinner;

pub use route_gate::RouteGate;
pub use spinner::LoadingSpinner;
