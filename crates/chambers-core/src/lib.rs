//! Shared service plumbing for Chambers services.
//!
//! Health handlers, tracing initialization, and request-id middleware.

pub mod health;
pub mod middleware;
pub mod tracing;
