//! HTTP middleware.
//!
//! # Modules
//!
//! - `auth`: Bearer-token authentication middleware
//!
//! Middleware functions intercept requests before they reach handlers.

pub mod auth;
