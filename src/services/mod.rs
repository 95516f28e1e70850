//! Business logic services.
//!
//! Handlers stay thin; anything that spans multiple queries, needs a
//! database transaction, or touches cryptography lives here.

pub mod auth_service;
pub mod comment_service;
pub mod like_service;
pub mod post_service;
