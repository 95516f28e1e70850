//! HTTP request handlers.
//!
//! # Modules
//!
//! - `health`: Service health check
//! - `users`: Signup, login/refresh/logout, profiles
//! - `posts`: Post CRUD, listing, search
//! - `comments`: Comments under posts
//! - `likes`: Like/unlike and liked-post listings

pub mod comments;
pub mod health;
pub mod likes;
pub mod posts;
pub mod users;
