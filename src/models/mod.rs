//! Data models and API request/response types.
//!
//! Each submodule pairs a database entity with the request and response
//! types of its endpoints:
//!
//! - `user`: accounts, profiles, login/token types, refresh sessions
//! - `post`: community posts, list/search queries
//! - `comment`: comments under a post
//! - `like`: like status and liked-post listings

pub mod comment;
pub mod like;
pub mod post;
pub mod user;
