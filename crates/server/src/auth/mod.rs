//! # Authentication
//!
//! - `token`: issuing and decoding the application's HS256 JWTs.
//! - `middleware`: axum extractors resolving the caller from a bearer token or
//!   an anonymous `X-Session-Id`.

pub mod middleware;
pub mod token;
