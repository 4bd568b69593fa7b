//! Google sign-in and cookie sessions.

pub mod extractor;
pub mod google;
pub mod handlers;
pub mod session;
