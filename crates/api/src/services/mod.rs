//! Business services used by route handlers.

pub mod auth;
