//! Typed HTTP client for the Granite World API.
//!
//! Shared by the storefront and admin panel, neither of which talks to the
//! database directly.
//!
//! # Example
//!
//! ```rust,ignore
//! use granite_world_client::ApiClient;
//!
//! let client = ApiClient::new("http://localhost:5000")?;
//! let featured = client.featured_products().await?;
//!
//! let login = client.login("admin", &password).await?;
//! client.admin(&login.token).delete_product(id).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod client;
mod error;

pub use client::{AdminApi, ApiClient, DEFAULT_TIMEOUT, LoginResponse, SessionInfo};
pub use error::ClientError;
