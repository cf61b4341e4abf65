//! Granite World Core - Shared domain types.
//!
//! This crate provides the types used across all Granite World components:
//! - `api` - JSON API over the record store (port 5000)
//! - `client` - Typed HTTP client for the API
//! - `storefront` - Public catalogue, gallery and contact site
//! - `admin` - Administration panel
//! - `cli` - Command-line tools for migrations and setup
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, and statuses
//! - [`models`] - Products, customer queries, gallery posts and their payloads
//! - [`validation`] - Field rules and [`ValidationError`]

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::ValidationError;
