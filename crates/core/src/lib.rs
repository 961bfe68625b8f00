//! Sole Trader Core - Shared types library.
//!
//! This crate provides common types used across all Sole Trader components:
//! - `client` - Headless shop SDK (API client, session, state stores)
//! - `cli` - Command-line storefront client
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, shoe
//!   sizes, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
