//! Hosting runtime for the Kindle startup handler.
//!
//! Serves the handler over HTTP with axum, or runs it once against a
//! proxy event read from stdin.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod event;
pub mod routes;
