//! Oxiline - inline content resolution for chat message rendering.
//!
//! This crate turns raw chat message text into an ordered, styled run of
//! text spans and inline images: tokenizing, classifying, resolving each
//! token concurrently (with a shared response cache), and reassembling the
//! results in their original order off the UI thread.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the pipeline, resolvers and services.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing views over resolved content.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "oxiline";
