//! Error handling foundation for the medtrain platform.
//!
//! This module provides only the `Result` type alias using rootcause.
//! Each crate defines its own domain-specific error types in its own
//! error module; the application layer wraps them in a [`Report`] so the
//! HTTP surface can inspect the current context when choosing a status.

use rootcause::Report;

/// A Result type alias using rootcause's Report for error handling.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
