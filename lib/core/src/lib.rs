//! Core domain types and utilities for the medtrain platform.
//!
//! This crate provides the foundational types, error handling, and shared
//! identifiers used by the dialog-training services.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{DialogId, ParseIdError, ScenarioId};
