//! medtrain HTTP server.
//!
//! Exposes the dialog-training API: scenario listing, starting a training
//! dialog, exchanging messages with the simulated patient and reading back
//! history. Every training route sits behind a per-client rate limiter.

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod rate_limit;
pub mod routes;
pub mod seed;
