//! Library crate for golf-brain-back, exposing modules for binaries and integration tests.

/// Runtime configuration.
pub mod config;
/// Storage boundary and repositories.
pub mod dao;
mod domain;
mod dto;
mod error;
/// HTTP routes.
pub mod routes;
/// Use cases behind the routes.
pub mod services;
/// Shared application state and sessions.
pub mod state;
