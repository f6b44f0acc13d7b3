//! Recipe API Backend Library
//!
//! This library exposes the backend modules for use in the binaries and
//! integration tests.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
