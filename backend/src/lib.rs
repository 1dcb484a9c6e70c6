//! Gym Freak backend library
//!
//! Exposes the backend modules for the server binary, the catalog seeder
//! and the integration tests.

pub mod ai;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
