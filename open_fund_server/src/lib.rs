//! # OpenFund server
//! This crate hosts the REST surface of the OpenFund gateway. It is responsible for:
//! * accepting creation requests for funding targets and contributions, validating their shape,
//!   and handing them to the allocation engine,
//! * exposing the listing endpoints for targets and contributions,
//! * the admin mutations on funding targets (edit, delete) with their validator checks.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more
//! information.
//!
//! ## Authorization
//! Identity is established upstream of this server. Admin routes require the configured API key
//! in the `ofg-api-key` header; contributor routes require the caller's id in the `ofg-user-id`
//! header.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
