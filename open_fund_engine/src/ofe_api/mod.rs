//! The engine's public-facing API.
//!
//! Servers and tools should use [`allocation_api::AllocationApi`] for the write path and
//! [`fundable_api::FundableApi`] for the read path, rather than calling a backend directly.
pub mod allocation_api;
pub mod fundable_api;
pub mod fundable_objects;
