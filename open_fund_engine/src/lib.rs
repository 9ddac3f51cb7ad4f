//! OpenFund Engine
//!
//! The OpenFund engine settles value between the two populations of fundable records that the
//! gateway tracks: funding targets and contributions. This library contains the core allocation
//! logic and the storage backends. It is transport-agnostic; the HTTP surface lives in the
//! `open_fund_server` crate.
//!
//! The library is divided into three main sections:
//! 1. The allocation engine ([`mod@allocation`]). A pure, storage-free implementation of the
//!    settlement pass: an inbound record is matched against the oldest-first pool of open
//!    counterpart records until one side is exhausted. This is the only part of the system with
//!    real invariants and it is fully testable without a database.
//! 2. Database contracts ([`mod@traits`]) and their SQLite implementation. Backends drive the
//!    allocation engine inside a single transaction per settlement pass, so a pass either commits
//!    completely or not at all.
//! 3. The public API wrappers ([`AllocationApi`] and [`FundableApi`]), which are what servers and
//!    tools should program against rather than touching a backend directly.
pub mod allocation;
pub mod db_types;
mod ofe_api;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use ofe_api::{allocation_api::AllocationApi, fundable_api::FundableApi, fundable_objects};
pub use traits::{FundGatewayDatabase, FundGatewayError, FundableApiError, FundableManagement};
