use thiserror::Error;

use crate::db_types::{Contribution, FundingTarget};

#[derive(Debug, Clone, Error)]
pub enum FundableApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for FundableApiError {
    fn from(e: sqlx::Error) -> Self {
        FundableApiError::DatabaseError(e.to_string())
    }
}

/// The `FundableManagement` trait defines the read-only queries of the gateway: listings of
/// funding targets and contributions in their various states.
///
/// The [`FundGatewayDatabase`](crate::traits::FundGatewayDatabase) trait handles the actual
/// machinery of settling new records against the open pools; `FundableManagement` only observes.
///
/// The `fetch_open_*` methods are the public form of the open-pool-reader contract: records with
/// `fully_invested == false`, ordered by ascending id (oldest created first). Settlement passes
/// take the same snapshot internally, inside their own transaction.
#[allow(async_fn_in_trait)]
pub trait FundableManagement {
    /// Fetches the funding target with the given id. If no target exists, `None` is returned.
    async fn fetch_target_by_id(&self, id: i64) -> Result<Option<FundingTarget>, FundableApiError>;

    /// Returns the id of the funding target carrying the given name, if any. Names are unique, so
    /// this is how the duplicate-name rule is checked.
    async fn fetch_target_id_by_name(&self, name: &str) -> Result<Option<i64>, FundableApiError>;

    /// All funding targets, in creation order.
    async fn fetch_all_targets(&self) -> Result<Vec<FundingTarget>, FundableApiError>;

    /// The open funding-target pool: not yet fully invested, oldest first.
    async fn fetch_open_targets(&self) -> Result<Vec<FundingTarget>, FundableApiError>;

    /// All contributions, in creation order.
    async fn fetch_all_contributions(&self) -> Result<Vec<Contribution>, FundableApiError>;

    /// The contributions made by one contributor, in creation order.
    async fn fetch_contributions_for_user(&self, contributor_id: &str)
        -> Result<Vec<Contribution>, FundableApiError>;

    /// The open contribution pool: not yet fully invested, oldest first.
    async fn fetch_open_contributions(&self) -> Result<Vec<Contribution>, FundableApiError>;
}
