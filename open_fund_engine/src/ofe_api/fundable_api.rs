//! Unified read API over funding targets and contributions.

use std::fmt::Debug;

use crate::{
    db_types::{Contribution, FundingTarget},
    traits::{FundableApiError, FundableManagement},
};

/// The `FundableApi` provides the gateway's read path: listings and lookups that never mutate
/// anything.
pub struct FundableApi<B> {
    db: B,
}

impl<B: Debug> Debug for FundableApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FundableApi ({:?})", self.db)
    }
}

impl<B> FundableApi<B>
where B: FundableManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Fetches the funding target for the given id. If no target exists, `None` is returned.
    pub async fn target_by_id(&self, id: i64) -> Result<Option<FundingTarget>, FundableApiError> {
        self.db.fetch_target_by_id(id).await
    }

    /// Returns the id of the target with the given name, if one exists.
    pub async fn target_id_by_name(&self, name: &str) -> Result<Option<i64>, FundableApiError> {
        self.db.fetch_target_id_by_name(name).await
    }

    /// All funding targets, in creation order.
    pub async fn targets(&self) -> Result<Vec<FundingTarget>, FundableApiError> {
        self.db.fetch_all_targets().await
    }

    /// The open funding-target pool, oldest first.
    pub async fn open_targets(&self) -> Result<Vec<FundingTarget>, FundableApiError> {
        self.db.fetch_open_targets().await
    }

    /// All contributions, in creation order.
    pub async fn contributions(&self) -> Result<Vec<Contribution>, FundableApiError> {
        self.db.fetch_all_contributions().await
    }

    /// The contributions made by one contributor, in creation order.
    pub async fn contributions_for_user(&self, contributor_id: &str) -> Result<Vec<Contribution>, FundableApiError> {
        self.db.fetch_contributions_for_user(contributor_id).await
    }

    /// The open contribution pool, oldest first.
    pub async fn open_contributions(&self) -> Result<Vec<Contribution>, FundableApiError> {
        self.db.fetch_open_contributions().await
    }
}
