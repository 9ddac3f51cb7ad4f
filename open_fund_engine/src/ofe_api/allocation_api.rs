use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Contribution, FundingTarget, NewContribution, NewFundingTarget},
    fundable_objects::TargetUpdate,
    traits::{FundGatewayDatabase, FundGatewayError},
};

/// `AllocationApi` is the primary API for the gateway's write path: creating fundable records and
/// letting the allocation engine settle them, plus the admin mutations on funding targets.
pub struct AllocationApi<B> {
    db: B,
}

impl<B> Debug for AllocationApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AllocationApi")
    }
}

impl<B> AllocationApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> AllocationApi<B>
where B: FundGatewayDatabase
{
    /// Submit a brand-new funding target.
    ///
    /// The target is stored and immediately settled against any open contributions, oldest first,
    /// in one atomic pass. The returned record reflects the settlement: it may come back already
    /// partially or even fully invested.
    pub async fn process_new_target(&self, target: NewFundingTarget) -> Result<FundingTarget, FundGatewayError> {
        let target = self.db.process_new_target(target).await?;
        debug!(
            "🔄️🎯️ Target '{}' (id {}) processing complete. {} of {} invested{}",
            target.name,
            target.id,
            target.invested_amount,
            target.full_amount,
            if target.fully_invested { ", target is closed" } else { "" }
        );
        Ok(target)
    }

    /// Submit a brand-new contribution for a contributor.
    ///
    /// The contribution is stored and immediately spread over the open funding targets, oldest
    /// first, in one atomic pass. Whatever the pool cannot absorb stays with the contribution,
    /// which remains open until future targets drain it.
    pub async fn process_new_contribution(
        &self,
        contribution: NewContribution,
    ) -> Result<Contribution, FundGatewayError> {
        let contribution = self.db.process_new_contribution(contribution).await?;
        debug!(
            "🔄️💸️ Contribution {} from [{}] processing complete. {} of {} allocated{}",
            contribution.id,
            contribution.contributor_id,
            contribution.invested_amount,
            contribution.full_amount,
            if contribution.fully_invested { ", contribution is closed" } else { "" }
        );
        Ok(contribution)
    }

    /// Apply an admin edit to an open funding target. See
    /// [`FundGatewayDatabase::update_target`] for the precondition rules.
    pub async fn update_target(&self, id: i64, update: TargetUpdate) -> Result<FundingTarget, FundGatewayError> {
        if update.is_empty() {
            debug!("🔄️🎯️ No fields to update for target {id}. Update request skipped.");
            return Err(FundGatewayError::TargetModificationNoOp);
        }
        let target = self.db.update_target(id, update).await?;
        debug!("🔄️🎯️ Target {id} has been updated.");
        Ok(target)
    }

    /// Delete an open, un-invested funding target.
    pub async fn delete_target(&self, id: i64) -> Result<FundingTarget, FundGatewayError> {
        let target = self.db.delete_target(id).await?;
        debug!("🔄️🎯️ Target '{}' (id {id}) has been deleted.", target.name);
        Ok(target)
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }
}
