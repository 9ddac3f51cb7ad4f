//! `SqliteDatabase` is a concrete implementation of an OpenFund engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements the traits defined in the
//! [`crate::traits`] module. Settlement passes lean on SQLite's single-writer transaction model
//! for their isolation requirement: the pool snapshot, the settlement arithmetic and the
//! write-back all happen on one transaction handle, so two passes over the same kind pair cannot
//! interleave between read and commit.
use std::fmt::Debug;

use chrono::Utc;
use log::*;
use sqlx::SqlitePool;

use super::db::{contributions, db_url, new_pool, targets};
use crate::{
    allocation,
    allocation::OpenPool,
    db_types::{Contribution, FundingTarget, NewContribution, NewFundingTarget},
    fundable_objects::TargetUpdate,
    traits::{FundGatewayDatabase, FundGatewayError, FundableApiError, FundableManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL from the environment.
    pub async fn new(max_connections: u32) -> Result<Self, FundGatewayError> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, FundGatewayError> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl FundGatewayDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Takes a new funding target, and in a single atomic transaction,
    /// * stores the target (rejecting a duplicate name),
    /// * snapshots the open contribution pool, oldest first,
    /// * runs the settlement loop against the snapshot,
    /// * writes back the inbound target and every touched contribution exactly as the engine
    ///   computed them.
    async fn process_new_target(&self, target: NewFundingTarget) -> Result<FundingTarget, FundGatewayError> {
        let mut tx = self.pool.begin().await?;
        let mut target = targets::insert_target(target, &mut tx).await?;
        debug!("🗃️ Funding target '{}' has been saved in the DB with id {}", target.name, target.id);
        let pool = contributions::fetch_open_pool(&mut tx).await?;
        let settlement = allocation::settle(&mut target, OpenPool::new(pool))?;
        for peer in &settlement.touched_peers {
            contributions::save_allocation(peer, &mut tx).await?;
        }
        targets::save_allocation(&target, &mut tx).await?;
        tx.commit().await?;
        debug!(
            "🗃️ Target {} settled. {} allocated across {} contributions.",
            target.id,
            settlement.allocated,
            settlement.peers_touched()
        );
        Ok(target)
    }

    /// Takes a new contribution, and in a single atomic transaction,
    /// * stores the contribution,
    /// * snapshots the open funding-target pool, oldest first,
    /// * runs the settlement loop against the snapshot,
    /// * writes back the inbound contribution and every touched target exactly as the engine
    ///   computed them.
    async fn process_new_contribution(
        &self,
        contribution: NewContribution,
    ) -> Result<Contribution, FundGatewayError> {
        let mut tx = self.pool.begin().await?;
        let mut contribution = contributions::insert_contribution(contribution, &mut tx).await?;
        debug!(
            "🗃️ Contribution {} of {} received from [{}]",
            contribution.id, contribution.full_amount, contribution.contributor_id
        );
        let pool = targets::fetch_open_pool(&mut tx).await?;
        let settlement = allocation::settle(&mut contribution, OpenPool::new(pool))?;
        for peer in &settlement.touched_peers {
            targets::save_allocation(peer, &mut tx).await?;
        }
        contributions::save_allocation(&contribution, &mut tx).await?;
        tx.commit().await?;
        debug!(
            "🗃️ Contribution {} settled. {} allocated across {} targets.",
            contribution.id,
            settlement.allocated,
            settlement.peers_touched()
        );
        Ok(contribution)
    }

    async fn update_target(&self, id: i64, update: TargetUpdate) -> Result<FundingTarget, FundGatewayError> {
        let mut tx = self.pool.begin().await?;
        let target =
            targets::fetch_target_by_id(id, &mut tx).await?.ok_or(FundGatewayError::TargetNotFound(id))?;
        if target.fully_invested {
            debug!("🗃️ Refusing to update target {id}: it is closed.");
            return Err(FundGatewayError::TargetClosed(id));
        }
        if let Some(new_name) = update.name.as_deref() {
            match targets::target_id_by_name(new_name, &mut tx).await? {
                Some(other) if other != id => return Err(FundGatewayError::DuplicateTargetName(new_name.into())),
                _ => {},
            }
        }
        if let Some(new_full) = update.full_amount {
            if new_full < target.invested_amount {
                return Err(FundGatewayError::AmountBelowInvested {
                    id,
                    new_amount: new_full,
                    invested: target.invested_amount,
                });
            }
        }
        let mut updated =
            targets::update_target(id, update, &mut tx).await?.ok_or(FundGatewayError::TargetNotFound(id))?;
        // An edit that shrinks the ask down to what is already invested completes the target.
        if !updated.fully_invested && updated.invested_amount == updated.full_amount {
            allocation::close(&mut updated, Utc::now())?;
            targets::save_allocation(&updated, &mut tx).await?;
            debug!("🗃️ Target {id} reached its full amount through an edit and has been closed.");
        }
        tx.commit().await?;
        trace!("🗃️ Target {id} has been updated.");
        Ok(updated)
    }

    async fn delete_target(&self, id: i64) -> Result<FundingTarget, FundGatewayError> {
        let mut tx = self.pool.begin().await?;
        let target =
            targets::fetch_target_by_id(id, &mut tx).await?.ok_or(FundGatewayError::TargetNotFound(id))?;
        if target.fully_invested {
            return Err(FundGatewayError::TargetClosed(id));
        }
        if !target.invested_amount.is_zero() {
            return Err(FundGatewayError::TargetFunded(id));
        }
        let deleted =
            targets::delete_target(id, &mut tx).await?.ok_or(FundGatewayError::TargetNotFound(id))?;
        tx.commit().await?;
        debug!("🗃️ Target '{}' (id {id}) has been deleted.", deleted.name);
        Ok(deleted)
    }

    async fn close(&mut self) -> Result<(), FundGatewayError> {
        self.pool.close().await;
        Ok(())
    }
}

impl FundableManagement for SqliteDatabase {
    async fn fetch_target_by_id(&self, id: i64) -> Result<Option<FundingTarget>, FundableApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(targets::fetch_target_by_id(id, &mut conn).await?)
    }

    async fn fetch_target_id_by_name(&self, name: &str) -> Result<Option<i64>, FundableApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(targets::target_id_by_name(name, &mut conn).await?)
    }

    async fn fetch_all_targets(&self) -> Result<Vec<FundingTarget>, FundableApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(targets::fetch_all_targets(&mut conn).await?)
    }

    async fn fetch_open_targets(&self) -> Result<Vec<FundingTarget>, FundableApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(targets::fetch_open_pool(&mut conn).await?)
    }

    async fn fetch_all_contributions(&self) -> Result<Vec<Contribution>, FundableApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(contributions::fetch_all_contributions(&mut conn).await?)
    }

    async fn fetch_contributions_for_user(
        &self,
        contributor_id: &str,
    ) -> Result<Vec<Contribution>, FundableApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(contributions::fetch_contributions_for_user(contributor_id, &mut conn).await?)
    }

    async fn fetch_open_contributions(&self) -> Result<Vec<Contribution>, FundableApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(contributions::fetch_open_pool(&mut conn).await?)
    }
}
