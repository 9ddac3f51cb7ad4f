use ofg_common::Amount;
use thiserror::Error;

use crate::{
    allocation::AllocationError,
    db_types::{Contribution, FundingTarget, NewContribution, NewFundingTarget},
    fundable_objects::TargetUpdate,
    traits::{FundableApiError, FundableManagement},
};

/// This trait defines the highest level of behaviour for backends supporting the OpenFund engine:
/// the write path of the gateway.
///
/// The two `process_new_*` methods are the entry points of the allocation engine. Each one runs a
/// complete settlement pass as a single serializable transaction: insert the inbound record,
/// snapshot the opposite-kind open pool oldest-first, run the settlement loop, and write back the
/// exact state the engine computed for the inbound record and every touched peer. A failure
/// anywhere rolls the whole pass back; partial settlement is never persisted.
///
/// Two settlement passes over the same kind pair must not interleave their pool read and their
/// commit. Backends provide this through their transaction model rather than in-engine locking.
#[allow(async_fn_in_trait)]
pub trait FundGatewayDatabase: Clone + FundableManagement {
    /// The URL of the database.
    fn url(&self) -> &str;

    /// Stores a new funding target and settles it against the open contribution pool, atomically.
    ///
    /// Returns the target as persisted, which may already be partially or fully invested if open
    /// contributions were waiting. Fails with [`FundGatewayError::DuplicateTargetName`] if the
    /// name is taken.
    async fn process_new_target(&self, target: NewFundingTarget) -> Result<FundingTarget, FundGatewayError>;

    /// Stores a new contribution and settles it against the open funding-target pool, atomically.
    ///
    /// Returns the contribution as persisted. If the open pool could not absorb the full amount,
    /// the contribution remains open and will be drained by future targets.
    async fn process_new_contribution(&self, contribution: NewContribution)
        -> Result<Contribution, FundGatewayError>;

    /// Applies an admin edit to a funding target's name, description and/or full amount.
    ///
    /// Preconditions, re-checked inside the transaction:
    /// * the target exists and is not closed,
    /// * a new name does not collide with another target,
    /// * a new full amount is not below what has already been invested.
    ///
    /// Lowering the full amount to exactly the invested amount closes the target. Raising it
    /// re-opens nothing and triggers no re-allocation; the extra capacity waits for future
    /// contributions.
    async fn update_target(&self, id: i64, update: TargetUpdate) -> Result<FundingTarget, FundGatewayError>;

    /// Deletes a funding target. Only permitted while the target is open and nothing has been
    /// invested in it; the returned record is the row as it was deleted.
    async fn delete_target(&self, id: i64) -> Result<FundingTarget, FundGatewayError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), FundGatewayError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum FundGatewayError {
    #[error("We have an internal database engine error (configuration/uptime etc.): {0}")]
    DatabaseError(String),
    #[error("A funding target named '{0}' already exists")]
    DuplicateTargetName(String),
    #[error("The requested funding target id {0} does not exist")]
    TargetNotFound(i64),
    #[error("Funding target {0} is fully invested and can no longer be modified")]
    TargetClosed(i64),
    #[error("Funding target {0} has received contributions and cannot be deleted")]
    TargetFunded(i64),
    #[error("The new full amount {new_amount} is below the {invested} already invested in target {id}")]
    AmountBelowInvested { id: i64, new_amount: Amount, invested: Amount },
    #[error("The requested target change would result in a no-op.")]
    TargetModificationNoOp,
    #[error("{0}")]
    Allocation(#[from] AllocationError),
    #[error("{0}")]
    FundableError(#[from] FundableApiError),
}

impl From<sqlx::Error> for FundGatewayError {
    fn from(e: sqlx::Error) -> Self {
        FundGatewayError::DatabaseError(e.to_string())
    }
}
