use std::fmt::Display;

use chrono::{DateTime, Utc};
use ofg_common::Amount;
use open_fund_engine::db_types::{Contribution, NewContribution, NewFundingTarget};
use serde::{Deserialize, Serialize};

/// The request body for creating a new funding target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTargetRequest {
    pub name: String,
    pub description: String,
    pub full_amount: Amount,
}

impl From<NewTargetRequest> for NewFundingTarget {
    fn from(request: NewTargetRequest) -> Self {
        NewFundingTarget::new(request.name, request.description, request.full_amount)
    }
}

/// The request body for creating a new contribution. The contributor's identity does not live in
/// the body; it is taken from the `ofg-user-id` header established by the identity layer upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContributionRequest {
    pub full_amount: Amount,
    #[serde(default)]
    pub comment: Option<String>,
}

impl NewContributionRequest {
    pub fn into_new_contribution(self, contributor_id: String) -> NewContribution {
        NewContribution { contributor_id, comment: self.comment, full_amount: self.full_amount }
    }
}

/// A contributor-facing view of a contribution. The allocation bookkeeping (invested amount,
/// closure state) is internal to the gateway and is not included here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionView {
    pub id: i64,
    pub full_amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Contribution> for ContributionView {
    fn from(contribution: Contribution) -> Self {
        Self {
            id: contribution.id,
            full_amount: contribution.full_amount,
            comment: contribution.comment,
            created_at: contribution.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}
