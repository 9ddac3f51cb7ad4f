use std::fmt::Display;

use chrono::{DateTime, Utc};
use ofg_common::Amount;
use serde::Serialize;
use sqlx::FromRow;

//--------------------------------------    FundableKind     ---------------------------------------------------------
/// The two populations of fundable records known to the gateway. Records of one kind settle
/// exclusively against open records of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundableKind {
    Target,
    Contribution,
}

impl FundableKind {
    /// The kind a settlement pass draws its open pool from.
    pub fn counterpart(&self) -> Self {
        match self {
            FundableKind::Target => FundableKind::Contribution,
            FundableKind::Contribution => FundableKind::Target,
        }
    }
}

impl Display for FundableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FundableKind::Target => write!(f, "Target"),
            FundableKind::Contribution => write!(f, "Contribution"),
        }
    }
}

//--------------------------------------      Fundable       ---------------------------------------------------------
/// The shape shared by both record kinds, and the only contract the allocation engine knows about.
///
/// Implementors guarantee that `invested_amount` never exceeds `full_amount`, that
/// `fully_invested` is true exactly when the two are equal, and that `closed_at` is set exactly
/// when `fully_invested` is true. The raw mutators [`Fundable::add_investment`] and
/// [`Fundable::mark_closed`] exist for the engine's use; everything else should go through
/// [`crate::allocation::close`], which enforces the closure precondition.
pub trait Fundable {
    fn kind(&self) -> FundableKind;

    /// The creation-order key. Assigned monotonically by storage at insert time.
    fn record_id(&self) -> i64;

    fn full_amount(&self) -> Amount;

    fn invested_amount(&self) -> Amount;

    fn fully_invested(&self) -> bool;

    fn closed_at(&self) -> Option<DateTime<Utc>>;

    /// Adds `delta` to the invested amount, leaving the record open.
    fn add_investment(&mut self, delta: Amount);

    /// Sets the record to the closed state: fully invested, with `closed_at` stamped.
    fn mark_closed(&mut self, at: DateTime<Utc>);

    /// The capacity this record can still absorb.
    fn remaining(&self) -> Amount {
        self.full_amount() - self.invested_amount()
    }
}

//--------------------------------------    FundingTarget    ---------------------------------------------------------
/// A named goal that accumulates contributions until it is exactly covered.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FundingTarget {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub full_amount: Amount,
    pub invested_amount: Amount,
    pub fully_invested: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Fundable for FundingTarget {
    fn kind(&self) -> FundableKind {
        FundableKind::Target
    }

    fn record_id(&self) -> i64 {
        self.id
    }

    fn full_amount(&self) -> Amount {
        self.full_amount
    }

    fn invested_amount(&self) -> Amount {
        self.invested_amount
    }

    fn fully_invested(&self) -> bool {
        self.fully_invested
    }

    fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    fn add_investment(&mut self, delta: Amount) {
        self.invested_amount += delta;
    }

    fn mark_closed(&mut self, at: DateTime<Utc>) {
        self.invested_amount = self.full_amount;
        self.fully_invested = true;
        self.closed_at = Some(at);
    }
}

//--------------------------------------  NewFundingTarget   ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewFundingTarget {
    /// Human-readable name for the target. Unique across all targets.
    pub name: String,
    /// What the money is for.
    pub description: String,
    /// The total amount the target is asking for.
    pub full_amount: Amount,
}

impl NewFundingTarget {
    pub fn new<S1: Into<String>, S2: Into<String>>(name: S1, description: S2, full_amount: Amount) -> Self {
        Self { name: name.into(), description: description.into(), full_amount }
    }
}

//--------------------------------------    Contribution     ---------------------------------------------------------
/// A sum of money given by a contributor, to be spread over open funding targets.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contribution {
    pub id: i64,
    /// Opaque identifier for the contributor, as established by the identity layer upstream.
    pub contributor_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub full_amount: Amount,
    pub invested_amount: Amount,
    pub fully_invested: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Fundable for Contribution {
    fn kind(&self) -> FundableKind {
        FundableKind::Contribution
    }

    fn record_id(&self) -> i64 {
        self.id
    }

    fn full_amount(&self) -> Amount {
        self.full_amount
    }

    fn invested_amount(&self) -> Amount {
        self.invested_amount
    }

    fn fully_invested(&self) -> bool {
        self.fully_invested
    }

    fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    fn add_investment(&mut self, delta: Amount) {
        self.invested_amount += delta;
    }

    fn mark_closed(&mut self, at: DateTime<Utc>) {
        self.invested_amount = self.full_amount;
        self.fully_invested = true;
        self.closed_at = Some(at);
    }
}

//--------------------------------------   NewContribution   ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewContribution {
    /// The contributor making the contribution.
    pub contributor_id: String,
    /// An optional free-text message from the contributor.
    pub comment: Option<String>,
    /// The amount contributed.
    pub full_amount: Amount,
}

impl NewContribution {
    pub fn new<S: Into<String>>(contributor_id: S, full_amount: Amount) -> Self {
        Self { contributor_id: contributor_id.into(), comment: None, full_amount }
    }

    pub fn with_comment<S: Into<String>>(mut self, comment: S) -> Self {
        self.comment = Some(comment.into());
        self
    }
}
