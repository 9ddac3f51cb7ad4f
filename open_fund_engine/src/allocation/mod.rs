//! The allocation engine.
//!
//! Every unit of currency contributed must end up allocated to exactly one funding target, and
//! every funding target accumulates contributions until it is exactly covered. This module owns
//! the algorithm that makes that happen: when a new fundable record is created, [`settle`] matches
//! it against the oldest-first pool of open counterpart records, closing records on both sides as
//! their capacity is consumed.
//!
//! The engine has no storage concerns of its own. It operates on anything implementing
//! [`Fundable`] and on an [`OpenPool`] snapshot; the backend is responsible for loading the pool
//! and persisting every touched record inside a single transaction (see
//! [`crate::traits::FundGatewayDatabase`]).
mod pool;

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use log::trace;
use ofg_common::Amount;
pub use pool::OpenPool;
use thiserror::Error;

use crate::db_types::Fundable;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("Record {0} is already fully invested and may not be mutated again")]
    AlreadyClosed(i64),
}

/// The result of one settlement pass: every counterpart record the pass mutated, and the total
/// amount that moved. The inbound record itself is mutated in place by [`settle`].
///
/// At most the last entry of `touched_peers` is still open (a peer that absorbed the inbound
/// record's remainder without being exhausted); every other entry is closed.
#[derive(Debug)]
pub struct Settlement<P> {
    pub touched_peers: Vec<P>,
    pub allocated: Amount,
}

impl<P: Fundable> Settlement<P> {
    pub fn peers_touched(&self) -> usize {
        self.touched_peers.len()
    }

    pub fn peers_closed(&self) -> usize {
        self.touched_peers.iter().filter(|p| p.fully_invested()).count()
    }
}

/// Transitions an open record to the closed state: `invested_amount` is raised to `full_amount`,
/// `fully_invested` becomes true and `closed_at` is stamped.
///
/// This is the only operation that may set `fully_invested`. Closing an already-closed record is
/// a contract violation and fails rather than being silently ignored.
pub fn close<F: Fundable>(record: &mut F, at: DateTime<Utc>) -> Result<(), AllocationError> {
    if record.fully_invested() {
        return Err(AllocationError::AlreadyClosed(record.record_id()));
    }
    record.mark_closed(at);
    Ok(())
}

/// Runs one settlement pass for a freshly created record against the open pool of the opposite
/// kind.
///
/// The loop is a single-pass greedy merge, equivalent to crossing a new order against a
/// FIFO-ordered resting book: the oldest peer is always consumed first, and each step moves
/// exactly `min(required, available)` from one side to the other, so no record is ever over- or
/// under-allocated. The pass ends when the inbound record is exactly covered or the pool runs
/// dry, whichever comes first: at most `pool.len() + 1` iterations.
///
/// All records closed in one pass share a single `closed_at` stamp.
///
/// Fails with [`AllocationError::AlreadyClosed`] if `inbound` is already fully invested; a closed
/// record re-entering settlement is a programming error upstream, never a no-op.
pub fn settle<I, P>(inbound: &mut I, mut pool: OpenPool<P>) -> Result<Settlement<P>, AllocationError>
where
    I: Fundable,
    P: Fundable,
{
    if inbound.fully_invested() {
        return Err(AllocationError::AlreadyClosed(inbound.record_id()));
    }
    let closed_at = Utc::now();
    let mut touched_peers = Vec::new();
    let mut allocated = Amount::zero();
    while inbound.invested_amount() < inbound.full_amount() {
        let mut peer = match pool.draw() {
            Some(peer) => peer,
            None => break,
        };
        debug_assert!(peer.kind() == inbound.kind().counterpart(), "a pool must hold counterpart-kind records");
        let required = inbound.remaining();
        let available = peer.remaining();
        trace!(
            "🧮️ {} {} requires {required}; {} {} has {available} available",
            inbound.kind(),
            inbound.record_id(),
            peer.kind(),
            peer.record_id()
        );
        match required.cmp(&available) {
            // Peer fully consumed; inbound still open, keep drawing.
            Ordering::Greater => {
                close(&mut peer, closed_at)?;
                inbound.add_investment(available);
                allocated += available;
            },
            // Inbound fully consumed; peer stays open with reduced capacity.
            Ordering::Less => {
                close(inbound, closed_at)?;
                peer.add_investment(required);
                allocated += required;
            },
            // Both sides exhausted in the same step.
            Ordering::Equal => {
                close(&mut peer, closed_at)?;
                close(inbound, closed_at)?;
                allocated += required;
            },
        }
        touched_peers.push(peer);
    }
    Ok(Settlement { touched_peers, allocated })
}
