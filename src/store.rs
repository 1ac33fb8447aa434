// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

//! Per-roster keying state, one lock per roster hash.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::keygen::{PrivateShare, PublicShare};
use crate::messages::{TransactionId, TssMessageTransaction, TssVoteTransaction};
use crate::roster::{NodeId, Roster, RosterHash};
use crate::PairingPublicKey;

/// Everything tracked while a roster is being keyed.
#[derive(Debug)]
pub struct RosterState {
    /// The roster itself.
    pub roster: Roster,
    /// Accepted messages per submitting roster node.
    pub share_counts: BTreeMap<NodeId, u32>,
    /// This node's private shares, once generated.
    pub private_shares: Option<Vec<PrivateShare>>,
    /// Public shares matching `private_shares`.
    pub public_shares: Option<Vec<PublicShare>>,
    /// Accepted messages in consensus order.
    pub messages: Vec<TssMessageTransaction>,
    /// The counted vote of every voter.
    pub votes: BTreeMap<NodeId, TssVoteTransaction>,
    /// Ids of every message and vote seen, counted or not.
    pub seen: HashSet<TransactionId>,
    /// Set once a ledger id has won the vote.
    pub voting_closed: bool,
    /// The ledger id of the roster, once known.
    pub ledger_id: Option<PairingPublicKey>,
}

impl RosterState {
    /// Fresh state with a zero share count for every node of `roster`.
    pub fn new(roster: Roster) -> RosterState {
        let share_counts = roster
            .entries
            .iter()
            .map(|entry| (entry.node_id, 0))
            .collect();
        RosterState {
            roster,
            share_counts,
            private_shares: None,
            public_shares: None,
            messages: Vec::new(),
            votes: BTreeMap::new(),
            seen: HashSet::new(),
            voting_closed: false,
            ledger_id: None,
        }
    }

    /// Whether key material has been generated for the roster.
    pub fn is_keyed(&self) -> bool {
        self.private_shares.is_some()
    }

    /// Accepts a message unless its id was seen before.
    pub fn record_message(&mut self, message: TssMessageTransaction) -> bool {
        if !self.seen.insert(message.transaction_id) {
            return false;
        }
        if let Some(count) = self.share_counts.get_mut(&message.transaction_id.submitter) {
            *count += 1;
        }
        self.messages.push(message);
        true
    }

    /// Accepts the first vote of every voter unless its id was seen before.
    pub fn record_vote(&mut self, vote: TssVoteTransaction) -> bool {
        if !self.seen.insert(vote.transaction_id) {
            return false;
        }
        if self.votes.contains_key(&vote.voter) {
            return false;
        }
        self.votes.insert(vote.voter, vote);
        true
    }
}

/// Shared handle to one roster's state.
pub type SharedRosterState = Arc<Mutex<RosterState>>;

/// Roster states keyed by roster hash.
///
/// The outer lock is only held to look up, insert or remove an entry; work on
/// a roster happens under that roster's own lock.
#[derive(Debug, Default)]
pub struct RosterStateRepository {
    states: Mutex<HashMap<RosterHash, SharedRosterState>>,
}

impl RosterStateRepository {
    /// An empty repository.
    pub fn new() -> RosterStateRepository {
        RosterStateRepository::default()
    }

    /// The state for `hash`, created from `roster` if absent.
    pub fn get_or_create<F>(&self, hash: RosterHash, roster: F) -> SharedRosterState
    where
        F: FnOnce() -> Roster,
    {
        self.states
            .lock()
            .entry(hash)
            .or_insert_with(|| Arc::new(Mutex::new(RosterState::new(roster()))))
            .clone()
    }

    /// The state for `hash`, if any.
    pub fn get(&self, hash: &RosterHash) -> Option<SharedRosterState> {
        self.states.lock().get(hash).cloned()
    }

    /// Drops the state for `hash`, returning it if present.
    pub fn remove(&self, hash: &RosterHash) -> Option<SharedRosterState> {
        self.states.lock().remove(hash)
    }

    /// Whether state exists for `hash`.
    pub fn contains(&self, hash: &RosterHash) -> bool {
        self.states.lock().contains_key(hash)
    }

    /// Number of rosters tracked.
    pub fn len(&self) -> usize {
        self.states.lock().len()
    }

    /// Whether no roster is tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
