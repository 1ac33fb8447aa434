// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

//! Weighted tallying of ledger id votes.

use std::collections::{BTreeMap, BTreeSet};

use crate::messages::TssVoteTransaction;
use crate::roster::Roster;

/// Whether `vote_weight` is at least a third of `total_weight`.
pub fn has_met_threshold(vote_weight: u64, total_weight: u64) -> bool {
    vote_weight as u128 * 3 >= total_weight as u128
}

/// A ledger id with enough weight behind it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WinningVote {
    /// The serialized ledger id voted for.
    pub ledger_id: Vec<u8>,
    /// Summed weight of the voters.
    pub weight: u64,
}

/// Tallies `votes` by ledger id, weighting each voter by its weight in
/// `source_roster`, and returns the heaviest ledger id if it meets the
/// threshold.
///
/// Votes from nodes outside the source roster count for nothing, and only the
/// first vote of each voter is counted.
pub fn winning_vote<'a, I>(source_roster: &Roster, votes: I) -> Option<WinningVote>
where
    I: IntoIterator<Item = &'a TssVoteTransaction>,
{
    let mut voted = BTreeSet::new();
    let mut tally: BTreeMap<&[u8], u64> = BTreeMap::new();
    for vote in votes {
        let entry = match source_roster.entry(vote.voter) {
            Some(entry) => entry,
            None => continue,
        };
        if !voted.insert(vote.voter) {
            continue;
        }
        let weight = tally.entry(vote.ledger_id.as_slice()).or_insert(0);
        *weight = weight.saturating_add(entry.weight);
    }

    // ties go to the smaller ledger id
    let (ledger_id, weight) = tally.into_iter().max_by(|(a_id, a_weight), (b_id, b_weight)| {
        a_weight.cmp(b_weight).then(b_id.cmp(a_id))
    })?;
    if weight == 0 || !has_met_threshold(weight, source_roster.total_weight()) {
        return None;
    }
    Some(WinningVote {
        ledger_id: ledger_id.to_vec(),
        weight,
    })
}
