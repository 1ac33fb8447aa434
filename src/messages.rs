// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

//! The protocol transactions exchanged through the consensus layer.
//!
//! Transactions arrive in consensus order and may be replayed after a restart;
//! every transaction carries a [`TransactionId`] so intake can be made
//! idempotent. Payloads are opaque here: their encoding belongs to the share
//! generator that produces and consumes them.

use crate::roster::{NodeId, RosterHash};

pub mod constants;
#[cfg(feature = "serde")]
mod serialize;
pub mod validate;

#[cfg(test)]
mod arbitrary;
#[cfg(all(test, feature = "serde"))]
mod tests;

/// Identifies a transaction by its submitter and the submitter's sequence
/// number.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransactionId {
    /// The node that submitted the transaction.
    pub submitter: NodeId,
    /// Per-submitter sequence number.
    pub sequence: u64,
}

/// One participant's key material for a target roster.
///
/// The source roster is the roster whose shares were used to produce the
/// material; it equals the target when a roster is keyed from scratch.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TssMessageTransaction {
    /// Unique id of this transaction.
    pub transaction_id: TransactionId,
    /// Roster the material derives from.
    pub source_roster_hash: RosterHash,
    /// Roster being keyed.
    pub target_roster_hash: RosterHash,
    /// The 1-based share id of the submitter the material belongs to.
    pub share_index: u32,
    /// Encrypted share material.
    pub tss_message: Vec<u8>,
}

/// One participant's vote on the ledger id a target roster's material yields.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TssVoteTransaction {
    /// Unique id of this transaction.
    pub transaction_id: TransactionId,
    /// The voting node; always the submitter.
    pub voter: NodeId,
    /// Roster the voter belongs to.
    pub source_roster_hash: RosterHash,
    /// Roster the vote is about.
    pub target_roster_hash: RosterHash,
    /// The serialized ledger id the voter derived.
    pub ledger_id: Vec<u8>,
    /// The voter's signature over the ledger id.
    pub node_signature: Vec<u8>,
    /// Bit set of the messages the voter used.
    pub tss_vote: Vec<u8>,
}

/// A signature by one private share over a message hash.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TssShareSignatureTransaction {
    /// Unique id of this transaction.
    pub transaction_id: TransactionId,
    /// Roster the signing share belongs to.
    pub roster_hash: RosterHash,
    /// The 1-based id of the signing share.
    pub share_index: u32,
    /// The hash that was signed.
    pub message_hash: Vec<u8>,
    /// A serialized [`PairingSignature`](crate::PairingSignature).
    pub share_signature: Vec<u8>,
}
