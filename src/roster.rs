// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

//! Rosters, their content hashes, and the assignment of share ids to nodes.

use std::collections::BTreeMap;
use std::fmt;

use sha2::{Digest, Sha256};

use crate::elgamal::EncryptionKeyResolver;
use crate::{Error, PairingPublicKey};

/// Identifies a consensus node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node{}", self.0)
    }
}

/// One participant of a roster.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterEntry {
    /// The node.
    pub node_id: NodeId,
    /// Consensus weight of the node.
    pub weight: u64,
    /// Serialized [`PairingPublicKey`] shares are encrypted to; empty when the
    /// node has not published one.
    pub tss_encryption_key: Vec<u8>,
}

/// An ordered set of participants.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    /// Participants in roster order.
    pub entries: Vec<RosterEntry>,
}

impl Roster {
    /// A roster of `entries`, kept in the given order.
    pub fn new(entries: Vec<RosterEntry>) -> Roster {
        Roster { entries }
    }

    /// The entry for `node_id`, if it is a participant.
    pub fn entry(&self, node_id: NodeId) -> Option<&RosterEntry> {
        self.entries.iter().find(|entry| entry.node_id == node_id)
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |total, entry| total.saturating_add(entry.weight))
    }

    /// The canonical encoding the roster hash is computed over.
    ///
    /// `u32` entry count, then per entry the node id and weight as big-endian
    /// `u64`s and the encryption key prefixed by its `u32` length.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(self.entries.len() as u32).to_be_bytes());
        for entry in &self.entries {
            bytes.extend_from_slice(&entry.node_id.0.to_be_bytes());
            bytes.extend_from_slice(&entry.weight.to_be_bytes());
            bytes.extend_from_slice(&(entry.tss_encryption_key.len() as u32).to_be_bytes());
            bytes.extend_from_slice(&entry.tss_encryption_key);
        }
        bytes
    }

    /// SHA-256 of [`Roster::canonical_bytes`].
    pub fn hash(&self) -> RosterHash {
        let digest = Sha256::digest(&self.canonical_bytes());
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&digest);
        RosterHash(hash)
    }
}

/// The content hash identifying a roster.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct RosterHash(pub [u8; 32]);

impl RosterHash {
    /// The raw digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for RosterHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for RosterHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RosterHash")
            .field(&hex::encode(self.0))
            .finish()
    }
}

/// Share ids owned by every node of a roster.
///
/// Every node gets `ceil(weight * max_shares_per_node / max_weight)` shares and
/// ids are handed out contiguously from 1 in roster order.
#[derive(Clone, Debug)]
pub struct ParticipantDirectory {
    owners: Vec<NodeId>,
    shares: BTreeMap<NodeId, Vec<u32>>,
    keys: BTreeMap<NodeId, Vec<u8>>,
}

impl ParticipantDirectory {
    /// Allocates shares for `roster`.
    pub fn new(roster: &Roster, max_shares_per_node: u32) -> ParticipantDirectory {
        let max_weight = roster.entries.iter().map(|e| e.weight).max().unwrap_or(0);
        let mut owners = Vec::new();
        let mut shares = BTreeMap::new();
        let mut keys = BTreeMap::new();

        for entry in &roster.entries {
            let count = share_allocation(entry.weight, max_weight, max_shares_per_node);
            let first = owners.len() as u32 + 1;
            owners.extend(std::iter::repeat(entry.node_id).take(count as usize));
            shares.insert(entry.node_id, (first..first + count).collect());
            keys.insert(entry.node_id, entry.tss_encryption_key.clone());
        }

        ParticipantDirectory {
            owners,
            shares,
            keys,
        }
    }

    /// Resolves encryption keys through `lookup` first, keeping the roster's
    /// own key for nodes it does not know.
    pub fn with_encryption_keys<F>(mut self, lookup: F) -> ParticipantDirectory
    where
        F: Fn(NodeId) -> Option<Vec<u8>>,
    {
        for (node_id, key) in self.keys.iter_mut() {
            if let Some(registered) = lookup(*node_id) {
                *key = registered;
            }
        }
        self
    }

    /// Total number of shares.
    pub fn share_count(&self) -> usize {
        self.owners.len()
    }

    /// The node owning the 1-based `share_id`.
    pub fn owner_of(&self, share_id: u32) -> Option<NodeId> {
        share_id
            .checked_sub(1)
            .and_then(|index| self.owners.get(index as usize))
            .copied()
    }

    /// Share ids owned by `node_id`, empty for unknown nodes.
    pub fn shares_of(&self, node_id: NodeId) -> &[u32] {
        self.shares
            .get(&node_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn share_allocation(weight: u64, max_weight: u64, max_shares_per_node: u32) -> u32 {
    if max_weight == 0 {
        return 0;
    }
    let scaled = weight as u128 * max_shares_per_node as u128;
    ((scaled + max_weight as u128 - 1) / max_weight as u128) as u32
}

impl EncryptionKeyResolver for ParticipantDirectory {
    fn get_for_share_id(&self, share_id: u32) -> Result<PairingPublicKey, Error> {
        let owner = self.owner_of(share_id).ok_or(Error::ShareIdOutOfRange {
            share_id,
            share_count: self.share_count(),
        })?;
        match self.keys.get(&owner) {
            Some(key) if !key.is_empty() => PairingPublicKey::from_bytes(key),
            _ => Err(Error::MissingEncryptionKey(owner)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(node: u64, weight: u64) -> RosterEntry {
        RosterEntry {
            node_id: NodeId(node),
            weight,
            tss_encryption_key: vec![],
        }
    }

    #[test]
    fn hash_depends_on_order_and_content() {
        let a = Roster::new(vec![entry(1, 10), entry(2, 20)]);
        let b = Roster::new(vec![entry(2, 20), entry(1, 10)]);
        let c = Roster::new(vec![entry(1, 10), entry(2, 21)]);

        assert_eq!(a.hash(), a.clone().hash());
        assert_ne!(a.hash(), b.hash());
        assert_ne!(a.hash(), c.hash());
    }

    #[test]
    fn canonical_encoding_layout() {
        let roster = Roster::new(vec![RosterEntry {
            node_id: NodeId(7),
            weight: 3,
            tss_encryption_key: vec![0xaa, 0xbb],
        }]);
        let expected: Vec<u8> = [
            &1u32.to_be_bytes()[..],
            &7u64.to_be_bytes()[..],
            &3u64.to_be_bytes()[..],
            &2u32.to_be_bytes()[..],
            &[0xaa, 0xbb][..],
        ]
        .concat();
        assert_eq!(roster.canonical_bytes(), expected);
    }

    #[test]
    fn shares_scale_with_weight() {
        let roster = Roster::new(vec![entry(1, 100), entry(2, 50), entry(3, 1), entry(4, 0)]);
        let directory = ParticipantDirectory::new(&roster, 10);

        assert_eq!(directory.shares_of(NodeId(1)), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(directory.shares_of(NodeId(2)), &[11, 12, 13, 14, 15]);
        assert_eq!(directory.shares_of(NodeId(3)), &[16]);
        assert!(directory.shares_of(NodeId(4)).is_empty());
        assert_eq!(directory.share_count(), 16);
        assert_eq!(directory.owner_of(16), Some(NodeId(3)));
        assert_eq!(directory.owner_of(17), None);
        assert_eq!(directory.owner_of(0), None);
    }

    #[test]
    fn missing_encryption_key_is_reported() {
        let roster = Roster::new(vec![entry(9, 1)]);
        let directory = ParticipantDirectory::new(&roster, 1);
        assert_eq!(
            directory.get_for_share_id(1).err().expect("an error"),
            Error::MissingEncryptionKey(NodeId(9))
        );
    }
}
