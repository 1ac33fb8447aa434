// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

//! Share distribution: which rosters get keyed, and the bookkeeping of the
//! material, messages and votes each roster accumulates.
//!
//! At most one roster is active and at most one is the candidate, never the
//! same one. Key material is generated for the active roster when the node is
//! configured to key it, and for the candidate roster otherwise. Votes on a
//! roster's ledger id are weighted by the source roster; once a ledger id wins,
//! voting for the roster closes and the ledger id is fixed.
//!
//! Roster transitions are serialized by one lock, and a failed transition
//! leaves rosters and pointers as they were. Share generation and submission
//! run under that lock alone. The roster pointers and each roster state are
//! only locked briefly, in that order, and no roster state lock is held while
//! another one is acquired.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::TssConfig;
use crate::keygen::{PrivateShare, PublicShare, ShareGenerator};
use crate::messages::validate::Validate;
use crate::messages::{
    TransactionId, TssMessageTransaction, TssShareSignatureTransaction, TssVoteTransaction,
};
use crate::roster::{NodeId, ParticipantDirectory, Roster, RosterHash};
use crate::store::{RosterStateRepository, SharedRosterState};
use crate::votes::{self, WinningVote};
use crate::{Error, PairingPublicKey, SignatureSchema};

/// Where outbound protocol transactions go.
pub trait TssSubmissions: Send + Sync {
    /// Submits this node's key material for a roster.
    fn submit_tss_message(&self, message: TssMessageTransaction);
    /// Submits this node's vote on a roster's ledger id.
    fn submit_tss_vote(&self, vote: TssVoteTransaction);
    /// Submits a private share's signature over a message hash.
    fn submit_share_signature(&self, signature: TssShareSignatureTransaction);
}

#[derive(Debug, Default)]
struct RosterPointers {
    active: Option<RosterHash>,
    candidate: Option<RosterHash>,
    ledger_id_pending: bool,
}

/// Tracks keying state per roster hash.
pub struct TssCryptographyManager {
    self_id: NodeId,
    config: TssConfig,
    schema: SignatureSchema,
    generator: Arc<dyn ShareGenerator>,
    submissions: Arc<dyn TssSubmissions>,
    encryption_keys: Mutex<HashMap<NodeId, Vec<u8>>>,
    rosters: RosterStateRepository,
    transition: Mutex<()>,
    pointers: Mutex<RosterPointers>,
    sequence: AtomicU64,
}

impl TssCryptographyManager {
    /// A manager for node `self_id`.
    pub fn new(
        self_id: NodeId,
        config: TssConfig,
        generator: Arc<dyn ShareGenerator>,
        submissions: Arc<dyn TssSubmissions>,
    ) -> Result<TssCryptographyManager, Error> {
        let schema = config.schema()?;
        Ok(TssCryptographyManager {
            self_id,
            config,
            schema,
            generator,
            submissions,
            encryption_keys: Mutex::new(HashMap::new()),
            rosters: RosterStateRepository::new(),
            transition: Mutex::new(()),
            pointers: Mutex::new(RosterPointers::default()),
            sequence: AtomicU64::new(0),
        })
    }

    /// This node's id.
    pub fn self_id(&self) -> NodeId {
        self.self_id
    }

    /// The node configuration.
    pub fn config(&self) -> &TssConfig {
        &self.config
    }

    /// The schema this node signs with.
    pub fn schema(&self) -> SignatureSchema {
        self.schema
    }

    pub(crate) fn submissions(&self) -> &dyn TssSubmissions {
        self.submissions.as_ref()
    }

    /// A fresh id for a transaction submitted by this node.
    pub fn next_transaction_id(&self) -> TransactionId {
        TransactionId {
            submitter: self.self_id,
            sequence: self.sequence.fetch_add(1, Ordering::SeqCst),
        }
    }

    /// Registers the TSS encryption key of every participant and returns the
    /// roster hash.
    ///
    /// Registered keys take precedence over roster entries when share
    /// material is encrypted to a node.
    pub fn load_roster(&self, roster: &Roster) -> RosterHash {
        let mut keys = self.encryption_keys.lock();
        for entry in &roster.entries {
            if !entry.tss_encryption_key.is_empty() {
                keys.insert(entry.node_id, entry.tss_encryption_key.clone());
            }
        }
        roster.hash()
    }

    /// The registered TSS encryption key of `node_id`.
    pub fn encryption_key(&self, node_id: NodeId) -> Option<Vec<u8>> {
        self.encryption_keys.lock().get(&node_id).cloned()
    }

    /// The share allocation of `roster`, resolving encryption keys through
    /// the registry.
    pub fn directory(&self, roster: &Roster) -> ParticipantDirectory {
        let keys = self.encryption_keys.lock();
        ParticipantDirectory::new(roster, self.config.max_shares_per_node)
            .with_encryption_keys(|node_id| keys.get(&node_id).cloned())
    }

    /// Makes `roster` the active roster, keying it if this node keys active
    /// rosters.
    ///
    /// Fails with [`Error::RosterAlreadyActive`] if it already is active.
    pub fn set_active_roster(&self, roster: Roster) -> Result<RosterHash, Error> {
        let _transition = self.transition.lock();
        let hash = roster.hash();
        if self.pointers.lock().active == Some(hash) {
            return Err(Error::RosterAlreadyActive(hash));
        }
        self.activate(hash, roster, None)?;
        Ok(hash)
    }

    /// Makes `roster` the active roster with an already established ledger id,
    /// without generating key material for it.
    ///
    /// Restoring the roster that is already active only checks the ledger id.
    pub fn restore_active_roster(
        &self,
        roster: Roster,
        ledger_id: Option<PairingPublicKey>,
    ) -> Result<RosterHash, Error> {
        let _transition = self.transition.lock();
        let hash = roster.hash();
        if self.pointers.lock().active == Some(hash) {
            if let Some(ledger_id) = ledger_id {
                self.store_ledger_id(hash, ledger_id)?;
            }
            return Ok(hash);
        }
        self.activate(hash, roster, ledger_id)?;
        Ok(hash)
    }

    fn activate(
        &self,
        hash: RosterHash,
        roster: Roster,
        ledger_id: Option<PairingPublicKey>,
    ) -> Result<(), Error> {
        let created = !self.rosters.contains(&hash);
        let state = self.rosters.get_or_create(hash, || roster.clone());
        let result = self
            .adopt_ledger_id(&state, hash, ledger_id)
            .and_then(|ledger_id_known| {
                if ledger_id_known || !self.config.key_active_roster || state.lock().is_keyed() {
                    Ok(())
                } else {
                    self.generate(hash, &roster, hash)
                }
            });
        if let Err(error) = result {
            if created {
                self.rosters.remove(&hash);
            }
            return Err(error);
        }

        let ledger_id_known = state.lock().ledger_id.is_some();
        let mut pointers = self.pointers.lock();
        if pointers.candidate == Some(hash) {
            pointers.candidate = None;
        }
        pointers.active = Some(hash);
        pointers.ledger_id_pending = !ledger_id_known;
        log::info!(
            "node {} activated roster {} ({} entries)",
            self.self_id,
            hash,
            roster.entries.len()
        );
        Ok(())
    }

    /// Records `ledger_id` on `state` unless another one is recorded; returns
    /// whether the roster now has a ledger id.
    fn adopt_ledger_id(
        &self,
        state: &SharedRosterState,
        hash: RosterHash,
        ledger_id: Option<PairingPublicKey>,
    ) -> Result<bool, Error> {
        let mut state = state.lock();
        if let Some(ledger_id) = ledger_id {
            if state.ledger_id.is_none() {
                state.ledger_id = Some(ledger_id);
            } else if state.ledger_id.as_ref() != Some(&ledger_id) {
                return Err(Error::LedgerIdAlreadySet(hash));
            }
        }
        Ok(state.ledger_id.is_some())
    }

    /// Records `roster` as the candidate roster and keys it if this node keys
    /// candidate rosters. The bookkeeping of a different previous candidate is
    /// dropped once the new one is in place.
    ///
    /// Fails with [`Error::RosterAlreadyActive`] for the active roster. On
    /// failure the previous candidate is kept.
    pub fn key_candidate_roster(&self, roster: Roster) -> Result<RosterHash, Error> {
        let _transition = self.transition.lock();
        let hash = roster.hash();
        let active = self.pointers.lock().active;
        if active == Some(hash) {
            return Err(Error::RosterAlreadyActive(hash));
        }

        let created = !self.rosters.contains(&hash);
        let keyed = self
            .rosters
            .get_or_create(hash, || roster.clone())
            .lock()
            .is_keyed();
        if !self.config.key_active_roster && !keyed {
            if let Err(error) = self.generate(hash, &roster, active.unwrap_or(hash)) {
                if created {
                    self.rosters.remove(&hash);
                }
                return Err(error);
            }
        }

        let mut pointers = self.pointers.lock();
        if let Some(previous) = pointers.candidate.filter(|previous| *previous != hash) {
            log::info!("candidate roster {} replaced by {}", previous, hash);
            self.rosters.remove(&previous);
        }
        pointers.candidate = Some(hash);
        pointers.ledger_id_pending = true;
        log::info!("node {} keyed candidate roster {}", self.self_id, hash);
        Ok(hash)
    }

    /// Generates and stores this node's key material for `roster`, and
    /// submits the share messages for it.
    ///
    /// Fails with [`Error::AlreadyKeyed`] if material exists for the roster.
    pub fn generate_key_material_for_roster(
        &self,
        hash: RosterHash,
        roster: &Roster,
    ) -> Result<(), Error> {
        let _transition = self.transition.lock();
        let source = self.pointers.lock().active.unwrap_or(hash);
        let created = !self.rosters.contains(&hash);
        self.rosters.get_or_create(hash, || roster.clone());
        let result = self.generate(hash, roster, source);
        if result.is_err() && created {
            self.rosters.remove(&hash);
        }
        result
    }

    /// Runs the share generator for `hash`. Callers hold the transition lock,
    /// so the roster state cannot be keyed or removed meanwhile.
    fn generate(&self, hash: RosterHash, roster: &Roster, source: RosterHash) -> Result<(), Error> {
        let state = self
            .rosters
            .get(&hash)
            .ok_or(Error::UnknownRoster(hash))?;
        if state.lock().is_keyed() {
            return Err(Error::AlreadyKeyed(hash));
        }

        let directory = self.directory(roster);
        let private_shares = self
            .generator
            .generate_private_shares(self.self_id, hash, &directory)?;
        let public_shares = self.generator.generate_public_shares(&private_shares)?;
        if public_shares.len() != private_shares.len() {
            return Err(Error::ShareGenerationFailed);
        }
        let messages = self
            .generator
            .share_messages(hash, &directory, &private_shares)?;
        log::info!(
            "generated {} shares for roster {}",
            private_shares.len(),
            hash
        );
        {
            let mut state = state.lock();
            state.private_shares = Some(private_shares);
            state.public_shares = Some(public_shares);
        }

        for message in messages {
            self.submissions.submit_tss_message(TssMessageTransaction {
                transaction_id: self.next_transaction_id(),
                source_roster_hash: source,
                target_roster_hash: hash,
                share_index: message.share_index,
                tss_message: message.payload,
            });
        }
        Ok(())
    }

    /// Drops every piece of bookkeeping for `hash`. The active roster is
    /// never cleared.
    pub fn clear_candidate_roster_data(&self, hash: RosterHash) {
        let _transition = self.transition.lock();
        let mut pointers = self.pointers.lock();
        if pointers.active == Some(hash) {
            log::warn!("refused to clear the active roster {}", hash);
            return;
        }
        if self.rosters.remove(&hash).is_some() {
            log::debug!("cleared roster {}", hash);
        }
        if pointers.candidate == Some(hash) {
            pointers.candidate = None;
        }
    }

    /// Records a message for its target roster. Returns `false` if the
    /// transaction was seen before.
    pub fn handle_tss_message(&self, message: TssMessageTransaction) -> Result<bool, Error> {
        message.validate()?;
        let hash = message.target_roster_hash;
        let state = self.rosters.get(&hash).ok_or(Error::UnknownRoster(hash))?;
        let recorded = state.lock().record_message(message);
        if !recorded {
            log::debug!("ignored replayed tss message for roster {}", hash);
        }
        Ok(recorded)
    }

    /// Records a vote for its target roster and closes voting once a ledger
    /// id has enough weight from the source roster. Returns `false` if the
    /// vote was not counted.
    pub fn handle_tss_vote(&self, vote: TssVoteTransaction) -> Result<bool, Error> {
        vote.validate()?;
        let target = vote.target_roster_hash;
        let source_roster = self
            .rosters
            .get(&vote.source_roster_hash)
            .ok_or(Error::UnknownRoster(vote.source_roster_hash))?
            .lock()
            .roster
            .clone();
        let state = self.rosters.get(&target).ok_or(Error::UnknownRoster(target))?;

        let won = {
            let mut state = state.lock();
            let source_hash = vote.source_roster_hash;
            if !state.record_vote(vote) {
                return Ok(false);
            }
            if state.voting_closed {
                return Ok(true);
            }
            let winner = votes::winning_vote(
                &source_roster,
                state
                    .votes
                    .values()
                    .filter(|vote| vote.source_roster_hash == source_hash),
            );
            match winner {
                Some(winner) => match PairingPublicKey::from_bytes(&winner.ledger_id) {
                    Ok(ledger_id) => {
                        state.voting_closed = true;
                        if state.ledger_id.is_none() {
                            state.ledger_id = Some(ledger_id);
                        } else if state.ledger_id.as_ref() != Some(&ledger_id) {
                            log::warn!(
                                "winning ledger id for roster {} differs from the recorded one",
                                target
                            );
                        }
                        true
                    }
                    Err(error) => {
                        log::warn!(
                            "winning ledger id for roster {} does not decode: {}",
                            target,
                            error
                        );
                        false
                    }
                },
                None => false,
            }
        };

        if won {
            log::info!("voting closed for roster {}", target);
            let mut pointers = self.pointers.lock();
            if pointers.active == Some(target) || pointers.candidate == Some(target) {
                pointers.ledger_id_pending = false;
            }
        }
        Ok(true)
    }

    /// Records the ledger id of `hash`.
    ///
    /// Setting the same ledger id again is a no-op; a different one fails with
    /// [`Error::LedgerIdAlreadySet`].
    pub fn set_ledger_id(&self, hash: RosterHash, ledger_id: PairingPublicKey) -> Result<(), Error> {
        self.store_ledger_id(hash, ledger_id)
    }

    fn store_ledger_id(&self, hash: RosterHash, ledger_id: PairingPublicKey) -> Result<(), Error> {
        let state = self.rosters.get(&hash).ok_or(Error::UnknownRoster(hash))?;
        self.adopt_ledger_id(&state, hash, Some(ledger_id))?;
        let mut pointers = self.pointers.lock();
        if pointers.active == Some(hash) {
            pointers.ledger_id_pending = false;
        }
        Ok(())
    }

    /// The ledger id of `hash`, once known.
    pub fn ledger_id(&self, hash: RosterHash) -> Option<PairingPublicKey> {
        self.rosters.get(&hash)?.lock().ledger_id.clone()
    }

    /// The ledger id with enough votes for `target`, with votes weighted by
    /// `source_roster`.
    pub fn winning_vote(&self, target: RosterHash, source_roster: &Roster) -> Option<WinningVote> {
        let source_hash = source_roster.hash();
        let state = self.rosters.get(&target)?;
        let state = state.lock();
        votes::winning_vote(
            source_roster,
            state
                .votes
                .values()
                .filter(|vote| vote.source_roster_hash == source_hash),
        )
    }

    /// The active roster, if any.
    pub fn active_roster_hash(&self) -> Option<RosterHash> {
        self.pointers.lock().active
    }

    /// The candidate roster, if any.
    pub fn candidate_roster_hash(&self) -> Option<RosterHash> {
        self.pointers.lock().candidate
    }

    /// Whether a roster was set whose ledger id is not known yet.
    pub fn is_ledger_id_pending(&self) -> bool {
        self.pointers.lock().ledger_id_pending
    }

    /// The roster registered under `hash`.
    pub fn roster(&self, hash: RosterHash) -> Option<Roster> {
        Some(self.rosters.get(&hash)?.lock().roster.clone())
    }

    /// Accepted message counts per node for `hash`.
    pub fn share_counts(&self, hash: RosterHash) -> Option<BTreeMap<NodeId, u32>> {
        Some(self.rosters.get(&hash)?.lock().share_counts.clone())
    }

    /// This node's private shares for `hash`.
    pub fn private_shares(&self, hash: RosterHash) -> Option<Vec<PrivateShare>> {
        self.rosters.get(&hash)?.lock().private_shares.clone()
    }

    /// This node's public shares for `hash`.
    pub fn public_shares(&self, hash: RosterHash) -> Option<Vec<PublicShare>> {
        self.rosters.get(&hash)?.lock().public_shares.clone()
    }

    /// Accepted messages for `hash`, in consensus order.
    pub fn messages(&self, hash: RosterHash) -> Vec<TssMessageTransaction> {
        self.rosters
            .get(&hash)
            .map(|state| state.lock().messages.clone())
            .unwrap_or_default()
    }

    /// Counted votes for `hash`.
    pub fn votes(&self, hash: RosterHash) -> Vec<TssVoteTransaction> {
        self.rosters
            .get(&hash)
            .map(|state| state.lock().votes.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether a ledger id has won the vote for `hash`.
    pub fn is_voting_closed(&self, hash: RosterHash) -> bool {
        self.rosters
            .get(&hash)
            .map(|state| state.lock().voting_closed)
            .unwrap_or(false)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Keeps every submitted transaction.
    #[derive(Default)]
    pub(crate) struct RecordingSubmissions {
        pub(crate) messages: Mutex<Vec<TssMessageTransaction>>,
        pub(crate) votes: Mutex<Vec<TssVoteTransaction>>,
        pub(crate) signatures: Mutex<Vec<TssShareSignatureTransaction>>,
    }

    impl TssSubmissions for RecordingSubmissions {
        fn submit_tss_message(&self, message: TssMessageTransaction) {
            self.messages.lock().push(message);
        }

        fn submit_tss_vote(&self, vote: TssVoteTransaction) {
            self.votes.lock().push(vote);
        }

        fn submit_share_signature(&self, signature: TssShareSignatureTransaction) {
            self.signatures.lock().push(signature);
        }
    }
}
