// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

//! The roster lifecycle: startup reconciliation of persisted state and the
//! intake of candidate rosters and protocol transactions.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::manager::TssCryptographyManager;
use crate::messages::{TssMessageTransaction, TssVoteTransaction};
use crate::roster::{Roster, RosterHash};
use crate::{Error, PairingPublicKey};

/// Where the lifecycle stands.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LifecyclePhase {
    /// Startup has not completed.
    Uninitialized,
    /// Persisted state is being reconciled.
    Reconciling,
    /// Reconciled; transactions are handled as they arrive.
    Steady,
}

/// The persisted state a node restarts from.
#[derive(Clone, Debug, Default)]
pub struct StartupSnapshot {
    /// The roster that was active.
    pub active_roster: Roster,
    /// The candidate roster, if one was being keyed.
    pub candidate_roster: Option<Roster>,
    /// The persisted ledger id, serialized.
    pub ledger_id: Option<Vec<u8>>,
    /// Whether the node restarts into a software upgrade, the only point at
    /// which a candidate roster may be adopted.
    pub is_upgrade: bool,
    /// Persisted message transactions in consensus order.
    pub messages: Vec<TssMessageTransaction>,
    /// Persisted vote transactions in consensus order.
    pub votes: Vec<TssVoteTransaction>,
}

/// Drives the roster lifecycle on top of a [`TssCryptographyManager`].
pub struct TssStateManager {
    manager: Arc<TssCryptographyManager>,
    phase: Mutex<LifecyclePhase>,
    ledger_id: Mutex<Option<PairingPublicKey>>,
    working_roster: Mutex<Option<RosterHash>>,
}

impl TssStateManager {
    /// A state manager that has not started up yet.
    pub fn new(manager: Arc<TssCryptographyManager>) -> TssStateManager {
        TssStateManager {
            manager,
            phase: Mutex::new(LifecyclePhase::Uninitialized),
            ledger_id: Mutex::new(None),
            working_roster: Mutex::new(None),
        }
    }

    /// The underlying share distribution protocol.
    pub fn manager(&self) -> &Arc<TssCryptographyManager> {
        &self.manager
    }

    /// The current phase.
    pub fn phase(&self) -> LifecyclePhase {
        *self.phase.lock()
    }

    /// The node's ledger id, once established.
    pub fn ledger_id(&self) -> Option<PairingPublicKey> {
        self.ledger_id.lock().clone()
    }

    /// The roster most recently set as candidate.
    pub fn working_roster_hash(&self) -> Option<RosterHash> {
        *self.working_roster.lock()
    }

    /// Reconciles persisted state and hands it to the protocol.
    ///
    /// On failure the phase returns to [`LifecyclePhase::Uninitialized`] so
    /// the next attempt starts over.
    pub fn handle_startup(&self, snapshot: StartupSnapshot) -> Result<(), Error> {
        *self.phase.lock() = LifecyclePhase::Reconciling;
        match self.reconcile(snapshot) {
            Ok(()) => {
                *self.phase.lock() = LifecyclePhase::Steady;
                Ok(())
            }
            Err(error) => {
                log::error!("startup reconciliation failed: {}", error);
                *self.phase.lock() = LifecyclePhase::Uninitialized;
                Err(error)
            }
        }
    }

    fn reconcile(&self, snapshot: StartupSnapshot) -> Result<(), Error> {
        let StartupSnapshot {
            mut active_roster,
            candidate_roster,
            ledger_id,
            is_upgrade,
            messages,
            votes,
        } = snapshot;
        let active_hash = active_roster.hash();
        let mut candidate_roster =
            candidate_roster.filter(|candidate| candidate.hash() != active_hash);

        // 1. a persisted ledger id is verified, never re-derived
        let mut ledger_id = match ledger_id {
            Some(bytes) => Some(self.verify_ledger_id(&active_roster, &bytes, &votes)?),
            None => None,
        };

        // 2. adopt the candidate on upgrade once its ledger id has won
        let candidate_winner = candidate_roster.as_ref().and_then(|candidate| {
            let candidate_hash = candidate.hash();
            crate::votes::winning_vote(
                &active_roster,
                votes.iter().filter(|vote| {
                    vote.target_roster_hash == candidate_hash
                        && vote.source_roster_hash == active_hash
                }),
            )
        });
        let candidate_ledger_id = candidate_winner.and_then(|winner| {
            self.decode_ledger_id(&winner.ledger_id)
                .map_err(|error| log::warn!("candidate ledger id does not decode: {}", error))
                .ok()
        });
        if is_upgrade && candidate_ledger_id.is_some() {
            if let Some(candidate) = candidate_roster.take() {
                log::info!(
                    "adopting candidate roster {} in place of {}",
                    candidate.hash(),
                    active_hash
                );
                self.manager.clear_candidate_roster_data(candidate.hash());
                active_roster = candidate;
            }
        }

        // 3. without a ledger id of its own the node takes the candidate's
        if ledger_id.is_none() {
            ledger_id = candidate_ledger_id;
        }

        // 4. hand the reconciled state to the protocol
        self.manager.load_roster(&active_roster);
        let active_hash = self
            .manager
            .restore_active_roster(active_roster, ledger_id.clone())?;
        if let Some(candidate) = candidate_roster {
            self.manager.load_roster(&candidate);
            *self.working_roster.lock() = Some(self.manager.key_candidate_roster(candidate)?);
        }
        for message in messages {
            self.replay(self.manager.handle_tss_message(message));
        }
        for vote in votes {
            self.replay(self.manager.handle_tss_vote(vote));
        }

        *self.ledger_id.lock() = ledger_id.or_else(|| self.manager.ledger_id(active_hash));
        log::info!("startup reconciled with active roster {}", active_hash);
        Ok(())
    }

    fn decode_ledger_id(&self, bytes: &[u8]) -> Result<PairingPublicKey, Error> {
        let ledger_id = PairingPublicKey::from_bytes(bytes)?;
        if ledger_id.schema() != self.manager.schema() {
            return Err(Error::GroupMismatch);
        }
        Ok(ledger_id)
    }

    fn verify_ledger_id(
        &self,
        active_roster: &Roster,
        bytes: &[u8],
        votes: &[TssVoteTransaction],
    ) -> Result<PairingPublicKey, Error> {
        let active_hash = active_roster.hash();
        let ledger_id = self.decode_ledger_id(bytes)?;
        let winner = crate::votes::winning_vote(
            active_roster,
            votes.iter().filter(|vote| {
                vote.target_roster_hash == active_hash && vote.source_roster_hash == active_hash
            }),
        );
        match winner {
            Some(winner) if winner.ledger_id != ledger_id.to_bytes() => {
                Err(Error::LedgerIdMismatch(active_hash))
            }
            _ => Ok(ledger_id),
        }
    }

    fn replay(&self, result: Result<bool, Error>) {
        match result {
            Ok(_) => {}
            Err(Error::UnknownRoster(hash)) => {
                log::debug!("dropped persisted transaction for stale roster {}", hash)
            }
            Err(error) => log::warn!("dropped invalid persisted transaction: {}", error),
        }
    }

    /// Makes `roster` the working candidate, starting its bookkeeping over.
    ///
    /// Fails with [`Error::RosterAlreadyActive`] for the active roster.
    pub fn set_candidate_roster(&self, roster: Roster) -> Result<RosterHash, Error> {
        let hash = roster.hash();
        if self.manager.active_roster_hash() == Some(hash) {
            return Err(Error::RosterAlreadyActive(hash));
        }
        self.manager.clear_candidate_roster_data(hash);
        *self.working_roster.lock() = Some(hash);
        self.manager.load_roster(&roster);
        self.manager.key_candidate_roster(roster)
    }

    /// Hands a message transaction to the protocol. Returns `false` for a
    /// replay.
    pub fn handle_tss_message_transaction(
        &self,
        message: TssMessageTransaction,
    ) -> Result<bool, Error> {
        self.manager.handle_tss_message(message)
    }

    /// Hands a vote transaction to the protocol, adopting the ledger id it
    /// settles if the node has none yet. Returns `false` if the vote was not
    /// counted.
    pub fn handle_tss_vote_transaction(&self, vote: TssVoteTransaction) -> Result<bool, Error> {
        let target = vote.target_roster_hash;
        let counted = self.manager.handle_tss_vote(vote)?;
        if counted {
            let mut ledger_id = self.ledger_id.lock();
            if ledger_id.is_none() {
                if let Some(settled) = self.manager.ledger_id(target) {
                    log::info!("ledger id established by roster {}", target);
                    *ledger_id = Some(settled);
                }
            }
        }
        Ok(counted)
    }

    /// Drops the message and vote bookkeeping of `roster`.
    pub fn clear_candidate_roster_data(&self, roster: &Roster) {
        let hash = roster.hash();
        self.manager.clear_candidate_roster_data(hash);
        let mut working = self.working_roster.lock();
        if *working == Some(hash) {
            *working = None;
        }
    }
}
