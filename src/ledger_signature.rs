// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

//! Ledger signature requests and the consumers notified of their results.
//!
//! A request returns immediately; the work is handed to an [`Executor`].
//! Every registered consumer is called once per signature, and a consumer
//! that panics does not keep the others from being notified.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::RwLock;
use sha2::{Digest, Sha384};

use crate::manager::TssCryptographyManager;
use crate::messages::TssShareSignatureTransaction;

/// Runs scheduled work.
pub trait Executor: Send + Sync {
    /// Runs `task`, now or later.
    fn execute(&self, task: Box<dyn FnOnce() + Send>);
}

/// Runs every task on the calling thread.
#[derive(Copy, Clone, Debug, Default)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn execute(&self, task: Box<dyn FnOnce() + Send>) {
        task()
    }
}

/// Runs every task on a new thread.
#[derive(Copy, Clone, Debug, Default)]
pub struct ThreadExecutor;

impl Executor for ThreadExecutor {
    fn execute(&self, task: Box<dyn FnOnce() + Send>) {
        thread::spawn(task);
    }
}

/// Receives `(message_hash, signature)` pairs.
pub type Consumer = Arc<dyn Fn(&[u8], &[u8]) + Send + Sync>;

/// Handle to a registered consumer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ConsumerId(u64);

type Consumers = Arc<Vec<(ConsumerId, Consumer)>>;

/// Answers ledger signature requests for the node.
pub struct LedgerSignatureService {
    manager: Arc<TssCryptographyManager>,
    executor: Arc<dyn Executor>,
    consumers: RwLock<Consumers>,
    next_consumer: AtomicU64,
}

impl LedgerSignatureService {
    /// A service signing through `manager` and running work on `executor`.
    pub fn new(
        manager: Arc<TssCryptographyManager>,
        executor: Arc<dyn Executor>,
    ) -> LedgerSignatureService {
        LedgerSignatureService {
            manager,
            executor,
            consumers: RwLock::new(Arc::new(Vec::new())),
            next_consumer: AtomicU64::new(0),
        }
    }

    /// Adds a consumer; it sees every signature delivered from now on.
    pub fn register_consumer(&self, consumer: Consumer) -> ConsumerId {
        let id = ConsumerId(self.next_consumer.fetch_add(1, Ordering::SeqCst));
        let mut consumers = self.consumers.write();
        let mut updated = consumers.as_ref().clone();
        updated.push((id, consumer));
        *consumers = Arc::new(updated);
        id
    }

    /// Removes a consumer. Returns `false` if it was not registered.
    pub fn unregister_consumer(&self, id: ConsumerId) -> bool {
        let mut consumers = self.consumers.write();
        let mut updated = consumers.as_ref().clone();
        let before = updated.len();
        updated.retain(|(registered, _)| *registered != id);
        let removed = updated.len() != before;
        *consumers = Arc::new(updated);
        removed
    }

    /// Number of registered consumers.
    pub fn consumer_count(&self) -> usize {
        self.consumers.read().len()
    }

    /// Requests a ledger signature over `message_hash`.
    ///
    /// Without ledger id signing, consumers receive the SHA-384 digest of the
    /// hash in place of a signature. With it, every private share of the
    /// active roster signs the hash and its signature is submitted for
    /// aggregation.
    pub fn request_ledger_signature(&self, message_hash: &[u8]) {
        let message_hash = message_hash.to_vec();
        if self.manager.config().sign_with_ledger_id {
            let manager = self.manager.clone();
            self.executor
                .execute(Box::new(move || submit_share_signatures(&manager, message_hash)));
        } else {
            let consumers = self.consumers.read().clone();
            self.executor.execute(Box::new(move || {
                let digest = Sha384::digest(&message_hash);
                notify(&consumers, &message_hash, digest.as_slice());
            }));
        }
    }

    /// Delivers a signature over `message_hash` to every consumer.
    pub fn notify_signature(&self, message_hash: &[u8], signature: &[u8]) {
        let consumers = self.consumers.read().clone();
        let message_hash = message_hash.to_vec();
        let signature = signature.to_vec();
        self.executor
            .execute(Box::new(move || notify(&consumers, &message_hash, &signature)));
    }
}

fn notify(consumers: &[(ConsumerId, Consumer)], message_hash: &[u8], signature: &[u8]) {
    for (id, consumer) in consumers {
        if catch_unwind(AssertUnwindSafe(|| consumer(message_hash, signature))).is_err() {
            log::error!("ledger signature consumer {:?} panicked", id);
        }
    }
}

fn submit_share_signatures(manager: &TssCryptographyManager, message_hash: Vec<u8>) {
    let roster_hash = match manager.active_roster_hash() {
        Some(hash) => hash,
        None => {
            log::warn!("no active roster to sign with");
            return;
        }
    };
    let shares = match manager.private_shares(roster_hash) {
        Some(shares) => shares,
        None => {
            log::warn!("active roster {} has no private shares", roster_hash);
            return;
        }
    };
    for share in shares {
        match share.key.sign(&message_hash) {
            Ok(signature) => manager
                .submissions()
                .submit_share_signature(TssShareSignatureTransaction {
                    transaction_id: manager.next_transaction_id(),
                    roster_hash,
                    share_index: share.share_id,
                    message_hash: message_hash.clone(),
                    share_signature: signature.to_bytes(),
                }),
            Err(error) => log::error!("share {} failed to sign: {}", share.share_id, error),
        }
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::config::TssConfig;
    use crate::keygen::testing::RandomShares;
    use crate::manager::testing::RecordingSubmissions;
    use crate::roster::{NodeId, Roster, RosterEntry};
    use crate::PairingSignature;

    fn service(sign_with_ledger_id: bool) -> (LedgerSignatureService, Arc<RecordingSubmissions>) {
        let submissions = Arc::new(RecordingSubmissions::default());
        let config = TssConfig {
            key_active_roster: true,
            sign_with_ledger_id,
            ..TssConfig::default()
        };
        let manager = TssCryptographyManager::new(
            NodeId(1),
            config,
            Arc::new(RandomShares::default()),
            submissions.clone(),
        )
        .unwrap();
        (
            LedgerSignatureService::new(Arc::new(manager), Arc::new(InlineExecutor)),
            submissions,
        )
    }

    #[test]
    fn every_consumer_sees_the_digest() {
        let (service, _) = service(false);
        let seen = Arc::new(Mutex::new(Vec::new()));
        for _ in 0..2 {
            let seen = seen.clone();
            service.register_consumer(Arc::new(move |hash: &[u8], signature: &[u8]| {
                seen.lock().push((hash.to_vec(), signature.to_vec()))
            }));
        }

        service.request_ledger_signature(b"block");
        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, b"block".to_vec());
        assert_eq!(seen[0].1, Sha384::digest(b"block").to_vec());
        assert_eq!(seen[0].1.len(), 48);
    }

    #[test]
    fn panicking_consumer_is_isolated() {
        let (service, _) = service(false);
        let calls = Arc::new(AtomicU64::new(0));
        service.register_consumer(Arc::new(|_: &[u8], _: &[u8]| panic!("consumer failure")));
        let counter = calls.clone();
        service.register_consumer(Arc::new(move |_: &[u8], _: &[u8]| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        service.notify_signature(b"block", b"signature");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unregistered_consumer_is_not_called() {
        let (service, _) = service(false);
        let calls = Arc::new(AtomicU64::new(0));
        let counter = calls.clone();
        let id = service.register_consumer(Arc::new(move |_: &[u8], _: &[u8]| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(service.consumer_count(), 1);
        assert!(service.unregister_consumer(id));
        assert!(!service.unregister_consumer(id));

        service.request_ledger_signature(b"block");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn shares_of_the_active_roster_sign() {
        let (service, submissions) = service(true);
        let roster = Roster::new(
            (1..=2)
                .map(|node| RosterEntry {
                    node_id: NodeId(node),
                    weight: 1,
                    tss_encryption_key: vec![],
                })
                .collect(),
        );
        let hash = service.manager.set_active_roster(roster).unwrap();
        let public_shares = service.manager.public_shares(hash).unwrap();

        service.request_ledger_signature(b"block");
        let signatures = submissions.signatures.lock();
        assert_eq!(signatures.len(), public_shares.len());
        for (transaction, share) in signatures.iter().zip(public_shares.iter()) {
            assert_eq!(transaction.roster_hash, hash);
            assert_eq!(transaction.share_index, share.share_id);
            let signature = PairingSignature::from_bytes(&transaction.share_signature).unwrap();
            assert!(signature.verify_signature(&share.key, b"block").unwrap());
        }
    }

    #[test]
    fn thread_executor_runs_the_task() {
        let (sender, receiver) = std::sync::mpsc::channel();
        ThreadExecutor.execute(Box::new(move || sender.send(7).unwrap()));
        assert_eq!(receiver.recv().unwrap(), 7);
    }
}
