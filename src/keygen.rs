// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

//! Key material for a roster and the pluggable generator producing it.
//!
//! Keying a roster runs, per node:
//!
//! ```text
//! (1 generate private shares for the share ids this node owns)
//! (2 derive the matching public shares)
//! (3 encode share material for every other participant)
//!                     submit one message per owned share id
//! ---------------------------------------->
//! ```
//!
//! How shares are generated and encoded is up to the [`ShareGenerator`]; the
//! protocol around it only relies on the types here.

use crate::roster::{NodeId, ParticipantDirectory, RosterHash};
use crate::{Error, PairingPrivateKey, PairingPublicKey};

/// One of this node's private shares of a roster key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrivateShare {
    /// The 1-based share id.
    pub share_id: u32,
    /// The share's secret.
    pub key: PairingPrivateKey,
}

/// The public counterpart of a [`PrivateShare`].
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PublicShare {
    /// The 1-based share id.
    pub share_id: u32,
    /// The share's public key.
    pub key: PairingPublicKey,
}

impl PublicShare {
    /// Derives the public share of `share`.
    pub fn create(share: &PrivateShare) -> Result<PublicShare, Error> {
        Ok(PublicShare {
            share_id: share.share_id,
            key: PairingPublicKey::create(&share.key)?,
        })
    }
}

/// An outbound message payload for one of this node's share ids.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShareMessage {
    /// The share id the material comes from.
    pub share_index: u32,
    /// Encoded material, opaque to the protocol.
    pub payload: Vec<u8>,
}

/// Produces key material for a roster.
pub trait ShareGenerator: Send + Sync {
    /// Private shares for the share ids `self_id` owns in `directory`.
    fn generate_private_shares(
        &self,
        self_id: NodeId,
        roster_hash: RosterHash,
        directory: &ParticipantDirectory,
    ) -> Result<Vec<PrivateShare>, Error>;

    /// Public shares matching `private_shares`.
    fn generate_public_shares(
        &self,
        private_shares: &[PrivateShare],
    ) -> Result<Vec<PublicShare>, Error> {
        private_shares.iter().map(PublicShare::create).collect()
    }

    /// Message payloads carrying `private_shares` to the other participants.
    fn share_messages(
        &self,
        roster_hash: RosterHash,
        directory: &ParticipantDirectory,
        private_shares: &[PrivateShare],
    ) -> Result<Vec<ShareMessage>, Error>;
}
