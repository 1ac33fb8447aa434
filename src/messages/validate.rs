//! Validation rules applied before a transaction touches roster state.

use super::constants::{MAX_TSS_MESSAGE_LEN, MIN_SHARE_INDEX};
use super::*;

use thiserror::Error;

/// A transaction that can check its own well-formedness.
pub trait Validate {
    /// Returns `self` if every rule holds.
    fn validate(&self) -> Result<&Self, MsgErr>;
}

fn check_payload(payload: &[u8], empty: MsgErr) -> Result<(), MsgErr> {
    if payload.is_empty() {
        return Err(empty);
    }
    if payload.len() > MAX_TSS_MESSAGE_LEN {
        return Err(MsgErr::MsgTooBig);
    }
    Ok(())
}

impl Validate for TssMessageTransaction {
    fn validate(&self) -> Result<&Self, MsgErr> {
        if self.share_index < MIN_SHARE_INDEX {
            return Err(MsgErr::InvalidShareIndex);
        }
        check_payload(&self.tss_message, MsgErr::EmptyTssMessage)?;
        Ok(self)
    }
}

impl Validate for TssVoteTransaction {
    fn validate(&self) -> Result<&Self, MsgErr> {
        // Votes are only counted for the node that submitted them.
        if self.voter != self.transaction_id.submitter {
            return Err(MsgErr::VoterMustBeSubmitter);
        }
        check_payload(&self.ledger_id, MsgErr::EmptyLedgerId)?;
        check_payload(&self.node_signature, MsgErr::EmptyNodeSignature)?;
        check_payload(&self.tss_vote, MsgErr::EmptyVote)?;
        Ok(self)
    }
}

impl Validate for TssShareSignatureTransaction {
    fn validate(&self) -> Result<&Self, MsgErr> {
        if self.share_index < MIN_SHARE_INDEX {
            return Err(MsgErr::InvalidShareIndex);
        }
        check_payload(&self.message_hash, MsgErr::EmptyMessageHash)?;
        check_payload(&self.share_signature, MsgErr::EmptyShareSignature)?;
        Ok(self)
    }
}

/// The error a transaction can produce if it fails validation.
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum MsgErr {
    /// Share indexes start at 1.
    #[error("share index must be at least 1")]
    InvalidShareIndex,
    /// The message payload is empty.
    #[error("the tss message is empty")]
    EmptyTssMessage,
    /// The voter is not the submitter.
    #[error("the voter of this transaction must be its submitter")]
    VoterMustBeSubmitter,
    /// The vote carries no ledger id.
    #[error("the ledger id is empty")]
    EmptyLedgerId,
    /// The vote is unsigned.
    #[error("the node signature is empty")]
    EmptyNodeSignature,
    /// The vote bit set is empty.
    #[error("the vote is empty")]
    EmptyVote,
    /// The signed hash is empty.
    #[error("the message hash is empty")]
    EmptyMessageHash,
    /// The share signature is empty.
    #[error("the share signature is empty")]
    EmptyShareSignature,
    /// A payload exceeds [`MAX_TSS_MESSAGE_LEN`].
    #[error("the message is too big")]
    MsgTooBig,
}
