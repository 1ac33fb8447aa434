// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

use thiserror::Error;

use crate::messages::validate::MsgErr;
use crate::roster::{NodeId, RosterHash};

/// An error related to pairing key material, share transport or roster keying.
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum Error {
    /// The adapter could not invert a field element (it was zero).
    #[error("Field element cannot be inverted.")]
    CannotInvert,
    /// The adapter rejected a group element that is not on the curve.
    #[error("Group element is not on the curve.")]
    NotInCurve,
    /// The adapter returned some other failure status.
    #[error("Curve adapter failed with status {status}.")]
    Algebra {
        /// The raw status code.
        status: i32,
    },
    /// A curve id does not fit in the seven bits reserved for it.
    #[error("Curve id {0} is out of range 0..=127.")]
    InvalidCurveId(u8),
    /// No curve implementation is registered for the id.
    #[error("Curve id {0} has no implementation.")]
    UnsupportedCurve(u8),
    /// An element encoding has the wrong length for its curve.
    #[error("Expected an element encoding of {expected} bytes, got {actual}.")]
    InvalidElementSize {
        /// Size required by the curve.
        expected: usize,
        /// Size supplied.
        actual: usize,
    },
    /// Two sequences that must be parallel have different lengths.
    #[error("Length mismatch: expected {expected}, got {actual}.")]
    LengthMismatch {
        /// Required length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },
    /// A required sequence was empty.
    #[error("The {0} must not be empty.")]
    EmptyInput(&'static str),
    /// Operands belong to different curves.
    #[error("Operands belong to different curves.")]
    CurveMismatch,
    /// Operands belong to different groups, or a key does not match the schema.
    #[error("Operands belong to the wrong groups.")]
    GroupMismatch,
    /// A share id is outside `1..=share_count`.
    #[error("Share id {share_id} is outside 1..={share_count}.")]
    ShareIdOutOfRange {
        /// The requested share id.
        share_id: u32,
        /// The number of shares available.
        share_count: usize,
    },
    /// The direct substitution table has no entry for a byte.
    #[error("No substitution for byte {0}.")]
    MissingSubstitution(u8),
    /// The encoding of a private key was malformed.
    #[error("Malformed private key encoding.")]
    MalformedPrivateKey,
    /// The encoding of a public key was malformed.
    #[error("Malformed public key encoding.")]
    MalformedPublicKey,
    /// The encoding of a signature was malformed.
    #[error("Malformed signature encoding.")]
    MalformedSignature,
    /// The roster is already the active roster.
    #[error("Roster {0} is already active.")]
    RosterAlreadyActive(RosterHash),
    /// No bookkeeping exists for the roster.
    #[error("Roster {0} is unknown.")]
    UnknownRoster(RosterHash),
    /// Key material already exists for the roster.
    #[error("Roster {0} already has key material.")]
    AlreadyKeyed(RosterHash),
    /// A node has no registered TSS encryption key.
    #[error("Node {0} has no TSS encryption key.")]
    MissingEncryptionKey(NodeId),
    /// A different ledger id is already recorded for the roster.
    #[error("Roster {0} already has a different ledger id.")]
    LedgerIdAlreadySet(RosterHash),
    /// A persisted ledger id disagrees with the voted one.
    #[error("Persisted ledger id does not match the winning vote for roster {0}.")]
    LedgerIdMismatch(RosterHash),
    /// The share generator could not produce key material.
    #[error("Share generation failed.")]
    ShareGenerationFailed,
    /// A protocol transaction failed validation.
    #[error("Invalid protocol transaction: {0}")]
    InvalidMessage(#[from] MsgErr),
}
