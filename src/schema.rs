// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

//! Signature schemas: a curve plus the choice of which pairing group carries
//! signatures, packed into the one byte that prefixes every serialized key
//! and signature.

use std::convert::TryFrom;

use crate::adapter::GroupId;
use crate::algebra::{BilinearPairing, Curve, Field, Group};
use crate::Error;

/// Which source group holds signatures; public keys live in the other one.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupAssignment {
    /// Signatures in G1, public keys in G2.
    SigInG1 = 0,
    /// Signatures in G2, public keys in G1.
    SigInG2 = 1,
}

impl GroupAssignment {
    fn signature_group(self) -> GroupId {
        match self {
            GroupAssignment::SigInG1 => GroupId::G1,
            GroupAssignment::SigInG2 => GroupId::G2,
        }
    }
}

/// A curve and a group assignment.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8"))]
#[cfg_attr(feature = "serde", serde(into = "u8"))]
pub struct SignatureSchema {
    curve: Curve,
    group_assignment: GroupAssignment,
}

impl SignatureSchema {
    /// The schema used when nothing else is configured.
    pub const DEFAULT: SignatureSchema = SignatureSchema {
        curve: Curve::BLS12_381,
        group_assignment: GroupAssignment::SigInG1,
    };

    /// Combines a curve and a group assignment.
    pub fn create(curve: Curve, group_assignment: GroupAssignment) -> SignatureSchema {
        SignatureSchema {
            curve,
            group_assignment,
        }
    }

    /// Unpacks a schema id byte: the top bit is the group assignment and the
    /// low seven bits the curve id.
    pub fn from_id_byte(id_byte: u8) -> SignatureSchema {
        let group_assignment = if id_byte & 0x80 == 0 {
            GroupAssignment::SigInG1
        } else {
            GroupAssignment::SigInG2
        };
        SignatureSchema {
            // masked to seven bits, always in range
            curve: Curve::from_masked_id(id_byte & 0x7f),
            group_assignment,
        }
    }

    /// Packs this schema into its id byte.
    pub fn id_byte(&self) -> u8 {
        ((self.group_assignment as u8) << 7) | self.curve.id()
    }

    /// The curve.
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// The group assignment.
    pub fn group_assignment(&self) -> GroupAssignment {
        self.group_assignment
    }

    /// The group public keys live in.
    pub fn public_key_group(&self) -> Result<Group, Error> {
        self.curve
            .group(self.group_assignment.signature_group().opposite())
    }

    /// The group signatures live in.
    pub fn signature_group(&self) -> Result<Group, Error> {
        self.curve.group(self.group_assignment.signature_group())
    }

    /// The scalar field private keys live in.
    pub fn field(&self) -> Result<Field, Error> {
        self.curve.field()
    }

    /// The pairing used for verification.
    pub fn pairing(&self) -> Result<BilinearPairing, Error> {
        self.curve.pairing()
    }
}

impl Default for SignatureSchema {
    fn default() -> Self {
        SignatureSchema::DEFAULT
    }
}

impl From<SignatureSchema> for u8 {
    fn from(schema: SignatureSchema) -> u8 {
        schema.id_byte()
    }
}

impl TryFrom<u8> for SignatureSchema {
    type Error = Error;

    fn try_from(id_byte: u8) -> Result<Self, Self::Error> {
        Ok(SignatureSchema::from_id_byte(id_byte))
    }
}
