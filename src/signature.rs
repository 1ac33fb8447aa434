// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

//! Pairing signatures

use std::convert::TryFrom;

use crate::algebra::GroupElement;
use crate::{Error, PairingPublicKey, SignatureSchema};

/// A pairing signature: the hashed message in the signature group, multiplied
/// by the signer's secret.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SerdeHelper"))]
#[cfg_attr(feature = "serde", serde(into = "SerdeHelper"))]
pub struct PairingSignature {
    schema: SignatureSchema,
    signature_element: GroupElement,
}

impl PairingSignature {
    /// Wraps a point, which must belong to the schema's signature group.
    pub fn from_element(
        schema: SignatureSchema,
        signature_element: GroupElement,
    ) -> Result<PairingSignature, Error> {
        if signature_element.group() != &schema.signature_group()? {
            return Err(Error::GroupMismatch);
        }
        Ok(PairingSignature {
            schema,
            signature_element,
        })
    }

    /// The schema this signature belongs to.
    pub fn schema(&self) -> SignatureSchema {
        self.schema
    }

    /// The signature point.
    pub fn signature_element(&self) -> &GroupElement {
        &self.signature_element
    }

    /// Checks `e(signature, generator) == e(H(msg), public key)`.
    ///
    /// Returns [`Error::GroupMismatch`] if `pk` was made under another schema.
    pub fn verify_signature(&self, pk: &PairingPublicKey, msg: &[u8]) -> Result<bool, Error> {
        if pk.schema() != self.schema {
            return Err(Error::GroupMismatch);
        }
        let pairing = self.schema.pairing()?;
        let generator = self.schema.public_key_group()?.generator()?;
        let hashed = self.schema.signature_group()?.element_from_hash(msg)?;

        let lhs = pairing.pairing_between(&self.signature_element, &generator)?;
        let rhs = pairing.pairing_between(&hashed, pk.key_element())?;
        lhs.is_equal_to(&rhs)
    }

    /// `[schema id byte] ++ compressed point`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + self.signature_element.as_bytes().len());
        bytes.push(self.schema.id_byte());
        bytes.extend_from_slice(self.signature_element.as_bytes());
        bytes
    }

    /// Parses the output of [`PairingSignature::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<PairingSignature, Error> {
        let (id_byte, element) = bytes.split_first().ok_or(Error::MalformedSignature)?;
        let schema = SignatureSchema::from_id_byte(*id_byte);
        let group = schema.signature_group()?;
        if element.len() != group.element_size() {
            return Err(Error::MalformedSignature);
        }
        Ok(PairingSignature {
            schema,
            signature_element: group.element_from_bytes(element)?,
        })
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct SerdeHelper(Vec<u8>);

impl TryFrom<SerdeHelper> for PairingSignature {
    type Error = Error;

    fn try_from(helper: SerdeHelper) -> Result<Self, Self::Error> {
        PairingSignature::from_bytes(&helper.0)
    }
}

impl From<PairingSignature> for SerdeHelper {
    fn from(sig: PairingSignature) -> Self {
        Self(sig.to_bytes())
    }
}
