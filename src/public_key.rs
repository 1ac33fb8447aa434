// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

use std::convert::TryFrom;

use crate::algebra::GroupElement;
use crate::{Error, PairingPrivateKey, SignatureSchema};

/// A pairing public key: a point of the schema's public key group.
///
/// Ledger ids, public shares and TSS encryption keys are all public keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SerdeHelper"))]
#[cfg_attr(feature = "serde", serde(into = "SerdeHelper"))]
pub struct PairingPublicKey {
    schema: SignatureSchema,
    key_element: GroupElement,
}

impl PairingPublicKey {
    /// The public key of `sk`: the public key group's generator times the
    /// secret.
    pub fn create(sk: &PairingPrivateKey) -> Result<PairingPublicKey, Error> {
        let schema = sk.schema();
        let key_element = schema
            .public_key_group()?
            .generator()?
            .multiply(sk.secret_element())?;
        Ok(PairingPublicKey {
            schema,
            key_element,
        })
    }

    /// Wraps a point, which must belong to the schema's public key group.
    pub fn from_element(
        schema: SignatureSchema,
        key_element: GroupElement,
    ) -> Result<PairingPublicKey, Error> {
        if key_element.group() != &schema.public_key_group()? {
            return Err(Error::GroupMismatch);
        }
        Ok(PairingPublicKey {
            schema,
            key_element,
        })
    }

    /// The schema this key belongs to.
    pub fn schema(&self) -> SignatureSchema {
        self.schema
    }

    /// The public key point.
    pub fn key_element(&self) -> &GroupElement {
        &self.key_element
    }

    /// `[schema id byte] ++ compressed point`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + self.key_element.as_bytes().len());
        bytes.push(self.schema.id_byte());
        bytes.extend_from_slice(self.key_element.as_bytes());
        bytes
    }

    /// Parses the output of [`PairingPublicKey::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<PairingPublicKey, Error> {
        let (id_byte, element) = bytes.split_first().ok_or(Error::MalformedPublicKey)?;
        let schema = SignatureSchema::from_id_byte(*id_byte);
        let group = schema.public_key_group()?;
        if element.len() != group.element_size() {
            return Err(Error::MalformedPublicKey);
        }
        Ok(PairingPublicKey {
            schema,
            key_element: group.element_from_bytes(element)?,
        })
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct SerdeHelper(Vec<u8>);

impl TryFrom<SerdeHelper> for PairingPublicKey {
    type Error = Error;

    fn try_from(helper: SerdeHelper) -> Result<Self, Self::Error> {
        PairingPublicKey::from_bytes(&helper.0)
    }
}

impl From<PairingPublicKey> for SerdeHelper {
    fn from(pk: PairingPublicKey) -> Self {
        Self(pk.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use rand::thread_rng;

    use super::*;
    use crate::algebra::Curve;
    use crate::schema::GroupAssignment;

    #[test]
    fn key_sizes_follow_the_assignment() {
        let mut rng = thread_rng();
        let in_g2 = SignatureSchema::create(Curve::BLS12_381, GroupAssignment::SigInG1);
        let in_g1 = SignatureSchema::create(Curve::BLS12_381, GroupAssignment::SigInG2);

        let sk = PairingPrivateKey::create(in_g2, &mut rng).unwrap();
        assert_eq!(PairingPublicKey::create(&sk).unwrap().to_bytes().len(), 97);

        let sk = PairingPrivateKey::create(in_g1, &mut rng).unwrap();
        assert_eq!(PairingPublicKey::create(&sk).unwrap().to_bytes().len(), 49);
    }

    #[test]
    fn points_off_the_curve_are_rejected() {
        let mut bytes = vec![0u8];
        bytes.extend_from_slice(&[0x42; 96]);
        assert_eq!(
            PairingPublicKey::from_bytes(&bytes).err().expect("an error"),
            Error::NotInCurve
        );
    }

    #[test]
    fn element_from_the_wrong_group_is_rejected() {
        let schema = SignatureSchema::DEFAULT;
        let g1 = schema.signature_group().unwrap().generator().unwrap();
        assert_eq!(
            PairingPublicKey::from_element(schema, g1)
                .err()
                .expect("an error"),
            Error::GroupMismatch
        );
    }
}
