// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

use std::convert::TryFrom;
use std::fmt;

use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::algebra::FieldElement;
use crate::{Error, PairingSignature, SignatureSchema};

/// A pairing private key: a secret scalar tagged with its schema.
///
/// The secret is wiped when the key is dropped and never shows up in `Debug`
/// output.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SerdeHelper"))]
#[cfg_attr(feature = "serde", serde(into = "SerdeHelper"))]
pub struct PairingPrivateKey {
    schema: SignatureSchema,
    secret_element: FieldElement,
}

impl PairingPrivateKey {
    /// Generate a new private key for `schema`.
    pub fn create<R: RngCore + CryptoRng>(
        schema: SignatureSchema,
        rng: &mut R,
    ) -> Result<PairingPrivateKey, Error> {
        let secret_element = schema.field()?.random_element(rng)?;
        Ok(PairingPrivateKey {
            schema,
            secret_element,
        })
    }

    /// Wraps an existing scalar, which must belong to the schema's field.
    pub fn from_element(
        schema: SignatureSchema,
        secret_element: FieldElement,
    ) -> Result<PairingPrivateKey, Error> {
        if secret_element.field().curve_id() != schema.curve().id() {
            return Err(Error::CurveMismatch);
        }
        Ok(PairingPrivateKey {
            schema,
            secret_element,
        })
    }

    /// The schema this key belongs to.
    pub fn schema(&self) -> SignatureSchema {
        self.schema
    }

    pub(crate) fn secret_element(&self) -> &FieldElement {
        &self.secret_element
    }

    /// Create a signature on `msg`: the message hashed into the signature
    /// group, multiplied by the secret.
    pub fn sign(&self, msg: &[u8]) -> Result<PairingSignature, Error> {
        let hashed = self.schema.signature_group()?.element_from_hash(msg)?;
        let signature_element = hashed.multiply(&self.secret_element)?;
        PairingSignature::from_element(self.schema, signature_element)
    }

    /// `[schema id byte] ++ secret scalar`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + self.secret_element.as_bytes().len());
        bytes.push(self.schema.id_byte());
        bytes.extend_from_slice(self.secret_element.as_bytes());
        bytes
    }

    /// Parses the output of [`PairingPrivateKey::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<PairingPrivateKey, Error> {
        let (id_byte, element) = bytes.split_first().ok_or(Error::MalformedPrivateKey)?;
        let schema = SignatureSchema::from_id_byte(*id_byte);
        let field = schema.field()?;
        if element.len() != field.element_size() {
            return Err(Error::MalformedPrivateKey);
        }
        Ok(PairingPrivateKey {
            schema,
            secret_element: field.element_from_bytes(element)?,
        })
    }
}

impl fmt::Debug for PairingPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairingPrivateKey")
            .field("schema", &self.schema)
            .field("secret_element", &"<redacted>")
            .finish()
    }
}

impl Drop for PairingPrivateKey {
    fn drop(&mut self) {
        self.secret_element.zeroize();
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct SerdeHelper(Vec<u8>);

impl TryFrom<SerdeHelper> for PairingPrivateKey {
    type Error = Error;

    fn try_from(helper: SerdeHelper) -> Result<Self, Self::Error> {
        PairingPrivateKey::from_bytes(&helper.0)
    }
}

impl From<PairingPrivateKey> for SerdeHelper {
    fn from(sk: PairingPrivateKey) -> Self {
        Self(sk.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use rand::thread_rng;

    use super::*;

    #[test]
    fn debug_output_hides_the_secret() {
        let sk = PairingPrivateKey::create(SignatureSchema::DEFAULT, &mut thread_rng()).unwrap();
        let secret = hex::encode(sk.secret_element().as_bytes());
        let debug = format!("{:?}", sk);
        assert!(!debug.contains(&secret));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn truncated_encodings_are_rejected() {
        let sk = PairingPrivateKey::create(SignatureSchema::DEFAULT, &mut thread_rng()).unwrap();
        let bytes = sk.to_bytes();
        assert_eq!(bytes.len(), 33);

        assert_eq!(
            PairingPrivateKey::from_bytes(&[]).err().expect("an error"),
            Error::MalformedPrivateKey
        );
        assert_eq!(
            PairingPrivateKey::from_bytes(&bytes[..32])
                .err()
                .expect("an error"),
            Error::MalformedPrivateKey
        );
    }

    #[test]
    fn unknown_curve_is_rejected() {
        let mut bytes = vec![0x05];
        bytes.extend_from_slice(&[0u8; 32]);
        assert_eq!(
            PairingPrivateKey::from_bytes(&bytes).err().expect("an error"),
            Error::UnsupportedCurve(5)
        );
    }
}
