//! Serialization rules for transaction fields.
//!
//! Transactions derive their serde impls. Roster hashes are written by hand:
//! as lowercase hex in human readable formats and as 32 raw bytes otherwise.

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};

use super::*;

use std::fmt;

impl Serialize for RosterHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&hex::encode(self.as_bytes()))
        } else {
            serializer.serialize_bytes(self.as_bytes())
        }
    }
}

struct RosterHashVisitor;

impl RosterHashVisitor {
    fn from_slice<E: de::Error>(bytes: &[u8]) -> Result<RosterHash, E> {
        let mut hash = [0u8; 32];
        if bytes.len() != hash.len() {
            return Err(E::invalid_length(bytes.len(), &"32 bytes"));
        }
        hash.copy_from_slice(bytes);
        Ok(RosterHash(hash))
    }
}

impl<'de> Visitor<'de> for RosterHashVisitor {
    type Value = RosterHash;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a 32 byte roster hash")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let bytes = hex::decode(value)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))?;
        Self::from_slice(&bytes)
    }

    fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Self::from_slice(value)
    }

    // Formats without native byte strings hand them over as sequences.
    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let mut bytes = Vec::with_capacity(32);
        while let Some(byte) = seq.next_element::<u8>()? {
            bytes.push(byte);
        }
        Self::from_slice(&bytes)
    }
}

impl<'de> Deserialize<'de> for RosterHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            deserializer.deserialize_str(RosterHashVisitor)
        } else {
            deserializer.deserialize_bytes(RosterHashVisitor)
        }
    }
}
