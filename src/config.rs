// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

//! Node configuration.

use crate::{Error, SignatureSchema};

/// Default cap on the number of shares a single node is allocated.
pub const DEFAULT_MAX_SHARES_PER_NODE: u32 = 10;

/// Node configuration for roster keying.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TssConfig {
    /// Whether this node keys the active roster. Candidate rosters are keyed
    /// when this is off.
    pub key_active_roster: bool,
    /// The number of shares allocated to the node with the largest weight.
    pub max_shares_per_node: u32,
    /// Whether ledger signature requests are answered with private share
    /// signatures rather than a placeholder digest.
    pub sign_with_ledger_id: bool,
    /// The packed id byte of the schema this node signs with.
    pub signature_schema: u8,
}

impl TssConfig {
    /// The configured schema.
    pub fn schema(&self) -> Result<SignatureSchema, Error> {
        let schema = SignatureSchema::from_id_byte(self.signature_schema);
        // fail early on curves this build cannot compute on
        schema.curve().adapter()?;
        Ok(schema)
    }
}

impl Default for TssConfig {
    fn default() -> Self {
        TssConfig {
            key_active_roster: false,
            max_shares_per_node: DEFAULT_MAX_SHARES_PER_NODE,
            sign_with_ledger_id: false,
            signature_schema: SignatureSchema::DEFAULT.id_byte(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: TssConfig = serde_json::from_str(r#"{ "key_active_roster": true }"#).unwrap();
        assert!(config.key_active_roster);
        assert_eq!(config.max_shares_per_node, DEFAULT_MAX_SHARES_PER_NODE);
        assert!(!config.sign_with_ledger_id);
        assert_eq!(config.schema().unwrap(), SignatureSchema::DEFAULT);
    }

    #[test]
    fn unsupported_schema_is_rejected() {
        let config = TssConfig {
            signature_schema: 0x03,
            ..TssConfig::default()
        };
        assert_eq!(config.schema().err().expect("an error"), Error::UnsupportedCurve(3));
    }
}
