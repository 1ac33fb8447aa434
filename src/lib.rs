// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

#![deny(missing_docs)]

//! Pairing-based key material, ElGamal share transport and the roster keying
//! lifecycle behind threshold ledger signatures.
//!
//! The crate is layered bottom-up:
//!
//! - [`adapter`]: the byte-buffer contract of a native curve library, and a
//!   BLS12-381 implementation of it;
//! - [`algebra`]: field, group and pairing values over an adapter;
//! - [`SignatureSchema`] and the [`PairingPrivateKey`], [`PairingPublicKey`]
//!   and [`PairingSignature`] built on it;
//! - [`elgamal`]: byte-wise ElGamal encryption of share material to
//!   participants;
//! - [`roster`], [`store`], [`votes`] and [`manager`]: per-roster keying
//!   bookkeeping, message intake and the ledger id vote;
//! - [`state`]: startup reconciliation and candidate roster intake;
//! - [`ledger_signature`]: signature requests and their consumers.
//!
//! ```
//! use pairing_tss::{PairingPrivateKey, PairingPublicKey, SignatureSchema};
//!
//! let sk = PairingPrivateKey::create(SignatureSchema::DEFAULT, &mut rand::thread_rng())?;
//! let pk = PairingPublicKey::create(&sk)?;
//! let signature = sk.sign(b"ledger")?;
//! assert!(signature.verify_signature(&pk, b"ledger")?);
//! # Ok::<(), pairing_tss::Error>(())
//! ```

pub mod adapter;
pub mod algebra;
pub mod config;
pub mod elgamal;
mod error;
pub mod keygen;
pub mod ledger_signature;
pub mod manager;
pub mod messages;
mod private_key;
mod public_key;
pub mod roster;
mod schema;
mod signature;
pub mod state;
pub mod store;
pub mod votes;

pub use config::TssConfig;
pub use error::Error;
pub use manager::TssCryptographyManager;
pub use private_key::PairingPrivateKey;
pub use public_key::PairingPublicKey;
pub use schema::{GroupAssignment, SignatureSchema};
pub use signature::PairingSignature;
pub use state::TssStateManager;
