// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

use crate::algebra::{FieldElement, GroupElement};
use crate::Error;

/// The encryption of one secret chunk, one group element per plaintext byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CipherText {
    elements: Vec<GroupElement>,
}

impl CipherText {
    /// Fails on an empty sequence.
    pub fn new(elements: Vec<GroupElement>) -> Result<CipherText, Error> {
        if elements.is_empty() {
            return Err(Error::EmptyInput("cipher text"));
        }
        Ok(CipherText { elements })
    }

    /// Number of encrypted bytes.
    pub fn size(&self) -> usize {
        self.elements.len()
    }

    /// The per-byte ciphertext points.
    pub fn elements(&self) -> &[GroupElement] {
        &self.elements
    }
}

/// Evaluates `points` as a polynomial at `base`: `sum(points[i] * base^i)`.
fn evaluate(points: &[GroupElement], base: &FieldElement) -> Result<GroupElement, Error> {
    let (last, rest) = points
        .split_last()
        .ok_or(Error::EmptyInput("cipher text"))?;
    rest.iter()
        .rev()
        .try_fold(last.clone(), |acc, point| acc.multiply(base)?.add(point))
}

/// The ciphertexts of every share, sharing one randomness sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CiphertextTable {
    shared_randomness: Vec<GroupElement>,
    share_ciphertexts: Vec<CipherText>,
}

impl CiphertextTable {
    /// Every ciphertext must be as long as the randomness.
    pub fn new(
        shared_randomness: Vec<GroupElement>,
        share_ciphertexts: Vec<CipherText>,
    ) -> Result<CiphertextTable, Error> {
        if shared_randomness.is_empty() {
            return Err(Error::EmptyInput("shared randomness"));
        }
        if let Some(mismatch) = share_ciphertexts
            .iter()
            .find(|ct| ct.size() != shared_randomness.len())
        {
            return Err(Error::LengthMismatch {
                expected: shared_randomness.len(),
                actual: mismatch.size(),
            });
        }
        Ok(CiphertextTable {
            shared_randomness,
            share_ciphertexts,
        })
    }

    /// `generator * r_i` for every plaintext position.
    pub fn shared_randomness(&self) -> &[GroupElement] {
        &self.shared_randomness
    }

    /// Ciphertexts ordered by share id.
    pub fn share_ciphertexts(&self) -> &[CipherText] {
        &self.share_ciphertexts
    }

    /// Number of shares in the table.
    pub fn share_count(&self) -> usize {
        self.share_ciphertexts.len()
    }

    /// The ciphertext for the 1-based `share_id`.
    pub fn get_for_share_id(&self, share_id: u32) -> Result<&CipherText, Error> {
        share_index(share_id, self.share_count())
            .map(|index| &self.share_ciphertexts[index])
    }

    /// Compresses the table by evaluating every sequence as a polynomial at
    /// `base`.
    pub fn combine(&self, base: &FieldElement) -> Result<CombinedCiphertext, Error> {
        let randomness = evaluate(&self.shared_randomness, base)?;
        let values = self
            .share_ciphertexts
            .iter()
            .map(|ct| evaluate(&ct.elements, base))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CombinedCiphertext { randomness, values })
    }
}

/// A [`CiphertextTable`] compressed to one point per sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombinedCiphertext {
    randomness: GroupElement,
    values: Vec<GroupElement>,
}

impl CombinedCiphertext {
    /// The combined shared randomness.
    pub fn randomness(&self) -> &GroupElement {
        &self.randomness
    }

    /// Combined ciphertexts ordered by share id.
    pub fn values(&self) -> &[GroupElement] {
        &self.values
    }

    /// The combined ciphertext for the 1-based `share_id`.
    pub fn get_for_share_id(&self, share_id: u32) -> Result<&GroupElement, Error> {
        share_index(share_id, self.values.len()).map(|index| &self.values[index])
    }
}

fn share_index(share_id: u32, share_count: usize) -> Result<usize, Error> {
    let index = (share_id as usize).wrapping_sub(1);
    if share_id == 0 || index >= share_count {
        return Err(Error::ShareIdOutOfRange {
            share_id,
            share_count,
        });
    }
    Ok(index)
}
