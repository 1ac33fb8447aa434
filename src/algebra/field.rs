// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::adapter::{CurveAdapter, RANDOM_SEED_SIZE};
use crate::algebra::check;
use crate::Error;

/// The scalar field of a pairing-friendly curve.
#[derive(Clone)]
pub struct Field {
    adapter: Arc<dyn CurveAdapter>,
}

impl Field {
    /// A field computing through `adapter`.
    pub fn new(adapter: Arc<dyn CurveAdapter>) -> Field {
        Field { adapter }
    }

    /// Id of the curve this field belongs to.
    pub fn curve_id(&self) -> u8 {
        self.adapter.curve_id()
    }

    /// Size in bytes of a serialized element.
    pub fn element_size(&self) -> usize {
        self.adapter.field_elements_size()
    }

    pub(crate) fn adapter(&self) -> &dyn CurveAdapter {
        self.adapter.as_ref()
    }

    fn compute<F>(&self, op: F) -> Result<FieldElement, Error>
    where
        F: FnOnce(&dyn CurveAdapter, &mut [u8]) -> i32,
    {
        let mut bytes = vec![0u8; self.element_size()];
        check(op(self.adapter(), &mut bytes))?;
        Ok(FieldElement {
            field: self.clone(),
            bytes,
        })
    }

    /// The additive identity.
    pub fn zero(&self) -> Result<FieldElement, Error> {
        self.compute(|adapter, out| adapter.field_zero(out))
    }

    /// The multiplicative identity.
    pub fn one(&self) -> Result<FieldElement, Error> {
        self.compute(|adapter, out| adapter.field_one(out))
    }

    /// `value` embedded in the field.
    pub fn element_from_u64(&self, value: u64) -> Result<FieldElement, Error> {
        self.compute(|adapter, out| adapter.field_from_u64(value, out))
    }

    /// A uniformly random element drawn from `rng`.
    pub fn random_element<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<FieldElement, Error> {
        let mut seed = [0u8; RANDOM_SEED_SIZE];
        rng.fill_bytes(&mut seed);
        let element = self.compute(|adapter, out| adapter.field_from_random_seed(&seed, out));
        seed.zeroize();
        element
    }

    /// Parses a canonical element encoding.
    pub fn element_from_bytes(&self, bytes: &[u8]) -> Result<FieldElement, Error> {
        if bytes.len() != self.element_size() {
            return Err(Error::InvalidElementSize {
                expected: self.element_size(),
                actual: bytes.len(),
            });
        }
        self.compute(|adapter, out| adapter.field_from_bytes(bytes, out))
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.curve_id() == other.curve_id()
    }
}

impl Eq for Field {}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("curve_id", &self.curve_id())
            .finish()
    }
}

/// An element of a curve's scalar field, held in its serialized form.
#[derive(Clone)]
pub struct FieldElement {
    field: Field,
    bytes: Vec<u8>,
}

impl FieldElement {
    /// The field this element belongs to.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// The serialized element.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// A copy of the serialized element.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    fn binary<F>(&self, other: &FieldElement, op: F) -> Result<FieldElement, Error>
    where
        F: FnOnce(&dyn CurveAdapter, &[u8], &[u8], &mut [u8]) -> i32,
    {
        if self.field != other.field {
            return Err(Error::CurveMismatch);
        }
        self.field
            .compute(|adapter, out| op(adapter, &self.bytes, &other.bytes, out))
    }

    /// `self + other`
    pub fn add(&self, other: &FieldElement) -> Result<FieldElement, Error> {
        self.binary(other, |adapter, a, b, out| adapter.field_add(a, b, out))
    }

    /// `self - other`
    pub fn subtract(&self, other: &FieldElement) -> Result<FieldElement, Error> {
        self.binary(other, |adapter, a, b, out| adapter.field_subtract(a, b, out))
    }

    /// `self * other`
    pub fn multiply(&self, other: &FieldElement) -> Result<FieldElement, Error> {
        self.binary(other, |adapter, a, b, out| adapter.field_multiply(a, b, out))
    }

    /// `self ^ exponent`
    pub fn pow(&self, exponent: u64) -> Result<FieldElement, Error> {
        self.field
            .compute(|adapter, out| adapter.field_pow(&self.bytes, exponent, out))
    }

    /// The multiplicative inverse; fails with [`Error::CannotInvert`] for zero.
    pub fn inverse(&self) -> Result<FieldElement, Error> {
        self.field
            .compute(|adapter, out| adapter.field_inverse(&self.bytes, out))
    }

    /// `0 - self`
    pub fn negate(&self) -> Result<FieldElement, Error> {
        self.field.zero()?.subtract(self)
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.bytes == other.bytes
    }
}

impl Eq for FieldElement {}

impl Hash for FieldElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.field.curve_id().hash(state);
        self.bytes.hash(state);
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldElement")
            .field(&hex::encode(&self.bytes))
            .finish()
    }
}

impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        self.bytes.zeroize();
    }
}
