// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

//! The boundary to a native pairing-friendly curve implementation.
//!
//! Every operation reads fixed-size byte buffers and writes its result into a
//! caller-allocated output buffer of exactly
//! [`CurveAdapter::field_elements_size`] or
//! [`CurveAdapter::group_elements_size`] bytes, returning an integer status.
//! Implementations perform no parameter validation of their own: sizes and
//! group agreement are checked by the [`algebra`](crate::algebra) layer before
//! any call is made. Implementations must be safe to call concurrently as long
//! as every call uses its own buffers.

mod bls12;

pub use bls12::Bls12381Adapter;

/// The operation succeeded.
pub const SUCCESS: i32 = 0;
/// Unspecified failure.
pub const GENERIC_FAILURE: i32 = -1;
/// An input buffer is not a canonical encoding.
pub const INVALID_ENCODING: i32 = -3;
/// A group element input is not on the curve.
pub const NOT_IN_CURVE: i32 = -4;
/// A field element has no inverse.
pub const CANNOT_INVERT: i32 = -5;

/// Number of random bytes consumed to draw one uniform field element.
pub const RANDOM_SEED_SIZE: usize = 64;

/// One of the two source groups of a bilinear pairing.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupId {
    /// The first source group.
    G1,
    /// The second source group.
    G2,
}

impl GroupId {
    /// The group paired against this one.
    pub fn opposite(self) -> GroupId {
        match self {
            GroupId::G1 => GroupId::G2,
            GroupId::G2 => GroupId::G1,
        }
    }
}

/// Byte-buffer interface to a native curve library.
pub trait CurveAdapter: Send + Sync {
    /// The seven-bit id of the curve this adapter implements.
    fn curve_id(&self) -> u8;
    /// Size in bytes of a serialized field element.
    fn field_elements_size(&self) -> usize;
    /// Size in bytes of a serialized element of `group`.
    fn group_elements_size(&self, group: GroupId) -> usize;

    /// Writes the additive identity of the field.
    fn field_zero(&self, output: &mut [u8]) -> i32;
    /// Writes the multiplicative identity of the field.
    fn field_one(&self, output: &mut [u8]) -> i32;
    /// Writes `value` as a field element.
    fn field_from_u64(&self, value: u64, output: &mut [u8]) -> i32;
    /// Reduces [`RANDOM_SEED_SIZE`] uniform bytes into a uniform field element.
    fn field_from_random_seed(&self, seed: &[u8], output: &mut [u8]) -> i32;
    /// Checks that `input` is a canonical field element and copies it.
    fn field_from_bytes(&self, input: &[u8], output: &mut [u8]) -> i32;
    /// `a + b`
    fn field_add(&self, a: &[u8], b: &[u8], output: &mut [u8]) -> i32;
    /// `a - b`
    fn field_subtract(&self, a: &[u8], b: &[u8], output: &mut [u8]) -> i32;
    /// `a * b`
    fn field_multiply(&self, a: &[u8], b: &[u8], output: &mut [u8]) -> i32;
    /// `base ^ exponent`
    fn field_pow(&self, base: &[u8], exponent: u64, output: &mut [u8]) -> i32;
    /// `a ^ -1`, or [`CANNOT_INVERT`] for zero.
    fn field_inverse(&self, a: &[u8], output: &mut [u8]) -> i32;

    /// Writes the fixed generator of `group`.
    fn group_generator(&self, group: GroupId, output: &mut [u8]) -> i32;
    /// Writes the identity of `group`.
    fn group_zero(&self, group: GroupId, output: &mut [u8]) -> i32;
    /// Checks that `input` encodes a point of `group` and copies it.
    fn group_from_bytes(&self, group: GroupId, input: &[u8], output: &mut [u8]) -> i32;
    /// Hashes arbitrary bytes onto `group`.
    fn group_from_hash(&self, group: GroupId, input: &[u8], output: &mut [u8]) -> i32;
    /// `a + b`
    fn group_add(&self, group: GroupId, a: &[u8], b: &[u8], output: &mut [u8]) -> i32;
    /// `a - b`
    fn group_subtract(&self, group: GroupId, a: &[u8], b: &[u8], output: &mut [u8]) -> i32;
    /// `point * scalar`
    fn group_scalar_mul(
        &self,
        group: GroupId,
        point: &[u8],
        scalar: &[u8],
        output: &mut [u8],
    ) -> i32;

    /// Element-wise `points[i] * scalars[i]`; all three slices have the same length.
    fn group_batch_scalar_mul(
        &self,
        group: GroupId,
        points: &[&[u8]],
        scalars: &[&[u8]],
        outputs: &mut [Vec<u8>],
    ) -> i32 {
        for ((point, scalar), output) in points.iter().zip(scalars).zip(outputs.iter_mut()) {
            let status = self.group_scalar_mul(group, point, scalar, output);
            if status != SUCCESS {
                return status;
            }
        }
        SUCCESS
    }

    /// Element-wise `a[i] + b[i]`; all three slices have the same length.
    fn group_batch_add(
        &self,
        group: GroupId,
        a: &[&[u8]],
        b: &[&[u8]],
        outputs: &mut [Vec<u8>],
    ) -> i32 {
        for ((a, b), output) in a.iter().zip(b).zip(outputs.iter_mut()) {
            let status = self.group_add(group, a, b, output);
            if status != SUCCESS {
                return status;
            }
        }
        SUCCESS
    }

    /// Writes whether `e(a_g1, a_g2) == e(b_g1, b_g2)` into `result`.
    fn pairing_equals(
        &self,
        a_g1: &[u8],
        a_g2: &[u8],
        b_g1: &[u8],
        b_g2: &[u8],
        result: &mut bool,
    ) -> i32;
}
