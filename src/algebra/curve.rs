// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

use std::sync::Arc;

use crate::adapter::{Bls12381Adapter, CurveAdapter, GroupId};
use crate::algebra::{BilinearPairing, Field, Group};
use crate::Error;

/// The largest curve id that fits in a schema id byte.
pub const MAX_CURVE_ID: u8 = 0x7f;

/// Identifies a pairing-friendly curve by its seven-bit id.
///
/// A `Curve` is plain data; the arithmetic behind it is resolved on demand
/// with [`Curve::adapter`], so schemas naming curves this build cannot compute
/// on can still be parsed and compared.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Curve(u8);

impl Curve {
    /// BLS12-381.
    pub const BLS12_381: Curve = Curve(0);

    /// Checks that `id` fits in seven bits.
    pub fn new(id: u8) -> Result<Curve, Error> {
        if id > MAX_CURVE_ID {
            return Err(Error::InvalidCurveId(id));
        }
        Ok(Curve(id))
    }

    pub(crate) fn from_masked_id(id: u8) -> Curve {
        Curve(id & MAX_CURVE_ID)
    }

    /// The curve id.
    pub fn id(&self) -> u8 {
        self.0
    }

    /// The native implementation of this curve.
    pub fn adapter(&self) -> Result<Arc<dyn CurveAdapter>, Error> {
        match *self {
            Curve::BLS12_381 => Ok(Arc::new(Bls12381Adapter)),
            Curve(id) => Err(Error::UnsupportedCurve(id)),
        }
    }

    /// The scalar field of the curve.
    pub fn field(&self) -> Result<Field, Error> {
        Ok(Field::new(self.adapter()?))
    }

    /// One of the curve's source groups.
    pub fn group(&self, id: GroupId) -> Result<Group, Error> {
        Ok(Group::new(self.adapter()?, id))
    }

    /// The curve's pairing.
    pub fn pairing(&self) -> Result<BilinearPairing, Error> {
        Ok(BilinearPairing::new(self.adapter()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_ids_are_seven_bits() {
        assert_eq!(Curve::new(127).map(|c| c.id()), Ok(127));
        assert_eq!(Curve::new(128), Err(Error::InvalidCurveId(128)));
    }

    #[test]
    fn unknown_curves_do_not_resolve() {
        let curve = Curve::new(5).unwrap();
        assert_eq!(curve.field().err(), Some(Error::UnsupportedCurve(5)));
        assert!(Curve::BLS12_381.field().is_ok());
    }
}
