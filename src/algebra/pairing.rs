// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

use std::sync::Arc;

use crate::adapter::{CurveAdapter, GroupId};
use crate::algebra::{check, GroupElement};
use crate::Error;

/// The bilinear map `e: G1 x G2 -> GT` of a curve.
#[derive(Clone)]
pub struct BilinearPairing {
    adapter: Arc<dyn CurveAdapter>,
}

impl BilinearPairing {
    /// The pairing computed through `adapter`.
    pub fn new(adapter: Arc<dyn CurveAdapter>) -> BilinearPairing {
        BilinearPairing { adapter }
    }

    /// The (lazily evaluated) pairing of two elements, one from each group,
    /// given in either order.
    pub fn pairing_between(
        &self,
        a: &GroupElement,
        b: &GroupElement,
    ) -> Result<PairingResult, Error> {
        let curve_id = self.adapter.curve_id();
        if a.group().curve_id() != curve_id || b.group().curve_id() != curve_id {
            return Err(Error::CurveMismatch);
        }
        let (g1, g2) = match (a.group().id(), b.group().id()) {
            (GroupId::G1, GroupId::G2) => (a, b),
            (GroupId::G2, GroupId::G1) => (b, a),
            _ => return Err(Error::GroupMismatch),
        };
        Ok(PairingResult {
            adapter: self.adapter.clone(),
            g1: g1.to_bytes(),
            g2: g2.to_bytes(),
        })
    }
}

/// An element of the target group, represented by its two preimages.
#[derive(Clone)]
pub struct PairingResult {
    adapter: Arc<dyn CurveAdapter>,
    g1: Vec<u8>,
    g2: Vec<u8>,
}

impl PairingResult {
    /// Whether both pairings evaluate to the same target group element.
    pub fn is_equal_to(&self, other: &PairingResult) -> Result<bool, Error> {
        if self.adapter.curve_id() != other.adapter.curve_id() {
            return Err(Error::CurveMismatch);
        }
        let mut equal = false;
        check(
            self.adapter
                .pairing_equals(&self.g1, &self.g2, &other.g1, &other.g2, &mut equal),
        )?;
        Ok(equal)
    }
}
