// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::adapter::{CurveAdapter, GroupId};
use crate::algebra::{check, FieldElement};
use crate::Error;

/// One of the two source groups of a curve's pairing.
#[derive(Clone)]
pub struct Group {
    adapter: Arc<dyn CurveAdapter>,
    id: GroupId,
}

impl Group {
    /// Group `id` computed through `adapter`.
    pub fn new(adapter: Arc<dyn CurveAdapter>, id: GroupId) -> Group {
        Group { adapter, id }
    }

    /// Which source group this is.
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Id of the curve this group belongs to.
    pub fn curve_id(&self) -> u8 {
        self.adapter.curve_id()
    }

    /// Size in bytes of a serialized element.
    pub fn element_size(&self) -> usize {
        self.adapter.group_elements_size(self.id)
    }

    pub(crate) fn adapter(&self) -> &dyn CurveAdapter {
        self.adapter.as_ref()
    }

    fn compute<F>(&self, op: F) -> Result<GroupElement, Error>
    where
        F: FnOnce(&dyn CurveAdapter, GroupId, &mut [u8]) -> i32,
    {
        let mut bytes = vec![0u8; self.element_size()];
        check(op(self.adapter(), self.id, &mut bytes))?;
        Ok(GroupElement {
            group: self.clone(),
            bytes,
        })
    }

    /// The fixed generator.
    pub fn generator(&self) -> Result<GroupElement, Error> {
        self.compute(|adapter, id, out| adapter.group_generator(id, out))
    }

    /// The identity element.
    pub fn zero(&self) -> Result<GroupElement, Error> {
        self.compute(|adapter, id, out| adapter.group_zero(id, out))
    }

    /// Parses an element encoding, rejecting points off the curve.
    pub fn element_from_bytes(&self, bytes: &[u8]) -> Result<GroupElement, Error> {
        if bytes.len() != self.element_size() {
            return Err(Error::InvalidElementSize {
                expected: self.element_size(),
                actual: bytes.len(),
            });
        }
        self.compute(|adapter, id, out| adapter.group_from_bytes(id, bytes, out))
    }

    /// Deterministically hashes `input` onto the group.
    pub fn element_from_hash(&self, input: &[u8]) -> Result<GroupElement, Error> {
        self.compute(|adapter, id, out| adapter.group_from_hash(id, input, out))
    }

    fn check_member(&self, element: &GroupElement) -> Result<(), Error> {
        if element.group.curve_id() != self.curve_id() {
            return Err(Error::CurveMismatch);
        }
        if element.group.id != self.id {
            return Err(Error::GroupMismatch);
        }
        Ok(())
    }

    fn batch<F>(&self, len: usize, op: F) -> Result<Vec<GroupElement>, Error>
    where
        F: FnOnce(&dyn CurveAdapter, GroupId, &mut [Vec<u8>]) -> i32,
    {
        let mut outputs = vec![vec![0u8; self.element_size()]; len];
        check(op(self.adapter(), self.id, &mut outputs))?;
        Ok(outputs
            .into_iter()
            .map(|bytes| GroupElement {
                group: self.clone(),
                bytes,
            })
            .collect())
    }

    /// Element-wise `points[i] * scalars[i]` in one adapter call.
    pub fn batch_scalar_mul(
        &self,
        points: &[GroupElement],
        scalars: &[FieldElement],
    ) -> Result<Vec<GroupElement>, Error> {
        if points.len() != scalars.len() {
            return Err(Error::LengthMismatch {
                expected: points.len(),
                actual: scalars.len(),
            });
        }
        for point in points {
            self.check_member(point)?;
        }
        if scalars.iter().any(|s| s.field().curve_id() != self.curve_id()) {
            return Err(Error::CurveMismatch);
        }
        let points: Vec<&[u8]> = points.iter().map(|p| p.as_bytes()).collect();
        let scalars: Vec<&[u8]> = scalars.iter().map(|s| s.as_bytes()).collect();
        self.batch(points.len(), |adapter, id, out| {
            adapter.group_batch_scalar_mul(id, &points, &scalars, out)
        })
    }

    /// Element-wise `a[i] + b[i]` in one adapter call.
    pub fn batch_add(
        &self,
        a: &[GroupElement],
        b: &[GroupElement],
    ) -> Result<Vec<GroupElement>, Error> {
        if a.len() != b.len() {
            return Err(Error::LengthMismatch {
                expected: a.len(),
                actual: b.len(),
            });
        }
        for element in a.iter().chain(b) {
            self.check_member(element)?;
        }
        let a: Vec<&[u8]> = a.iter().map(|e| e.as_bytes()).collect();
        let b: Vec<&[u8]> = b.iter().map(|e| e.as_bytes()).collect();
        self.batch(a.len(), |adapter, id, out| {
            adapter.group_batch_add(id, &a, &b, out)
        })
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.curve_id() == other.curve_id() && self.id == other.id
    }
}

impl Eq for Group {}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("curve_id", &self.curve_id())
            .field("id", &self.id)
            .finish()
    }
}

/// A point of one of the source groups, held in its serialized form.
#[derive(Clone)]
pub struct GroupElement {
    group: Group,
    bytes: Vec<u8>,
}

impl GroupElement {
    /// The group this element belongs to.
    pub fn group(&self) -> &Group {
        &self.group
    }

    /// The serialized element.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// A copy of the serialized element.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// `self + other`
    pub fn add(&self, other: &GroupElement) -> Result<GroupElement, Error> {
        self.group.check_member(other)?;
        self.group
            .compute(|adapter, id, out| adapter.group_add(id, &self.bytes, &other.bytes, out))
    }

    /// `self - other`
    pub fn subtract(&self, other: &GroupElement) -> Result<GroupElement, Error> {
        self.group.check_member(other)?;
        self.group.compute(|adapter, id, out| {
            adapter.group_subtract(id, &self.bytes, &other.bytes, out)
        })
    }

    /// `self * scalar`
    pub fn multiply(&self, scalar: &FieldElement) -> Result<GroupElement, Error> {
        if scalar.field().curve_id() != self.group.curve_id() {
            return Err(Error::CurveMismatch);
        }
        self.group.compute(|adapter, id, out| {
            adapter.group_scalar_mul(id, &self.bytes, scalar.as_bytes(), out)
        })
    }
}

impl PartialEq for GroupElement {
    fn eq(&self, other: &Self) -> bool {
        self.group == other.group && self.bytes == other.bytes
    }
}

impl Eq for GroupElement {}

impl Hash for GroupElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.group.curve_id().hash(state);
        self.group.id.hash(state);
        self.bytes.hash(state);
    }
}

impl fmt::Debug for GroupElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupElement")
            .field("group", &self.group.id)
            .field("bytes", &hex::encode(&self.bytes))
            .finish()
    }
}
