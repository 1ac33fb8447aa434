// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

//! Value-semantics field, group and pairing wrappers over a [`CurveAdapter`].
//!
//! Every operation validates buffer sizes and operand agreement, allocates the
//! output buffer, and delegates the arithmetic to the adapter. Adapter status
//! codes become typed [`Error`]s; no partial output is ever returned.
//!
//! [`CurveAdapter`]: crate::adapter::CurveAdapter

mod curve;
mod field;
mod group;
mod pairing;

pub use curve::Curve;
pub use field::{Field, FieldElement};
pub use group::{Group, GroupElement};
pub use pairing::{BilinearPairing, PairingResult};

use crate::adapter::{CANNOT_INVERT, NOT_IN_CURVE, SUCCESS};
use crate::Error;

/// Converts an adapter status into a `Result`.
pub(crate) fn check(status: i32) -> Result<(), Error> {
    match status {
        SUCCESS => Ok(()),
        CANNOT_INVERT => Err(Error::CannotInvert),
        NOT_IN_CURVE => Err(Error::NotInCurve),
        status => Err(Error::Algebra { status }),
    }
}
