// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

//! BLS12-381 through the `bls12_381` crate.
//!
//! Field elements are 32-byte little-endian scalars; group elements use the
//! 48-byte (G1) and 96-byte (G2) compressed encodings.

use std::convert::TryInto;

use bls12_381::hash_to_curve::{ExpandMsgXmd, HashToCurve};
use bls12_381::{pairing, G1Affine, G1Projective, G2Affine, G2Projective, Scalar};
use sha2::Sha256;

use super::{
    CurveAdapter, GroupId, CANNOT_INVERT, GENERIC_FAILURE, INVALID_ENCODING, NOT_IN_CURVE,
    RANDOM_SEED_SIZE, SUCCESS,
};

const CURVE_ID: u8 = 0;
const SCALAR_SIZE: usize = 32;
const G1_SIZE: usize = 48;
const G2_SIZE: usize = 96;

const G1_HASH_DST: &[u8] = b"BLS_SIG_BLS12381G1_XMD:SHA-256_SSWU_RO_NUL_";
const G2_HASH_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_NUL_";

/// [`CurveAdapter`] for BLS12-381, curve id `0`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Bls12381Adapter;

#[derive(Copy, Clone)]
enum Point {
    G1(G1Projective),
    G2(G2Projective),
}

fn write(bytes: &[u8], output: &mut [u8]) -> i32 {
    if bytes.len() != output.len() {
        return GENERIC_FAILURE;
    }
    output.copy_from_slice(bytes);
    SUCCESS
}

fn read_scalar(bytes: &[u8]) -> Result<Scalar, i32> {
    let repr: [u8; SCALAR_SIZE] = bytes.try_into().map_err(|_| GENERIC_FAILURE)?;
    Option::from(Scalar::from_bytes(&repr)).ok_or(INVALID_ENCODING)
}

fn write_scalar(scalar: Scalar, output: &mut [u8]) -> i32 {
    write(&scalar.to_bytes(), output)
}

fn read_point(group: GroupId, bytes: &[u8]) -> Result<Point, i32> {
    match group {
        GroupId::G1 => {
            let repr: [u8; G1_SIZE] = bytes.try_into().map_err(|_| GENERIC_FAILURE)?;
            Option::<G1Affine>::from(G1Affine::from_compressed(&repr))
                .map(|p| Point::G1(G1Projective::from(p)))
                .ok_or(NOT_IN_CURVE)
        }
        GroupId::G2 => {
            let repr: [u8; G2_SIZE] = bytes.try_into().map_err(|_| GENERIC_FAILURE)?;
            Option::<G2Affine>::from(G2Affine::from_compressed(&repr))
                .map(|p| Point::G2(G2Projective::from(p)))
                .ok_or(NOT_IN_CURVE)
        }
    }
}

fn write_point(point: Point, output: &mut [u8]) -> i32 {
    match point {
        Point::G1(p) => write(&G1Affine::from(p).to_compressed(), output),
        Point::G2(p) => write(&G2Affine::from(p).to_compressed(), output),
    }
}

fn scalar_op(a: &[u8], b: &[u8], output: &mut [u8], op: fn(Scalar, Scalar) -> Scalar) -> i32 {
    match (read_scalar(a), read_scalar(b)) {
        (Ok(a), Ok(b)) => write_scalar(op(a, b), output),
        (Err(status), _) | (_, Err(status)) => status,
    }
}

impl CurveAdapter for Bls12381Adapter {
    fn curve_id(&self) -> u8 {
        CURVE_ID
    }

    fn field_elements_size(&self) -> usize {
        SCALAR_SIZE
    }

    fn group_elements_size(&self, group: GroupId) -> usize {
        match group {
            GroupId::G1 => G1_SIZE,
            GroupId::G2 => G2_SIZE,
        }
    }

    fn field_zero(&self, output: &mut [u8]) -> i32 {
        write_scalar(Scalar::from(0u64), output)
    }

    fn field_one(&self, output: &mut [u8]) -> i32 {
        write_scalar(Scalar::from(1u64), output)
    }

    fn field_from_u64(&self, value: u64, output: &mut [u8]) -> i32 {
        write_scalar(Scalar::from(value), output)
    }

    fn field_from_random_seed(&self, seed: &[u8], output: &mut [u8]) -> i32 {
        let wide: [u8; RANDOM_SEED_SIZE] = match seed.try_into() {
            Ok(wide) => wide,
            Err(_) => return GENERIC_FAILURE,
        };
        write_scalar(Scalar::from_bytes_wide(&wide), output)
    }

    fn field_from_bytes(&self, input: &[u8], output: &mut [u8]) -> i32 {
        match read_scalar(input) {
            Ok(scalar) => write_scalar(scalar, output),
            Err(status) => status,
        }
    }

    fn field_add(&self, a: &[u8], b: &[u8], output: &mut [u8]) -> i32 {
        scalar_op(a, b, output, |a, b| a + b)
    }

    fn field_subtract(&self, a: &[u8], b: &[u8], output: &mut [u8]) -> i32 {
        scalar_op(a, b, output, |a, b| a - b)
    }

    fn field_multiply(&self, a: &[u8], b: &[u8], output: &mut [u8]) -> i32 {
        scalar_op(a, b, output, |a, b| a * b)
    }

    fn field_pow(&self, base: &[u8], exponent: u64, output: &mut [u8]) -> i32 {
        match read_scalar(base) {
            Ok(base) => write_scalar(base.pow_vartime(&[exponent, 0, 0, 0]), output),
            Err(status) => status,
        }
    }

    fn field_inverse(&self, a: &[u8], output: &mut [u8]) -> i32 {
        let a = match read_scalar(a) {
            Ok(a) => a,
            Err(status) => return status,
        };
        match Option::<Scalar>::from(a.invert()) {
            Some(inverse) => write_scalar(inverse, output),
            None => CANNOT_INVERT,
        }
    }

    fn group_generator(&self, group: GroupId, output: &mut [u8]) -> i32 {
        match group {
            GroupId::G1 => write_point(Point::G1(G1Projective::generator()), output),
            GroupId::G2 => write_point(Point::G2(G2Projective::generator()), output),
        }
    }

    fn group_zero(&self, group: GroupId, output: &mut [u8]) -> i32 {
        match group {
            GroupId::G1 => write_point(Point::G1(G1Projective::identity()), output),
            GroupId::G2 => write_point(Point::G2(G2Projective::identity()), output),
        }
    }

    fn group_from_bytes(&self, group: GroupId, input: &[u8], output: &mut [u8]) -> i32 {
        match read_point(group, input) {
            Ok(point) => write_point(point, output),
            Err(status) => status,
        }
    }

    fn group_from_hash(&self, group: GroupId, input: &[u8], output: &mut [u8]) -> i32 {
        let point = match group {
            GroupId::G1 => Point::G1(
                <G1Projective as HashToCurve<ExpandMsgXmd<Sha256>>>::hash_to_curve(
                    input,
                    G1_HASH_DST,
                ),
            ),
            GroupId::G2 => Point::G2(
                <G2Projective as HashToCurve<ExpandMsgXmd<Sha256>>>::hash_to_curve(
                    input,
                    G2_HASH_DST,
                ),
            ),
        };
        write_point(point, output)
    }

    fn group_add(&self, group: GroupId, a: &[u8], b: &[u8], output: &mut [u8]) -> i32 {
        match (read_point(group, a), read_point(group, b)) {
            (Ok(Point::G1(a)), Ok(Point::G1(b))) => write_point(Point::G1(a + b), output),
            (Ok(Point::G2(a)), Ok(Point::G2(b))) => write_point(Point::G2(a + b), output),
            (Err(status), _) | (_, Err(status)) => status,
            _ => GENERIC_FAILURE,
        }
    }

    fn group_subtract(&self, group: GroupId, a: &[u8], b: &[u8], output: &mut [u8]) -> i32 {
        match (read_point(group, a), read_point(group, b)) {
            (Ok(Point::G1(a)), Ok(Point::G1(b))) => write_point(Point::G1(a - b), output),
            (Ok(Point::G2(a)), Ok(Point::G2(b))) => write_point(Point::G2(a - b), output),
            (Err(status), _) | (_, Err(status)) => status,
            _ => GENERIC_FAILURE,
        }
    }

    fn group_scalar_mul(
        &self,
        group: GroupId,
        point: &[u8],
        scalar: &[u8],
        output: &mut [u8],
    ) -> i32 {
        match (read_point(group, point), read_scalar(scalar)) {
            (Ok(Point::G1(p)), Ok(s)) => write_point(Point::G1(p * s), output),
            (Ok(Point::G2(p)), Ok(s)) => write_point(Point::G2(p * s), output),
            (Err(status), _) | (_, Err(status)) => status,
        }
    }

    fn pairing_equals(
        &self,
        a_g1: &[u8],
        a_g2: &[u8],
        b_g1: &[u8],
        b_g2: &[u8],
        result: &mut bool,
    ) -> i32 {
        let points = (
            read_point(GroupId::G1, a_g1),
            read_point(GroupId::G2, a_g2),
            read_point(GroupId::G1, b_g1),
            read_point(GroupId::G2, b_g2),
        );
        match points {
            (Ok(Point::G1(a1)), Ok(Point::G2(a2)), Ok(Point::G1(b1)), Ok(Point::G2(b2))) => {
                let lhs = pairing(&G1Affine::from(a1), &G2Affine::from(a2));
                let rhs = pairing(&G1Affine::from(b1), &G2Affine::from(b2));
                *result = lhs == rhs;
                SUCCESS
            }
            (Err(status), _, _, _)
            | (_, Err(status), _, _)
            | (_, _, Err(status), _)
            | (_, _, _, Err(status)) => status,
            _ => GENERIC_FAILURE,
        }
    }
}
