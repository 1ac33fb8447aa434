// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

use std::collections::HashMap;

use crate::algebra::{FieldElement, GroupElement};
use crate::{Error, SignatureSchema};

/// Number of distinct plaintext values, one per byte value.
pub const DOMAIN_SIZE: u64 = 256;

/// Maps each byte value to the field element it is encrypted as.
#[derive(Clone, Debug)]
pub struct DirectTable {
    schema: SignatureSchema,
    elements: Vec<FieldElement>,
}

impl DirectTable {
    /// Byte `b` maps to the field element `b`.
    pub fn new(schema: SignatureSchema) -> Result<DirectTable, Error> {
        let field = schema.field()?;
        let elements = (0..DOMAIN_SIZE)
            .map(|value| field.element_from_u64(value))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DirectTable { schema, elements })
    }

    /// The schema the table was built for.
    pub fn schema(&self) -> SignatureSchema {
        self.schema
    }

    /// The substitute for `byte`.
    pub fn get(&self, byte: u8) -> Option<&FieldElement> {
        self.elements.get(byte as usize)
    }
}

/// Maps `generator * substitute(b)` in the public key group back to `b`.
#[derive(Clone, Debug)]
pub struct InverseTable {
    schema: SignatureSchema,
    lookup: HashMap<GroupElement, u8>,
}

impl InverseTable {
    /// Inverts `direct` through the public key group generator.
    pub fn new(direct: &DirectTable) -> Result<InverseTable, Error> {
        let group = direct.schema.public_key_group()?;
        let generators = vec![group.generator()?; direct.elements.len()];
        let points = group.batch_scalar_mul(&generators, &direct.elements)?;
        let lookup = points
            .into_iter()
            .enumerate()
            .map(|(byte, point)| (point, byte as u8))
            .collect();
        Ok(InverseTable {
            schema: direct.schema,
            lookup,
        })
    }

    /// The schema the table was built for.
    pub fn schema(&self) -> SignatureSchema {
        self.schema
    }

    /// The byte whose commitment is `point`, if any.
    pub fn get(&self, point: &GroupElement) -> Option<u8> {
        self.lookup.get(point).copied()
    }
}

/// Both substitution tables for one schema, computed once and shared.
#[derive(Clone, Debug)]
pub struct SubstitutionTables {
    direct: DirectTable,
    inverse: InverseTable,
}

impl SubstitutionTables {
    /// Builds the direct table and its inverse.
    pub fn new(schema: SignatureSchema) -> Result<SubstitutionTables, Error> {
        let direct = DirectTable::new(schema)?;
        let inverse = InverseTable::new(&direct)?;
        log::debug!(
            "built substitution tables for schema {:#04x}",
            schema.id_byte()
        );
        Ok(SubstitutionTables { direct, inverse })
    }

    /// Used when encrypting.
    pub fn direct(&self) -> &DirectTable {
        &self.direct
    }

    /// Used when decrypting.
    pub fn inverse(&self) -> &InverseTable {
        &self.inverse
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn tables_are_bijective() {
        let tables = SubstitutionTables::new(SignatureSchema::DEFAULT).unwrap();
        let group = SignatureSchema::DEFAULT.public_key_group().unwrap();
        let generator = group.generator().unwrap();

        let mut seen = HashSet::new();
        for byte in 0..=255u8 {
            let element = tables.direct().get(byte).unwrap();
            assert!(seen.insert(element.clone()));
            let point = generator.multiply(element).unwrap();
            assert_eq!(tables.inverse().get(&point), Some(byte));
        }

        let doubled = generator.add(&generator).unwrap();
        assert_eq!(tables.inverse().get(&doubled), Some(2));
        assert_eq!(tables.inverse().get(&group.zero().unwrap()), Some(0));
    }
}
