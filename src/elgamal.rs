// -*- mode: rust; -*-
//
// This file is part of pairing-tss.
// See LICENSE for licensing information.

//! ElGamal transport of secret shares through public storage.
//!
//! A secret is encrypted byte by byte. Every byte `m` is first substituted by a
//! field element through a [`DirectTable`] and encrypted under the recipient's
//! public key `pk` with fresh randomness `r`:
//!
//! ```text
//! c = pk * r + g * substitute(m)
//! ```
//!
//! The recipient removes the mask with `c - (g * r) * sk` and recovers `m` by
//! looking the remaining commitment up in the [`InverseTable`], so no discrete
//! logarithm ever has to be solved. The same randomness is shared by every
//! recipient at a given byte position; its public image `g * r` is published
//! once per position in the [`CiphertextTable`].
//!
//! Decryption under the wrong key does not fail: the unmasked point simply has
//! no entry in the inverse table and [`read_cipher_text`] returns `None`.

mod ciphertext;
mod substitution;

pub use ciphertext::{CipherText, CiphertextTable, CombinedCiphertext};
pub use substitution::{DirectTable, InverseTable, SubstitutionTables, DOMAIN_SIZE};

use crate::algebra::{FieldElement, GroupElement};
use crate::{Error, PairingPrivateKey, PairingPublicKey, SignatureSchema};

/// Resolves the public key a share is encrypted to.
pub trait EncryptionKeyResolver {
    /// The encryption key of the owner of the 1-based `share_id`.
    fn get_for_share_id(&self, share_id: u32) -> Result<PairingPublicKey, Error>;
}

impl EncryptionKeyResolver for [PairingPublicKey] {
    fn get_for_share_id(&self, share_id: u32) -> Result<PairingPublicKey, Error> {
        share_id
            .checked_sub(1)
            .and_then(|index| self.get(index as usize))
            .cloned()
            .ok_or(Error::ShareIdOutOfRange {
                share_id,
                share_count: self.len(),
            })
    }
}

fn check_schema(expected: SignatureSchema, actual: SignatureSchema) -> Result<(), Error> {
    if expected.curve() != actual.curve() {
        return Err(Error::CurveMismatch);
    }
    if expected.group_assignment() != actual.group_assignment() {
        return Err(Error::GroupMismatch);
    }
    Ok(())
}

/// Encrypts `value` to `public_key`, one byte per element of `randomness`.
pub fn create_cipher_text(
    public_key: &PairingPublicKey,
    direct: &DirectTable,
    randomness: &[FieldElement],
    value: &[u8],
) -> Result<CipherText, Error> {
    if value.is_empty() {
        return Err(Error::EmptyInput("value"));
    }
    if randomness.len() != value.len() {
        return Err(Error::LengthMismatch {
            expected: value.len(),
            actual: randomness.len(),
        });
    }
    check_schema(public_key.schema(), direct.schema())?;

    let group = public_key.schema().public_key_group()?;
    let substitutes = value
        .iter()
        .map(|byte| direct.get(*byte).cloned().ok_or(Error::MissingSubstitution(*byte)))
        .collect::<Result<Vec<_>, _>>()?;

    let keys = vec![public_key.key_element().clone(); value.len()];
    let masks = group.batch_scalar_mul(&keys, randomness)?;
    let generators = vec![group.generator()?; value.len()];
    let commitments = group.batch_scalar_mul(&generators, &substitutes)?;

    CipherText::new(group.batch_add(&masks, &commitments)?)
}

/// Decrypts `cipher_text` with `private_key`.
///
/// `randomness` is the public image `g * r` of the randomness used to encrypt.
/// Returns `Ok(None)` when some unmasked byte has no inverse table entry, which
/// is what happens when the key or randomness does not match the ciphertext.
pub fn read_cipher_text(
    private_key: &PairingPrivateKey,
    randomness: &[GroupElement],
    inverse: &InverseTable,
    cipher_text: &CipherText,
) -> Result<Option<Vec<u8>>, Error> {
    if randomness.len() != cipher_text.size() {
        return Err(Error::LengthMismatch {
            expected: cipher_text.size(),
            actual: randomness.len(),
        });
    }
    check_schema(private_key.schema(), inverse.schema())?;

    let group = private_key.schema().public_key_group()?;
    let negated = private_key.secret_element().negate()?;
    let unmasks = group.batch_scalar_mul(randomness, &vec![negated; randomness.len()])?;
    let commitments = group.batch_add(cipher_text.elements(), &unmasks)?;

    Ok(commitments
        .iter()
        .map(|commitment| inverse.get(commitment))
        .collect())
}

/// Encrypts one secret per share id, all under the same `randomness`.
///
/// `secrets[i]` goes to the owner of share id `i + 1` as resolved by
/// `resolver`.
pub fn ciphertext_table<K>(
    schema: SignatureSchema,
    direct: &DirectTable,
    randomness: &[FieldElement],
    resolver: &K,
    secrets: &[Vec<u8>],
) -> Result<CiphertextTable, Error>
where
    K: EncryptionKeyResolver + ?Sized,
{
    if secrets.is_empty() {
        return Err(Error::EmptyInput("secrets"));
    }
    if randomness.is_empty() {
        return Err(Error::EmptyInput("randomness"));
    }
    check_schema(schema, direct.schema())?;

    let group = schema.public_key_group()?;
    let generators = vec![group.generator()?; randomness.len()];
    let shared_randomness = group.batch_scalar_mul(&generators, randomness)?;

    let share_ciphertexts = secrets
        .iter()
        .enumerate()
        .map(|(index, secret)| {
            let public_key = resolver.get_for_share_id(index as u32 + 1)?;
            check_schema(schema, public_key.schema())?;
            create_cipher_text(&public_key, direct, randomness, secret)
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "encrypted {} shares of {} bytes",
        share_ciphertexts.len(),
        randomness.len()
    );
    CiphertextTable::new(shared_randomness, share_ciphertexts)
}

/// Evaluates `field_randomness` as a polynomial at [`DOMAIN_SIZE`], matching
/// [`CiphertextTable::combine`] at the same base.
pub fn combine_field_randomness(field_randomness: &[FieldElement]) -> Result<FieldElement, Error> {
    let (last, rest) = field_randomness
        .split_last()
        .ok_or(Error::EmptyInput("field randomness"))?;
    let base = last.field().element_from_u64(DOMAIN_SIZE)?;
    rest.iter()
        .rev()
        .try_fold(last.clone(), |acc, element| acc.multiply(&base)?.add(element))
}

#[cfg(test)]
mod tests {
    use lazy_static::lazy_static;
    use rand::thread_rng;

    use super::*;

    lazy_static! {
        static ref TABLES: SubstitutionTables =
            SubstitutionTables::new(SignatureSchema::DEFAULT).unwrap();
    }

    fn random_field(n: usize) -> Vec<FieldElement> {
        let field = SignatureSchema::DEFAULT.field().unwrap();
        (0..n)
            .map(|_| field.random_element(&mut thread_rng()).unwrap())
            .collect()
    }

    fn images(randomness: &[FieldElement]) -> Vec<GroupElement> {
        let g = SignatureSchema::DEFAULT
            .public_key_group()
            .unwrap()
            .generator()
            .unwrap();
        randomness.iter().map(|r| g.multiply(r).unwrap()).collect()
    }

    #[test]
    fn every_byte_round_trips() {
        let mut rng = thread_rng();
        let sk = PairingPrivateKey::create(SignatureSchema::DEFAULT, &mut rng).unwrap();
        let pk = PairingPublicKey::create(&sk).unwrap();

        for byte in 0..=255u8 {
            let randomness = random_field(1);
            let ct = create_cipher_text(&pk, TABLES.direct(), &randomness, &[byte]).unwrap();
            let plain = read_cipher_text(&sk, &images(&randomness), TABLES.inverse(), &ct)
                .unwrap();
            assert_eq!(plain, Some(vec![byte]));
        }
    }

    #[test]
    fn wrong_key_reads_nothing() {
        let mut rng = thread_rng();
        let sk = PairingPrivateKey::create(SignatureSchema::DEFAULT, &mut rng).unwrap();
        let other = PairingPrivateKey::create(SignatureSchema::DEFAULT, &mut rng).unwrap();
        let pk = PairingPublicKey::create(&sk).unwrap();

        let randomness = random_field(4);
        let ct = create_cipher_text(&pk, TABLES.direct(), &randomness, b"tss!").unwrap();
        let plain = read_cipher_text(&other, &images(&randomness), TABLES.inverse(), &ct).unwrap();
        assert_eq!(plain, None);
    }

    #[test]
    fn randomness_must_match_the_value() {
        let sk = PairingPrivateKey::create(SignatureSchema::DEFAULT, &mut thread_rng()).unwrap();
        let pk = PairingPublicKey::create(&sk).unwrap();

        assert_eq!(
            create_cipher_text(&pk, TABLES.direct(), &random_field(2), b"abc")
                .err()
                .expect("an error"),
            Error::LengthMismatch {
                expected: 3,
                actual: 2
            }
        );
        assert_eq!(
            create_cipher_text(&pk, TABLES.direct(), &[], b"")
                .err()
                .expect("an error"),
            Error::EmptyInput("value")
        );
        assert_eq!(
            combine_field_randomness(&[]).err().expect("an error"),
            Error::EmptyInput("field randomness")
        );
    }

    #[test]
    fn combined_table_matches_combined_plaintext() {
        let mut rng = thread_rng();
        let schema = SignatureSchema::DEFAULT;
        let sk = PairingPrivateKey::create(schema, &mut rng).unwrap();
        let pk = PairingPublicKey::create(&sk).unwrap();
        let keys = vec![pk.clone()];

        let randomness = random_field(2);
        let table =
            ciphertext_table(schema, TABLES.direct(), &randomness, &keys[..], &[vec![3, 1]])
                .unwrap();

        let field = schema.field().unwrap();
        let base = field.element_from_u64(DOMAIN_SIZE).unwrap();
        let combined = table.combine(&base).unwrap();

        let g = schema.public_key_group().unwrap().generator().unwrap();
        let r = combine_field_randomness(&randomness).unwrap();
        // bytes [3, 1] read little-endian in base 256
        let m = field.element_from_u64(259).unwrap();
        let expected = pk
            .key_element()
            .multiply(&r)
            .unwrap()
            .add(&g.multiply(&m).unwrap())
            .unwrap();

        assert_eq!(combined.get_for_share_id(1).unwrap(), &expected);
        assert_eq!(combined.randomness(), &g.multiply(&r).unwrap());
    }

    #[test]
    fn resolver_rejects_unknown_share_ids() {
        let keys: Vec<PairingPublicKey> = vec![];
        assert_eq!(
            keys[..].get_for_share_id(1).err().expect("an error"),
            Error::ShareIdOutOfRange {
                share_id: 1,
                share_count: 0
            }
        );
    }
}
