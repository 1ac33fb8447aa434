use lazy_static::lazy_static;
use rand_chacha::ChaChaRng;
use rand_core::SeedableRng;

use pairing_tss::algebra::FieldElement;
use pairing_tss::elgamal::*;
use pairing_tss::roster::{NodeId, ParticipantDirectory, Roster, RosterEntry};
use pairing_tss::*;

lazy_static! {
    static ref TABLES: SubstitutionTables =
        SubstitutionTables::new(SignatureSchema::DEFAULT).unwrap();
}

struct Participants {
    rng: ChaChaRng,
    private_keys: Vec<PairingPrivateKey>,
    public_keys: Vec<PairingPublicKey>,
}

impl Participants {
    fn new(count: usize) -> Participants {
        let mut rng = ChaChaRng::from_seed([42; 32]);
        let private_keys: Vec<_> = (0..count)
            .map(|_| PairingPrivateKey::create(SignatureSchema::DEFAULT, &mut rng).unwrap())
            .collect();
        let public_keys = private_keys
            .iter()
            .map(|sk| PairingPublicKey::create(sk).unwrap())
            .collect();
        Participants {
            rng,
            private_keys,
            public_keys,
        }
    }

    fn randomness(&mut self, len: usize) -> Vec<FieldElement> {
        let field = SignatureSchema::DEFAULT.field().unwrap();
        (0..len)
            .map(|_| field.random_element(&mut self.rng).unwrap())
            .collect()
    }
}

fn secret(seed: u8) -> Vec<u8> {
    (0..32u8).map(|i| i.wrapping_mul(7).wrapping_add(seed)).collect()
}

#[test]
fn every_participant_reads_only_its_own_share() {
    let mut participants = Participants::new(4);
    let randomness = participants.randomness(32);
    let secrets: Vec<_> = (1..=4).map(secret).collect();

    let table = ciphertext_table(
        SignatureSchema::DEFAULT,
        TABLES.direct(),
        &randomness,
        participants.public_keys.as_slice(),
        &secrets,
    )
    .unwrap();
    assert_eq!(table.share_count(), 4);

    for (index, sk) in participants.private_keys.iter().enumerate() {
        let share_id = index as u32 + 1;
        let own = table.get_for_share_id(share_id).unwrap();
        assert_eq!(
            read_cipher_text(sk, table.shared_randomness(), TABLES.inverse(), own).unwrap(),
            Some(secrets[index].clone())
        );

        let other = table.get_for_share_id(share_id % 4 + 1).unwrap();
        assert_eq!(
            read_cipher_text(sk, table.shared_randomness(), TABLES.inverse(), other).unwrap(),
            None
        );
    }
    assert!(matches!(
        table.get_for_share_id(5),
        Err(Error::ShareIdOutOfRange {
            share_id: 5,
            share_count: 4
        })
    ));
}

#[test]
fn combined_randomness_matches_the_field_randomness() {
    let mut participants = Participants::new(2);
    let randomness = participants.randomness(8);
    let secrets = vec![secret(1)[..8].to_vec(), secret(2)[..8].to_vec()];
    let table = ciphertext_table(
        SignatureSchema::DEFAULT,
        TABLES.direct(),
        &randomness,
        participants.public_keys.as_slice(),
        &secrets,
    )
    .unwrap();

    let field = SignatureSchema::DEFAULT.field().unwrap();
    let base = field.element_from_u64(DOMAIN_SIZE).unwrap();
    let combined = table.combine(&base).unwrap();

    let group = SignatureSchema::DEFAULT.public_key_group().unwrap();
    let expected = group
        .generator()
        .unwrap()
        .multiply(&combine_field_randomness(&randomness).unwrap())
        .unwrap();
    assert_eq!(combined.randomness(), &expected);
    assert_eq!(combined.values().len(), 2);
}

#[test]
fn roster_directory_resolves_encryption_keys() {
    let mut participants = Participants::new(2);
    let roster = Roster::new(
        participants
            .public_keys
            .iter()
            .enumerate()
            .map(|(index, pk)| RosterEntry {
                node_id: NodeId(index as u64 + 1),
                weight: 1,
                tss_encryption_key: pk.to_bytes(),
            })
            .collect(),
    );
    // equal weights, one share each
    let directory = ParticipantDirectory::new(&roster, 1);
    assert_eq!(directory.share_count(), 2);

    let randomness = participants.randomness(4);
    let secrets = vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8]];
    let table = ciphertext_table(
        SignatureSchema::DEFAULT,
        TABLES.direct(),
        &randomness,
        &directory,
        &secrets,
    )
    .unwrap();

    let owner = directory.owner_of(2).unwrap();
    let sk = &participants.private_keys[owner.0 as usize - 1];
    assert_eq!(
        read_cipher_text(
            sk,
            table.shared_randomness(),
            TABLES.inverse(),
            table.get_for_share_id(2).unwrap()
        )
        .unwrap(),
        Some(vec![5, 6, 7, 8])
    );
}

#[test]
fn independently_masked_shares_do_not_swap() {
    let mut participants = Participants::new(4);
    let secret = secret(9);
    let group = SignatureSchema::DEFAULT.public_key_group().unwrap();
    let generator = group.generator().unwrap();

    // one 8-byte slice of the secret per participant, each under fresh randomness
    let encrypted: Vec<_> = secret
        .chunks(8)
        .zip(participants.public_keys.clone())
        .map(|(chunk, pk)| {
            let randomness = participants.randomness(chunk.len());
            let images: Vec<_> = randomness
                .iter()
                .map(|r| generator.multiply(r).unwrap())
                .collect();
            let ct = create_cipher_text(&pk, TABLES.direct(), &randomness, chunk).unwrap();
            (images, ct)
        })
        .collect();

    let mut recovered = Vec::new();
    for (index, sk) in participants.private_keys.iter().enumerate() {
        let (images, ct) = &encrypted[index];
        recovered.extend(read_cipher_text(sk, images, TABLES.inverse(), ct).unwrap().unwrap());

        let (images, ct) = &encrypted[(index + 1) % 4];
        assert_eq!(read_cipher_text(sk, images, TABLES.inverse(), ct).unwrap(), None);
    }
    assert_eq!(recovered, secret);
}
