use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::thread_rng;

use pairing_tss::elgamal::{create_cipher_text, read_cipher_text, SubstitutionTables};
use pairing_tss::*;

fn bench_sign_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("Pairing Signatures");
    for assignment in [GroupAssignment::SigInG1, GroupAssignment::SigInG2] {
        let schema = SignatureSchema::create(algebra::Curve::BLS12_381, assignment);
        let sk = PairingPrivateKey::create(schema, &mut thread_rng()).unwrap();
        let pk = PairingPublicKey::create(&sk).unwrap();
        let sig = sk.sign(b"Bench").unwrap();

        group.bench_with_input(
            BenchmarkId::new("Sign", format!("{:?}", assignment)),
            &sk,
            |b, sk| b.iter(|| sk.sign(b"Bench")),
        );
        group.bench_with_input(
            BenchmarkId::new("Verify", format!("{:?}", assignment)),
            &(pk, sig),
            |b, (pk, sig)| b.iter(|| sig.verify_signature(pk, b"Bench")),
        );
    }
    group.finish();
}

fn bench_elgamal(c: &mut Criterion) {
    let schema = SignatureSchema::DEFAULT;
    let tables = SubstitutionTables::new(schema).unwrap();
    let field = schema.field().unwrap();
    let sk = PairingPrivateKey::create(schema, &mut thread_rng()).unwrap();
    let pk = PairingPublicKey::create(&sk).unwrap();
    let generator = schema.public_key_group().unwrap().generator().unwrap();

    let mut group = c.benchmark_group("ElGamal");
    for n in [8usize, 32, 64].iter() {
        let value: Vec<u8> = (0..*n).map(|i| i as u8).collect();
        let randomness: Vec<_> = (0..*n)
            .map(|_| field.random_element(&mut thread_rng()).unwrap())
            .collect();
        let images: Vec<_> = randomness
            .iter()
            .map(|r| generator.multiply(r).unwrap())
            .collect();
        let cipher_text = create_cipher_text(&pk, tables.direct(), &randomness, &value).unwrap();

        group.throughput(Throughput::Bytes(*n as u64));
        group.bench_with_input(BenchmarkId::new("Encrypt", n), &value, |b, value| {
            b.iter(|| create_cipher_text(&pk, tables.direct(), &randomness, value))
        });
        group.bench_with_input(BenchmarkId::new("Decrypt", n), &cipher_text, |b, ct| {
            b.iter(|| read_cipher_text(&sk, &images, tables.inverse(), ct))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sign_verify, bench_elgamal);
criterion_main!(benches);
