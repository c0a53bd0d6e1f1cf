//! Vault crypto cost: passphrase KDF, record sealing and BIP44 derivation.

use cold_wallet::core::bip44::{ChainNetwork, KeyDeriver};
use cold_wallet::core::coins::CoinRegistry;
use cold_wallet::core::config::{DerivationConfig, SecurityConfig};
use cold_wallet::core::mnemonic;
use cold_wallet::crypto::{KeyDerivation, VaultCipher};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn bench_kdf(c: &mut Criterion) {
    let argon2 = KeyDerivation::from_config(&SecurityConfig::default());
    let mut group = c.benchmark_group("vault_kdf");
    group.sample_size(10);
    group.bench_function("argon2id_default", |b| {
        b.iter(|| argon2.derive_key(black_box(b"test_password_2025")).expect("derive failed"))
    });
    group.bench_function("legacy_md5", |b| {
        b.iter(|| {
            KeyDerivation::LegacyMd5
                .derive_key(black_box(b"test_password_2025"))
                .expect("derive failed")
        })
    });
    group.finish();
}

fn bench_seal_open(c: &mut Criterion) {
    let cipher = VaultCipher::from_key(&[7u8; 32]).expect("cipher");
    let xprv = vec![b'x'; 111];
    let sealed = cipher.encrypt(&xprv).expect("encrypt");

    c.bench_function("seal_record", |b| b.iter(|| cipher.encrypt(black_box(&xprv)).expect("encrypt")));
    c.bench_function("open_record", |b| b.iter(|| cipher.decrypt(black_box(&sealed)).expect("decrypt")));
}

fn bench_derivation(c: &mut Criterion) {
    let phrase = mnemonic::validate(PHRASE).expect("phrase");
    let seed = mnemonic::derive_seed(&phrase).expect("seed");
    let deriver = KeyDeriver::new(&DerivationConfig::default());
    let registry = CoinRegistry::builtin();

    c.bench_function("derive_single_pair", |b| {
        b.iter(|| {
            deriver
                .derive_key_pair(black_box(&seed[..]), ChainNetwork::Mainnet, "BTC", 0)
                .expect("derive")
        })
    });
    c.bench_function("derive_all_pairs", |b| {
        b.iter(|| deriver.derive_all(black_box(&seed[..]), &registry).expect("derive"))
    });
}

criterion_group!(benches, bench_kdf, bench_seal_open, bench_derivation);
criterion_main!(benches);
