//! # KeyVault Benchmarks
//!
//! | Area | Operation | Dominant cost |
//! |------|-----------|---------------|
//! | Vault | encrypt / decrypt | PBKDF2 iterations |
//! | HD keyring | account derivation | HMAC-SHA512 chain |
//! | Signing | personal message | secp256k1 RFC 6979 |
//! | Controller | unlock | decrypt + re-derivation |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kv_01_keyring_controller::{KeyringApi, KeyringConfig, KeyringController};
use shared_crypto::{
    decrypt_with_password, derive_account_key, encrypt_with_password, mnemonic_to_seed,
    personal_message_hash, Cipher, DerivationPath, PrivateKey, DEFAULT_KDF_ITERATIONS,
};
use std::time::Duration;

const ABANDON: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

// ============================================================================
// Vault encryption
// ============================================================================

fn bench_vault_crypto(c: &mut Criterion) {
    let mut group = c.benchmark_group("vault-crypto");
    group.measurement_time(Duration::from_secs(10));

    let plaintext = vec![0x42u8; 4096];
    for iterations in [1_000, DEFAULT_KDF_ITERATIONS] {
        for cipher in [Cipher::Aes256Gcm, Cipher::XChaCha20Poly1305] {
            let label = format!("{cipher:?}/{iterations}");
            group.bench_with_input(
                BenchmarkId::new("encrypt", &label),
                &(cipher, iterations),
                |b, &(cipher, iterations)| {
                    b.iter(|| encrypt_with_password("password", &plaintext, cipher, iterations))
                },
            );

            let blob = encrypt_with_password("password", &plaintext, cipher, iterations)
                .expect("encrypt");
            group.bench_with_input(BenchmarkId::new("decrypt", &label), &blob, |b, blob| {
                b.iter(|| decrypt_with_password("password", black_box(blob)))
            });
        }
    }

    group.finish();
}

// ============================================================================
// HD derivation
// ============================================================================

fn bench_hd_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("hd-derivation");

    group.bench_function("mnemonic_to_seed", |b| {
        b.iter(|| mnemonic_to_seed(black_box(ABANDON)))
    });

    let seed = mnemonic_to_seed(ABANDON).expect("seed");
    let path = DerivationPath::default();
    for count in [1u32, 10, 50] {
        group.throughput(Throughput::Elements(u64::from(count)));
        group.bench_with_input(BenchmarkId::new("derive_accounts", count), &count, |b, &count| {
            b.iter(|| {
                for index in 0..count {
                    black_box(derive_account_key(&seed[..], &path, index).expect("derive"));
                }
            })
        });
    }

    group.finish();
}

// ============================================================================
// Signing
// ============================================================================

fn bench_signing(c: &mut Criterion) {
    let mut group = c.benchmark_group("signing");
    let key = PrivateKey::from_bytes([0x46; 32]).expect("key");
    let digest = personal_message_hash(b"Sign in to example.org");

    group.bench_function("sign_digest", |b| {
        b.iter(|| key.sign_digest(black_box(&digest)))
    });
    group.bench_function("address", |b| b.iter(|| key.address()));

    group.finish();
}

// ============================================================================
// Controller unlock
// ============================================================================

fn bench_controller_unlock(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let mut group = c.benchmark_group("controller");
    group.sample_size(20);

    for accounts in [1usize, 10] {
        let controller = KeyringController::new(KeyringConfig::default());
        runtime.block_on(async {
            controller
                .create_new_vault_and_restore("password", ABANDON)
                .await
                .expect("restore");
            for _ in 1..accounts {
                controller.add_new_account().await.expect("add");
            }
        });

        group.bench_with_input(
            BenchmarkId::new("submit_password", accounts),
            &controller,
            |b, controller| {
                b.iter(|| {
                    runtime.block_on(async {
                        controller.set_locked().await.expect("lock");
                        controller.submit_password("password").await.expect("unlock")
                    })
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_vault_crypto,
    bench_hd_derivation,
    bench_signing,
    bench_controller_unlock
);
criterion_main!(benches);
