// tests/genkeys_tests.rs
//! Key generation: guards, self-test verdicts and failure reporting

mod common;
mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use encrypted_pw_vault::config::KeyFiles;
use encrypted_pw_vault::consts::*;
use encrypted_pw_vault::crypto::CryptoProvider;
use encrypted_pw_vault::{KeyGenerator, VersionedCipher};
use support::{memory_provider, TempStores, XorProvider, PRIV, PUB};

#[test]
fn test_self_test_passes_on_empty_store() {
    common::setup();
    let provider = memory_provider();
    let generator = KeyGenerator::new(provider.clone(), KeyFiles::new(PRIV, PUB));

    let out = generator.gen_keys();
    let lines = out.lines();

    assert_eq!(lines[0], format!("{MSG_TEST_WITH}{SELF_TEST_TEXT}"));
    assert!(lines[1].starts_with(MSG_ENCRYPTS_TO));
    assert_eq!(lines[2], format!("{MSG_DECRYPTS_TO}{SELF_TEST_TEXT}"));
    assert_eq!(lines[3], "");
    assert_eq!(lines[4], MSG_VALIDITY_OK);
    assert_eq!(lines.len(), 5);

    assert_eq!(provider.count_keys(&PRIV.into()).unwrap(), 1);
    assert_eq!(
        SELF_TEST_TEXT,
        "A variable of array type holds a reference to an object. "
    );
}

#[test]
fn test_generation_appends_without_touching_older_keys() {
    let provider = memory_provider();
    let generator = KeyGenerator::new(provider.clone(), KeyFiles::new(PRIV, PUB));
    let cipher = VersionedCipher::init(provider.clone(), PRIV, PUB).unwrap();

    assert!(generator.gen_keys().contains(MSG_VALIDITY_OK));
    let first_public = cipher.public_key().unwrap();
    let old = cipher.encrypt("legacy").unwrap();

    assert!(generator.gen_keys().contains(MSG_VALIDITY_OK));
    assert_eq!(provider.count_keys(&PRIV.into()).unwrap(), 2);
    assert_ne!(cipher.public_key().unwrap(), first_public);

    assert_eq!(cipher.decrypt(&old).unwrap().expose_secret().as_str(), "legacy");
    assert!(cipher.encrypt("new").unwrap().starts_with("1{"));
}

#[test]
fn test_missing_private_location_is_reported() {
    let provider = memory_provider();
    let generator = KeyGenerator::new(
        provider.clone(),
        KeyFiles {
            private_key_file: None,
            public_key_file: Some(PUB.into()),
        },
    );

    let out = generator.gen_keys();
    assert_eq!(out.lines(), [MSG_NO_PRIVKEY.to_string()]);
    assert_eq!(provider.count_keys(&PUB.into()).unwrap(), 0);
}

#[test]
fn test_missing_public_location_is_reported() {
    let provider = memory_provider();
    let mut generator = KeyGenerator::new(provider.clone(), KeyFiles::default());
    generator.set_private_key_file(PRIV);

    let out = generator.gen_keys();
    assert_eq!(out.lines(), [MSG_NO_PUBKEY.to_string()]);
    assert_eq!(provider.count_keys(&PRIV.into()).unwrap(), 0);

    generator.set_public_key_file(PUB);
    assert_eq!(generator.private_key_file(), Some(PRIV));
    assert_eq!(generator.public_key_file(), Some(PUB));
    assert!(generator.gen_keys().contains(MSG_VALIDITY_OK));
}

#[test]
fn test_generation_failure_is_reported() {
    let provider = Arc::new(XorProvider::default());
    provider.refuse_generation.store(true, Ordering::SeqCst);
    let generator = KeyGenerator::new(provider.clone(), KeyFiles::new(PRIV, PUB));

    let out = generator.gen_keys();
    assert_eq!(out.lines(), [MSG_GEN_FAILED.to_string()]);
    assert_eq!(provider.count_keys(&PRIV.into()).unwrap(), 0);
}

#[test]
fn test_failed_self_test_is_reported_and_key_stays() {
    let provider = Arc::new(XorProvider::default());
    provider.garble_decrypt.store(true, Ordering::SeqCst);
    let generator = KeyGenerator::new(provider.clone(), KeyFiles::new(PRIV, PUB));

    let out = generator.gen_keys();
    assert_eq!(out.lines().last().map(String::as_str), Some(MSG_VALIDITY_FAILED));
    assert!(!out.contains(MSG_VALIDITY_OK));

    assert_eq!(provider.count_keys(&PRIV.into()).unwrap(), 1);
    let cipher = VersionedCipher::init(provider, PRIV, PUB).unwrap();
    assert!(cipher.encrypt("x").unwrap().starts_with("0{"));
}

#[test]
fn test_store_failure_becomes_exception_line() {
    // Same location for both halves is refused by the store
    let provider = memory_provider();
    let generator = KeyGenerator::new(provider, KeyFiles::new(PRIV, PRIV));

    let out = generator.gen_keys();
    assert_eq!(out.len(), 1);
    assert!(out.lines()[0].starts_with(MSG_EXCEPTION), "{out}");
}

#[test]
fn test_generation_into_sqlite_stores() {
    let stores = TempStores::new();
    let provider = stores.provider(None);
    let generator = KeyGenerator::new(
        provider.clone(),
        KeyFiles::new(stores.private.as_str(), stores.public.as_str()),
    );

    assert!(generator.gen_keys().contains(MSG_VALIDITY_OK));
    assert!(generator.gen_keys().contains(MSG_VALIDITY_OK));
    assert_eq!(provider.count_keys(&stores.private).unwrap(), 2);
    assert_eq!(provider.count_keys(&stores.public).unwrap(), 2);
}

#[test]
fn test_concurrent_generation_yields_distinct_indices() {
    let provider = memory_provider();
    let generator = Arc::new(KeyGenerator::new(provider.clone(), KeyFiles::new(PRIV, PUB)));

    std::thread::scope(|s| {
        for _ in 0..3 {
            let generator = generator.clone();
            s.spawn(move || assert!(generator.gen_keys().contains(MSG_VALIDITY_OK)));
        }
    });

    assert_eq!(provider.count_keys(&PRIV.into()).unwrap(), 3);
    assert_eq!(provider.count_keys(&PUB.into()).unwrap(), 3);
}
