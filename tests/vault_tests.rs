//! Integration tests for the Cryptical vault service.

use cryptical::crypto::kdf::MIN_MEMORY_KIB;
use cryptical::crypto::{decrypt_secret, derive_key, Argon2Params};
use cryptical::errors::{CrypticalError, NameKind};
use cryptical::store::{CredentialStore, DEFAULT_BUSY_TIMEOUT};
use tempfile::TempDir;
use cryptical::vault::{
    Field, SessionState, ValidationFailure, VaultService, EXAMPLE_PASSWORD, EXAMPLE_VAULT,
};

fn fast() -> Argon2Params {
    Argon2Params {
        memory_kib: MIN_MEMORY_KIB,
        iterations: 1,
        parallelism: 1,
    }
}

/// Helper: an initialized in-memory service without the example seed.
fn service() -> VaultService {
    let store = CredentialStore::open_in_memory().expect("open store");
    let mut service = VaultService::new(store, fast(), 10).with_seed_example(false);
    service.initialize().expect("initialize");
    service
}

// ---------------------------------------------------------------------------
// End-to-end scenario
// ---------------------------------------------------------------------------

#[test]
fn alice_scenario() {
    let mut service = service();

    let alice = service.create_vault("alice", "p@ss", Some("p@ss")).unwrap();
    assert!(service.authenticate(alice, "p@ss").unwrap());
    assert!(!service.authenticate(alice, "wrong").unwrap());

    service
        .add_entry(alice, "p@ss", "github", "hunter2", None)
        .unwrap();

    // Decrypt with the right password.
    let entries = service.list_entries(alice, "p@ss").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].site, "github");
    assert_eq!(entries[0].plaintext(), Some("hunter2"));

    // Decrypting the stored blob under a key from the wrong password
    // fails outright rather than yielding garbage.
    let vault = service.vault(alice).unwrap();
    let stored = service.store().list_entries(alice).unwrap();
    let wrong_key = derive_key("wrong", &vault.salt, &fast()).unwrap();
    assert!(matches!(
        decrypt_secret(&wrong_key, &stored[0].encrypted_secret),
        Err(CrypticalError::DecryptionFailed)
    ));

    // Through the service, a wrong password is stopped at authentication.
    assert!(matches!(
        service.list_entries(alice, "wrong"),
        Err(CrypticalError::AuthenticationFailed)
    ));
}

// ---------------------------------------------------------------------------
// Vault lifecycle
// ---------------------------------------------------------------------------

#[test]
fn stored_vault_never_contains_plaintext_password() {
    let mut service = service();
    let id = service.create_vault("alice", "p@ss", None).unwrap();
    let vault = service.vault(id).unwrap();

    assert_ne!(vault.password_hash, "p@ss");
    assert_eq!(vault.password_hash.len(), 64);
    assert_eq!(vault.salt.len(), 10);
    assert!(vault.verify_password("p@ss"));
}

#[test]
fn duplicate_vault_name_leaves_first_intact() {
    let mut service = service();
    let first = service.create_vault("alice", "one", None).unwrap();

    let err = service.create_vault("alice", "two", None).unwrap_err();
    assert!(matches!(
        err,
        CrypticalError::DuplicateName {
            kind: NameKind::Vault,
            ..
        }
    ));

    assert_eq!(service.list_vaults().unwrap().len(), 1);
    assert!(service.authenticate(first, "one").unwrap());
    assert!(!service.authenticate(first, "two").unwrap());
}

#[test]
fn vault_salts_differ() {
    let mut service = service();
    let a = service.create_vault("a", "same", None).unwrap();
    let b = service.create_vault("b", "same", None).unwrap();

    let va = service.vault(a).unwrap();
    let vb = service.vault(b).unwrap();
    assert_ne!(va.salt, vb.salt);
    assert_ne!(va.password_hash, vb.password_hash);
}

#[test]
fn delete_vault_requires_password_and_cascades() {
    let mut service = service();
    let id = service.create_vault("alice", "p@ss", None).unwrap();
    service
        .add_entry(id, "p@ss", "github", "hunter2", None)
        .unwrap();

    assert!(matches!(
        service.delete_vault(id, "wrong"),
        Err(CrypticalError::AuthenticationFailed)
    ));
    assert_eq!(service.store().list_entries(id).unwrap().len(), 1);

    service.delete_vault(id, "p@ss").unwrap();
    assert!(service.list_vaults().unwrap().is_empty());
    assert!(service.store().list_entries(id).unwrap().is_empty());
    assert!(matches!(
        service.vault(id),
        Err(CrypticalError::VaultNotFound(_))
    ));
}

#[test]
fn vaults_listed_in_creation_order() {
    let mut service = service();
    for name in ["zulu", "alpha", "mike"] {
        service.create_vault(name, "pw", None).unwrap();
    }
    let names: Vec<_> = service
        .list_vaults()
        .unwrap()
        .into_iter()
        .map(|v| v.name)
        .collect();
    assert_eq!(names, ["zulu", "alpha", "mike"]);
}

#[test]
fn unknown_vault_name_is_reported() {
    let service = service();
    assert!(matches!(
        service.vault_by_name("nobody"),
        Err(CrypticalError::UnknownVault(ref n)) if n == "nobody"
    ));
}

// ---------------------------------------------------------------------------
// Validation happens before any write
// ---------------------------------------------------------------------------

#[test]
fn invalid_vault_input_is_rejected_without_writes() {
    let mut service = service();

    for (name, password) in [("", "pw"), ("alice", ""), ("my vault", "pw"), ("alice", "p w")] {
        let err = service.create_vault(name, password, None).unwrap_err();
        assert!(
            matches!(err, CrypticalError::Validation(_)),
            "{name:?}/{password:?}: {err:?}"
        );
    }
    assert!(service.list_vaults().unwrap().is_empty());
}

#[test]
fn mismatched_confirmation_is_rejected() {
    let mut service = service();
    match service.create_vault("alice", "p@ss", Some("p@sz")) {
        Err(CrypticalError::Validation(failures)) => {
            assert_eq!(
                failures,
                vec![ValidationFailure::ConfirmationMismatch(Field::VaultPassword)]
            );
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn invalid_entry_input_is_rejected_before_authentication() {
    let mut service = service();
    let id = service.create_vault("alice", "p@ss", None).unwrap();

    // Wrong master password too, but validation is reported first.
    let err = service
        .add_entry(id, "wrong", "git hub", "hunter2", None)
        .unwrap_err();
    assert!(matches!(err, CrypticalError::Validation(_)));
    assert!(service.store().list_entries(id).unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

#[test]
fn add_entry_with_wrong_master_password_fails() {
    let mut service = service();
    let id = service.create_vault("alice", "p@ss", None).unwrap();

    assert!(matches!(
        service.add_entry(id, "wrong", "github", "hunter2", None),
        Err(CrypticalError::AuthenticationFailed)
    ));
    assert!(service.store().list_entries(id).unwrap().is_empty());
}

#[test]
fn site_names_are_unique_across_vaults() {
    let mut service = service();
    let a = service.create_vault("a", "pa", None).unwrap();
    let b = service.create_vault("b", "pb", None).unwrap();

    service.add_entry(a, "pa", "github", "one", None).unwrap();
    assert!(matches!(
        service.add_entry(b, "pb", "github", "two", None),
        Err(CrypticalError::DuplicateName {
            kind: NameKind::Site,
            ..
        })
    ));
}

#[test]
fn session_reuses_key_for_many_entries() {
    let mut service = service();
    let id = service.create_vault("alice", "p@ss", None).unwrap();

    let session = service.unlock(id, "p@ss").unwrap();
    assert_eq!(session.state(), SessionState::Unlocked);

    let e1 = service
        .add_entry_to(&session, "github", "hunter2", Some("hunter2"))
        .unwrap();
    let e2 = service
        .add_entry_to(&session, "email", "letmein", None)
        .unwrap();

    assert_eq!(service.reveal_entry(&session, e1).unwrap().as_str(), "hunter2");
    assert_eq!(service.reveal_entry(&session, e2).unwrap().as_str(), "letmein");

    let sites: Vec<_> = service
        .entries_in(&session)
        .unwrap()
        .into_iter()
        .map(|e| e.site)
        .collect();
    assert_eq!(sites, ["github", "email"]);
}

#[test]
fn reveal_refuses_entries_of_other_vaults() {
    let mut service = service();
    let a = service.create_vault("a", "pa", None).unwrap();
    let b = service.create_vault("b", "pb", None).unwrap();
    let foreign = service.add_entry(b, "pb", "github", "x", None).unwrap();

    let session = service.unlock(a, "pa").unwrap();
    assert!(matches!(
        service.reveal_entry(&session, foreign),
        Err(CrypticalError::EntryNotFound(_))
    ));
}

#[test]
fn undecryptable_entry_does_not_hide_the_rest() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("db.sqlite");

    let store = CredentialStore::open(&path, DEFAULT_BUSY_TIMEOUT).unwrap();
    let mut service = VaultService::new(store, fast(), 10).with_seed_example(false);
    service.initialize().unwrap();

    let id = service.create_vault("alice", "p@ss", None).unwrap();
    service
        .add_entry(id, "p@ss", "github", "hunter2", None)
        .unwrap();

    // A row left behind by the legacy padding-based scheme.
    let mut raw = CredentialStore::open(&path, DEFAULT_BUSY_TIMEOUT).unwrap();
    let legacy = raw
        .create_entry(id, "legacy", "gAAAAABlegacyfernettoken")
        .unwrap();
    drop(raw);

    let entries = service.list_entries(id, "p@ss").unwrap();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0].site, "github");
    assert_eq!(entries[0].plaintext(), Some("hunter2"));

    assert_eq!(entries[1].id, legacy);
    assert_eq!(entries[1].site, "legacy");
    assert!(!entries[1].is_readable());

    // The unreadable entry can still be cleaned up.
    service.delete_entry(legacy).unwrap();
    let entries = service.list_entries(id, "p@ss").unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries.iter().all(|e| e.is_readable()));
}

#[test]
fn delete_entry_removes_it() {
    let mut service = service();
    let id = service.create_vault("alice", "p@ss", None).unwrap();
    let entry = service
        .add_entry(id, "p@ss", "github", "hunter2", None)
        .unwrap();

    service.delete_entry(entry).unwrap();
    assert!(service.list_entries(id, "p@ss").unwrap().is_empty());
    assert!(matches!(
        service.delete_entry(entry),
        Err(CrypticalError::EntryNotFound(_))
    ));
}

#[test]
fn unlock_missing_vault_fails() {
    let service = service();
    assert!(matches!(
        service.unlock(404, "pw"),
        Err(CrypticalError::VaultNotFound(404))
    ));
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

#[test]
fn fresh_store_gets_usable_example_vault() {
    let store = CredentialStore::open_in_memory().unwrap();
    let mut service = VaultService::new(store, fast(), 10);
    assert!(service.initialize().unwrap());
    assert!(!service.initialize().unwrap());

    let vault = service.vault_by_name(EXAMPLE_VAULT).unwrap();
    let entries = service.list_entries(vault.id, EXAMPLE_PASSWORD).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].site, "site");
    assert_eq!(entries[0].plaintext(), Some("pwd"));
}
