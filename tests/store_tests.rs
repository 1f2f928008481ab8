use flatledger::config::Limits;
use flatledger::domain::account::{Account, AccountName, Amount, Balance, TaxId};
use flatledger::domain::ports::SnapshotStore;
use flatledger::domain::snapshot::Snapshot;
use flatledger::error::LedgerError;
use flatledger::infrastructure::json_file::JsonFileStore;
use rust_decimal_macros::dec;
use tempfile::tempdir;

fn populated_snapshot() -> Snapshot {
    let mut snapshot = Snapshot::empty();
    let mut first = Account::open(
        AccountName::new("First Holder").unwrap(),
        TaxId::new("111.222.333-44").unwrap(),
        Balance::new(dec!(10)).unwrap(),
    );
    first.deposit(Amount::new(dec!(5.25)).unwrap());
    first.withdraw(Amount::new(dec!(3)).unwrap()).unwrap();
    snapshot.push(first);
    snapshot.push(Account::open(
        AccountName::new("Second Holder").unwrap(),
        TaxId::new("555.666.777-88").unwrap(),
        Balance::ZERO,
    ));
    snapshot
}

#[tokio::test]
async fn test_multi_account_round_trip() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("data.json"), Limits::default());

    let snapshot = populated_snapshot();
    store.save(&snapshot).await.unwrap();
    assert_eq!(store.load().await.unwrap(), snapshot);

    // Saving what was loaded keeps the document stable.
    let loaded = store.load().await.unwrap();
    store.save(&loaded).await.unwrap();
    assert_eq!(store.load().await.unwrap(), snapshot);
}

#[tokio::test]
async fn test_bootstrap_is_idempotent() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("data.json"), Limits::default());

    assert!(store.load().await.unwrap().accounts.is_empty());
    let first_bytes = std::fs::read_to_string(store.path()).unwrap();
    assert!(store.load().await.unwrap().accounts.is_empty());
    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), first_bytes);
}

#[tokio::test]
async fn test_failed_replace_keeps_canonical_state_and_cleans_up() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    // A directory at the canonical path makes the rename step fail.
    std::fs::create_dir(&path).unwrap();

    let store = JsonFileStore::new(&path, Limits::default());
    let err = store.save(&populated_snapshot()).await;
    assert!(matches!(err, Err(LedgerError::Io(_))));

    assert!(path.is_dir(), "canonical location must be untouched");
    assert!(
        !dir.path().join("data.json.tmp").exists(),
        "side file must be removed on failure"
    );
}

#[tokio::test]
async fn test_corrupted_file_fails_load_but_not_subsequent_saves() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    let store = JsonFileStore::new(&path, Limits::default());

    std::fs::write(&path, "not json at all").unwrap();
    assert!(matches!(
        store.load().await,
        Err(LedgerError::Corrupted(_))
    ));

    // A later save replaces the corrupt document wholesale.
    let snapshot = populated_snapshot();
    store.save(&snapshot).await.unwrap();
    assert_eq!(store.load().await.unwrap(), snapshot);
}
