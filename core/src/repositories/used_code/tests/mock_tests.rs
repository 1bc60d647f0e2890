//! Tests for the in-memory replay ledger.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::UsedOneTimeCode;
use crate::errors::DomainError;
use crate::repositories::used_code::{MockUsedCodeRepository, UsedCodeRepository};

#[tokio::test]
async fn insert_then_contains() {
    let repo = MockUsedCodeRepository::new();
    let user = Uuid::new_v4();
    let expires = Utc::now() + Duration::seconds(90);

    repo.insert(UsedOneTimeCode::new(user, "h1".into(), 100, expires))
        .await
        .unwrap();

    assert!(repo.contains(user, "h1", 100).await.unwrap());
    assert!(!repo.contains(user, "h1", 101).await.unwrap());
    assert!(!repo.contains(Uuid::new_v4(), "h1", 100).await.unwrap());
}

#[tokio::test]
async fn duplicate_tuple_conflicts() {
    let repo = MockUsedCodeRepository::new();
    let user = Uuid::new_v4();
    let expires = Utc::now() + Duration::seconds(90);

    repo.insert(UsedOneTimeCode::new(user, "h1".into(), 100, expires))
        .await
        .unwrap();
    let err = repo
        .insert(UsedOneTimeCode::new(user, "h1".into(), 100, expires))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Conflict { .. }));
}

#[tokio::test]
async fn cleanup_spares_live_records() {
    let repo = MockUsedCodeRepository::new();
    let user = Uuid::new_v4();
    let now = Utc::now();

    repo.insert(UsedOneTimeCode::new(user, "old".into(), 1, now - Duration::seconds(10)))
        .await
        .unwrap();
    repo.insert(UsedOneTimeCode::new(user, "live".into(), 2, now + Duration::seconds(60)))
        .await
        .unwrap();

    let removed = repo.delete_expired(now).await.unwrap();
    assert_eq!(removed, 1);
    assert!(!repo.contains(user, "old", 1).await.unwrap());
    assert!(repo.contains(user, "live", 2).await.unwrap());
}
