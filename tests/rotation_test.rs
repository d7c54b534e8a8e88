// ABOUTME: Integration tests for issuance, rotation, and revocation through the token lifecycle
// ABOUTME: Exercises single-session, exactly-once rotation, expiry, and all-or-nothing issuance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use common::{create_test_lifecycle, ALL_BACKENDS};
use futures_util::future::join_all;
use keyturn::{
    errors::AuthError,
    models::{Identity, RefreshRecord, TokenClass, UserRole},
    store::{InMemoryRefreshStore, RefreshRecordStore, StoreError},
    tokens::TokenLifecycle,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn test_rotation_scenario() {
    for backend in ALL_BACKENDS {
        let lifecycle = create_test_lifecycle(backend).await;
        let identity = common::user_identity();

        let first = lifecycle.issue_for_identity(&identity).await.unwrap();
        let second = lifecycle.rotate(&first.refresh_token).await.unwrap();
        assert_ne!(second.refresh_token, first.refresh_token, "{backend:?}");
        assert_ne!(second.access_token, first.access_token);

        assert_eq!(
            lifecycle.rotate(&first.refresh_token).await,
            Err(AuthError::InvalidRefreshToken),
            "{backend:?}"
        );

        let third = lifecycle.rotate(&second.refresh_token).await.unwrap();
        let records = lifecycle.store().records_for_identity(identity.id).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].token, third.refresh_token);
    }
}

#[tokio::test]
async fn test_new_login_supersedes_previous_refresh_token() {
    for backend in ALL_BACKENDS {
        let lifecycle = create_test_lifecycle(backend).await;
        let identity = common::user_identity();

        let first = lifecycle.issue_for_identity(&identity).await.unwrap();
        let second = lifecycle.issue_for_identity(&identity).await.unwrap();

        assert_eq!(
            lifecycle.rotate(&first.refresh_token).await,
            Err(AuthError::InvalidRefreshToken),
            "{backend:?}"
        );
        assert!(lifecycle.rotate(&second.refresh_token).await.is_ok());

        // The superseded session keeps its access token until it expires
        assert_eq!(
            lifecycle.authorize(&first.access_token).unwrap().user_id,
            identity.id
        );
    }
}

#[tokio::test]
async fn test_only_latest_of_many_issuances_rotates() {
    let lifecycle = create_test_lifecycle(common::TestBackend::Sqlite).await;
    let identity = common::user_identity();

    let mut pairs = Vec::new();
    for _ in 0..5 {
        pairs.push(lifecycle.issue_for_identity(&identity).await.unwrap());
    }
    let latest = pairs.pop().unwrap();

    for stale in &pairs {
        assert_eq!(
            lifecycle.rotate(&stale.refresh_token).await,
            Err(AuthError::InvalidRefreshToken)
        );
    }
    assert!(lifecycle.rotate(&latest.refresh_token).await.is_ok());
}

#[tokio::test]
async fn test_rotation_keeps_other_identities_untouched() {
    let lifecycle = create_test_lifecycle(common::TestBackend::Memory).await;
    let alice = common::user_identity();
    let bob = common::user_identity();

    let alice_pair = lifecycle.issue_for_identity(&alice).await.unwrap();
    let bob_pair = lifecycle.issue_for_identity(&bob).await.unwrap();

    lifecycle.rotate(&alice_pair.refresh_token).await.unwrap();
    assert!(lifecycle.rotate(&bob_pair.refresh_token).await.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_rotation_has_exactly_one_winner() {
    for backend in ALL_BACKENDS {
        let lifecycle = create_test_lifecycle(backend).await;
        let identity = common::user_identity();
        let pair = lifecycle.issue_for_identity(&identity).await.unwrap();

        let attempts = (0..16).map(|_| {
            let lifecycle = lifecycle.clone();
            let token = pair.refresh_token.clone();
            tokio::spawn(async move { lifecycle.rotate(&token).await })
        });
        let results: Vec<_> = join_all(attempts)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1, "{backend:?}");
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| *e == AuthError::InvalidRefreshToken));

        let records = lifecycle.store().records_for_identity(identity.id).await.unwrap();
        assert_eq!(records.len(), 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_logins_leave_one_record() {
    for backend in ALL_BACKENDS {
        let lifecycle = create_test_lifecycle(backend).await;
        let identity = common::user_identity();

        let logins = (0..8).map(|_| {
            let lifecycle = lifecycle.clone();
            tokio::spawn(async move { lifecycle.issue_for_identity(&identity).await })
        });
        let pairs: Vec<_> = join_all(logins)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .collect();

        let records = lifecycle.store().records_for_identity(identity.id).await.unwrap();
        assert_eq!(records.len(), 1, "{backend:?}");

        let mut rotated = 0;
        for pair in &pairs {
            if lifecycle.rotate(&pair.refresh_token).await.is_ok() {
                rotated += 1;
            }
        }
        assert_eq!(rotated, 1, "{backend:?}");
    }
}

#[tokio::test]
async fn test_expired_record_fails_then_is_gone() {
    for backend in ALL_BACKENDS {
        let lifecycle = create_test_lifecycle(backend).await;
        let identity = common::user_identity();
        let issued_at = Utc::now() - Duration::days(8);
        let stale = lifecycle
            .signer()
            .issue_at(&identity, TokenClass::Refresh, issued_at)
            .unwrap();

        lifecycle
            .store()
            .put(identity.id, &stale.token, stale.expires_at)
            .await
            .unwrap();

        assert_eq!(
            lifecycle.rotate(&stale.token).await,
            Err(AuthError::ExpiredRefreshToken),
            "{backend:?}"
        );
        assert_eq!(
            lifecycle.rotate(&stale.token).await,
            Err(AuthError::InvalidRefreshToken),
            "{backend:?}"
        );
    }
}

#[tokio::test]
async fn test_expired_token_with_live_record_is_rejected() {
    let lifecycle = create_test_lifecycle(common::TestBackend::Memory).await;
    let identity = common::user_identity();
    let stale = lifecycle
        .signer()
        .issue_at(
            &identity,
            TokenClass::Refresh,
            Utc::now() - Duration::days(8),
        )
        .unwrap();

    lifecycle
        .store()
        .put(identity.id, &stale.token, Utc::now() + Duration::days(1))
        .await
        .unwrap();

    assert_eq!(
        lifecycle.rotate(&stale.token).await,
        Err(AuthError::ExpiredRefreshToken)
    );
    assert!(lifecycle
        .store()
        .records_for_identity(identity.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_record_and_signature_must_agree() {
    for backend in ALL_BACKENDS {
        let lifecycle = create_test_lifecycle(backend).await;
        let owner = common::user_identity();
        let other = common::user_identity();

        let token = lifecycle
            .signer()
            .issue(&owner, TokenClass::Refresh)
            .unwrap();
        lifecycle
            .store()
            .put(other.id, &token.token, token.expires_at)
            .await
            .unwrap();

        assert_eq!(
            lifecycle.rotate(&token.token).await,
            Err(AuthError::InvalidRefreshToken),
            "{backend:?}"
        );
    }
}

#[tokio::test]
async fn test_access_token_cannot_rotate() {
    let lifecycle = create_test_lifecycle(common::TestBackend::Memory).await;
    let identity = common::user_identity();
    let pair = lifecycle.issue_for_identity(&identity).await.unwrap();

    assert_eq!(
        lifecycle.rotate(&pair.access_token).await,
        Err(AuthError::InvalidRefreshToken)
    );

    // Even with a record planted under the access token, the refresh key rejects it
    lifecycle
        .store()
        .put(identity.id, &pair.access_token, pair.access_expires_at)
        .await
        .unwrap();
    assert_eq!(
        lifecycle.rotate(&pair.access_token).await,
        Err(AuthError::InvalidRefreshToken)
    );
}

#[tokio::test]
async fn test_rotation_preserves_role() {
    let lifecycle = create_test_lifecycle(common::TestBackend::Sqlite).await;
    let identity = common::admin_identity();

    let pair = lifecycle.issue_for_identity(&identity).await.unwrap();
    let rotated = lifecycle.rotate(&pair.refresh_token).await.unwrap();

    let context = lifecycle.authorize(&rotated.access_token).unwrap();
    assert_eq!(context.user_id, identity.id);
    assert_eq!(context.role, UserRole::Admin);
}

#[tokio::test]
async fn test_revoke_is_idempotent() {
    for backend in ALL_BACKENDS {
        let lifecycle = create_test_lifecycle(backend).await;
        let identity = common::user_identity();
        let pair = lifecycle.issue_for_identity(&identity).await.unwrap();

        lifecycle.revoke(&pair.refresh_token).await.unwrap();
        lifecycle.revoke(&pair.refresh_token).await.unwrap();
        lifecycle.revoke("never-issued").await.unwrap();

        assert_eq!(
            lifecycle.rotate(&pair.refresh_token).await,
            Err(AuthError::InvalidRefreshToken),
            "{backend:?}"
        );
        // Access tokens are not tracked by the store
        assert!(lifecycle.authorize(&pair.access_token).is_ok());
    }
}

#[tokio::test]
async fn test_pair_expiries_follow_configured_lifetimes() {
    let lifecycle = create_test_lifecycle(common::TestBackend::Memory).await;
    let before = Utc::now();
    let pair = lifecycle
        .issue_for_identity(&common::user_identity())
        .await
        .unwrap();

    let access_ttl = pair.access_expires_at - before;
    let refresh_ttl = pair.refresh_expires_at - before;
    assert!(access_ttl <= Duration::minutes(15) && access_ttl > Duration::minutes(14));
    assert!(refresh_ttl <= Duration::days(7) && refresh_ttl > Duration::days(7) - Duration::minutes(1));
}

/// In-memory store whose writes can be switched to fail
struct FailingStore {
    inner: InMemoryRefreshStore,
    fail_puts: AtomicBool,
}

#[async_trait]
impl RefreshRecordStore for FailingStore {
    async fn put(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("disk full".into()));
        }
        self.inner.put(user_id, token, expires_at).await
    }

    async fn take_if_valid(&self, token: &str) -> Result<RefreshRecord, StoreError> {
        self.inner.take_if_valid(token).await
    }

    async fn delete_by_token(&self, token: &str) -> Result<(), StoreError> {
        self.inner.delete_by_token(token).await
    }

    async fn records_for_identity(&self, user_id: Uuid) -> Result<Vec<RefreshRecord>, StoreError> {
        self.inner.records_for_identity(user_id).await
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

fn failing_lifecycle() -> (TokenLifecycle, Arc<FailingStore>) {
    common::init_test_logging();
    let store = Arc::new(FailingStore {
        inner: InMemoryRefreshStore::new(),
        fail_puts: AtomicBool::new(false),
    });
    let lifecycle = TokenLifecycle::new(common::create_test_signer(), Arc::clone(&store) as _);
    (lifecycle, store)
}

#[tokio::test]
async fn test_store_failure_during_issuance_returns_no_pair() {
    let (lifecycle, store) = failing_lifecycle();
    store.fail_puts.store(true, Ordering::SeqCst);

    let result = lifecycle
        .issue_for_identity(&Identity::new(Uuid::new_v4(), UserRole::User))
        .await;
    assert!(matches!(result, Err(AuthError::Internal(_))));
}

#[tokio::test]
async fn test_store_failure_during_rotation_is_internal() {
    let (lifecycle, store) = failing_lifecycle();
    let identity = common::user_identity();
    let pair = lifecycle.issue_for_identity(&identity).await.unwrap();

    store.fail_puts.store(true, Ordering::SeqCst);
    let result = lifecycle.rotate(&pair.refresh_token).await;
    assert!(matches!(result, Err(AuthError::Internal(_))));

    // The consumed token does not come back
    store.fail_puts.store(false, Ordering::SeqCst);
    assert_eq!(
        lifecycle.rotate(&pair.refresh_token).await,
        Err(AuthError::InvalidRefreshToken)
    );
}
