// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Login Workflow Integration Tests
//!
//! Fresh login, session reuse from a persisted cache, and session teardown
//! after an authentication error.

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use dorks_core::network::{MockDispatcher, MockOutcome};
use dorks_core::storage::{cache_key, FileSessionCache, SessionCache};
use dorks_core::{ClientConfig, DorksError};

use crate::common::{client, login_response, ok, DEVICE_ID};

const EMAIL: &str = "tester@example.com";
const PASSWORD: &str = "correct horse";

fn open_cache(dir: &TempDir) -> Arc<FileSessionCache> {
    Arc::new(FileSessionCache::open(dir.path().join("sessions.json"), 100, None).unwrap())
}

/// Test: login, reuse from disk in a new process, then lose the session
#[tokio::test]
async fn test_login_cache_and_invalidation_workflow() {
    let dir = TempDir::new().unwrap();

    // First run: credentials exchanged, session written to disk
    let first = Arc::new(MockDispatcher::responding(ok()));
    first.push(MockOutcome::json(login_response("SID-1", "uid-1")));
    let cache = open_cache(&dir);
    let client_a = client(first.clone(), ClientConfig::default(), Some(cache.clone()));

    let session = client_a.login(EMAIL, PASSWORD).await.unwrap();
    assert_eq!(session.session_id, "SID-1");
    assert_eq!(session.device_id, DEVICE_ID);
    assert!(client_a.is_authenticated());
    assert_eq!(first.request_count(), 2);
    assert!(cache.get(&cache_key(EMAIL, PASSWORD)).unwrap().is_some());
    drop(client_a);
    drop(cache);

    // Second run: cached session probed and reused
    let second = Arc::new(MockDispatcher::responding(ok()));
    let cache = open_cache(&dir);
    let client_b = client(second.clone(), ClientConfig::default(), Some(cache.clone()));

    let session = client_b.login(EMAIL, PASSWORD).await.unwrap();
    assert_eq!(session.session_id, "SID-1");
    assert_eq!(client_b.user_id().as_deref(), Some("uid-1"));

    let requests = second.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].url.ends_with("/g/s/account"));
    assert!(!requests.iter().any(|r| r.url.ends_with("/g/s/auth/login")));

    // Backend revokes the session
    second.push(MockOutcome::json(json!({"api:statuscode": 105})));
    let err = client_b.wallet().await.unwrap_err();
    assert!(err.is_auth_error());
    assert!(!client_b.is_authenticated());
    assert!(cache.get(&cache_key(EMAIL, PASSWORD)).unwrap().is_none());

    // Identity headers are gone from later requests
    second.push(MockOutcome::json(json!({"api:statuscode": 0, "wallet": {}})));
    client_b.wallet().await.unwrap();
    let last = second.last_request().unwrap();
    assert_eq!(last.header("NDCAUTH"), None);
    assert_eq!(last.header("AUID"), None);
    assert_eq!(last.header("NDCDEVICEID"), Some(DEVICE_ID));
}

/// Test: a non-auth API error leaves the session alone
#[tokio::test]
async fn test_access_denied_keeps_session() {
    let direct = Arc::new(MockDispatcher::responding(ok()));
    direct.push(MockOutcome::json(login_response("SID", "uid-1")));
    let client = client(direct.clone(), ClientConfig::default(), None);
    client.login(EMAIL, PASSWORD).await.unwrap();

    direct.push(MockOutcome::json(json!({"api:statuscode": 106})));
    let err = client.wallet().await.unwrap_err();

    assert_eq!(err.api_error().map(|e| e.code()), Some(106));
    assert!(client.is_authenticated());
}

/// Test: wrong credentials surface the API error and cache nothing
#[tokio::test]
async fn test_rejected_credentials() {
    let dir = TempDir::new().unwrap();
    let direct = Arc::new(MockDispatcher::responding(json!({"api:statuscode": 200})));
    let cache = open_cache(&dir);
    let client = client(direct, ClientConfig::default(), Some(cache.clone()));

    let err = client.login(EMAIL, "wrong").await.unwrap_err();

    assert!(matches!(err, DorksError::Api(ref e) if e.code() == 200));
    assert!(!client.is_authenticated());
    assert!(cache.is_empty());
}

/// Test: community views share the session of their parent
#[tokio::test]
async fn test_community_view_shares_session() {
    let direct = Arc::new(MockDispatcher::responding(ok()));
    direct.push(MockOutcome::json(login_response("SID", "uid-1")));
    let client = client(direct.clone(), ClientConfig::default(), None);
    let community = client.as_community(42);

    client.login(EMAIL, PASSWORD).await.unwrap();
    assert!(community.is_authenticated());
    assert_eq!(community.ndc_id(), Some(42));
    assert_eq!(community.global().ndc_id(), None);

    direct.push(MockOutcome::json(json!({
        "api:statuscode": 0,
        "threadList": [{"threadId": "T1"}, {"threadId": "T2"}]
    })));
    let threads = community.joined_threads(0, 25).await.unwrap();
    assert_eq!(threads.len(), 2);
    assert!(direct.last_request().unwrap().url.contains("/x42/s/chat/thread"));
}

/// Test: the realtime channel needs a session
#[tokio::test]
async fn test_realtime_requires_session() {
    let client = client(
        Arc::new(MockDispatcher::responding(ok())),
        ClientConfig::default(),
        None,
    );
    assert!(matches!(
        client.realtime(),
        Err(DorksError::NotAuthenticated)
    ));
}
