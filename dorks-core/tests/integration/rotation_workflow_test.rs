// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Proxy Rotation Integration Tests
//!
//! Transport faults walk the proxy pool, each proxy at most once, and fall
//! back to a direct connection when the pool runs dry.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{json, Value};

use dorks_core::network::{
    MockDispatcher, MockDispatcherFactory, NetworkError, TransportConfig, TransportMode,
};

use crate::common::{ok, proxies, transport, StubOracle};

/// Test: every proxy fails, so all are tried once and the transport ends direct
#[tokio::test]
async fn test_exhaustion_workflow() {
    let direct = Arc::new(MockDispatcher::failing());
    let factory = Arc::new(MockDispatcherFactory::new(direct.clone()));
    let config = TransportConfig::default().with_proxies(proxies(4));
    let transport = transport(factory.clone(), &config, Arc::new(StubOracle::new()));

    let err = transport.get::<Value>("/g/s/account").await.unwrap_err();

    assert!(err.is_transport_fault());
    assert_eq!(transport.mode(), TransportMode::Exhausted);
    assert_eq!(transport.rotations(), 4);
    assert_eq!(transport.remaining_proxies(), 0);

    let installed: HashSet<String> = factory
        .installed()
        .iter()
        .map(|proxy| proxy.host().to_string())
        .collect();
    assert_eq!(installed.len(), 4);

    // Exhausted: one direct attempt, no more rotation
    let before = direct.request_count();
    assert!(transport.get::<Value>("/g/s/account").await.is_err());
    assert_eq!(direct.request_count(), before + 1);
    assert_eq!(factory.installed().len(), 4);
}

/// Test: the first working proxy sticks for later calls
#[tokio::test]
async fn test_working_proxy_is_kept() {
    let direct = Arc::new(MockDispatcher::failing());
    let healthy = Arc::new(MockDispatcher::responding(ok()));
    let factory = Arc::new(
        MockDispatcherFactory::new(direct.clone())
            .with_proxy("proxy0", healthy.clone())
            .with_proxy("proxy1", healthy.clone())
            .with_proxy("proxy2", healthy.clone()),
    );
    let config = TransportConfig::default().with_proxies(proxies(3));
    let transport = transport(factory.clone(), &config, Arc::new(StubOracle::new()));

    for _ in 0..5 {
        let _: Value = transport.get("/g/s/account").await.unwrap();
    }

    assert_eq!(transport.mode(), TransportMode::Proxied);
    assert_eq!(transport.rotations(), 1);
    assert_eq!(transport.remaining_proxies(), 2);
    assert_eq!(direct.request_count(), 1);
    assert_eq!(healthy.request_count(), 5);
}

/// Test: proxies that cannot be built are skipped without a dispatch
#[tokio::test]
async fn test_unusable_proxy_skipped() {
    let direct = Arc::new(MockDispatcher::failing());
    let healthy = Arc::new(MockDispatcher::responding(ok()));
    let factory = Arc::new(
        MockDispatcherFactory::new(direct)
            .reject_proxy("proxy0")
            .with_proxy("proxy1", healthy.clone()),
    );
    let config = TransportConfig::default().with_proxies(proxies(2));
    let transport = transport(factory.clone(), &config, Arc::new(StubOracle::new()));

    let _: Value = transport.get("/g/s/account").await.unwrap();

    assert_eq!(transport.mode(), TransportMode::Proxied);
    assert_eq!(transport.rotations(), 1);
    assert_eq!(healthy.request_count(), 1);
}

/// Test: concurrent failures on one dispatcher consume a single proxy
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_faults_share_one_rotation() {
    let direct = Arc::new(MockDispatcher::failing());
    let factory = Arc::new(
        MockDispatcherFactory::new(direct)
            .with_proxied_default(Arc::new(MockDispatcher::responding(ok()))),
    );
    let config = TransportConfig::default().with_proxies(proxies(8));
    let transport = Arc::new(transport(factory, &config, Arc::new(StubOracle::new())));

    let calls: Vec<_> = (0..8)
        .map(|_| {
            let transport = transport.clone();
            tokio::spawn(async move { transport.get::<Value>("/g/s/account").await })
        })
        .collect();
    for call in calls {
        call.await.unwrap().unwrap();
    }

    // Stale callers retry on the replacement without taking another proxy
    assert_eq!(transport.rotations(), 1);
    assert_eq!(transport.remaining_proxies(), 7);
}

/// Test: API errors and malformed bodies never rotate
#[tokio::test]
async fn test_application_errors_do_not_rotate() {
    let direct = Arc::new(MockDispatcher::responding(json!({"api:statuscode": 110})));
    let factory = Arc::new(MockDispatcherFactory::new(direct.clone()));
    let config = TransportConfig::default().with_proxies(proxies(3));
    let transport = transport(factory.clone(), &config, Arc::new(StubOracle::new()));

    let err = transport.get::<Value>("/g/s/account").await.unwrap_err();
    assert!(matches!(err, NetworkError::Api(_)));

    direct.push(dorks_core::network::MockOutcome::Respond(
        502,
        b"<html>bad gateway</html>".to_vec(),
    ));
    let err = transport.get::<Value>("/g/s/account").await.unwrap_err();
    assert!(matches!(err, NetworkError::MalformedResponse(_)));

    assert_eq!(transport.mode(), TransportMode::Direct);
    assert!(factory.installed().is_empty());
}

/// Test: without a pool a fault surfaces immediately
#[tokio::test]
async fn test_no_pool_surfaces_fault() {
    let direct = Arc::new(MockDispatcher::failing());
    let factory = Arc::new(MockDispatcherFactory::new(direct.clone()));
    let transport = transport(factory, &TransportConfig::default(), Arc::new(StubOracle::new()));

    let err = transport.get::<Value>("/g/s/account").await.unwrap_err();

    assert!(matches!(err, NetworkError::ConnectionFailed(_)));
    assert_eq!(transport.mode(), TransportMode::Direct);
    assert_eq!(direct.request_count(), 1);
}
