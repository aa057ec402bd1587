// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Realtime Workflow Integration Tests
//!
//! Runs the realtime channel of a logged-in client against a local WebSocket
//! server: signed handshake, frame classification, command listeners,
//! outbound helpers and the periodic reconnect.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;

use dorks_core::crypto::CredentialSigner;
use dorks_core::network::{MockDispatcher, MockOutcome, NetworkError};
use dorks_core::{ChannelState, Client, ClientConfig, RealtimeConfig, Topic};

use crate::common::{client, login_response, ok, DEVICE_ID};

const WAIT: Duration = Duration::from_secs(5);

#[derive(Debug)]
struct Handshake {
    query: String,
    headers: HashMap<String, String>,
}

struct StubServer {
    url: String,
    handshakes: mpsc::UnboundedReceiver<Handshake>,
    received: mpsc::UnboundedReceiver<Value>,
}

/// Accepts sockets forever, pushing `script` to each new one.
async fn spawn_server(script: Vec<Value>) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let (handshake_tx, handshakes) = mpsc::unbounded_channel();
    let (received_tx, received) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let handshake_tx = handshake_tx.clone();
            let received_tx = received_tx.clone();
            let script = script.clone();

            tokio::spawn(async move {
                let mut seen = None;
                let callback =
                    |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
                        seen = Some(Handshake {
                            query: request.uri().query().unwrap_or_default().to_string(),
                            headers: request
                                .headers()
                                .iter()
                                .map(|(name, value)| {
                                    (
                                        name.as_str().to_string(),
                                        value.to_str().unwrap_or_default().to_string(),
                                    )
                                })
                                .collect(),
                        });
                        Ok(response)
                    };
                let Ok(mut socket) = tokio_tungstenite::accept_hdr_async(stream, callback).await
                else {
                    return;
                };
                if let Some(handshake) = seen {
                    let _ = handshake_tx.send(handshake);
                }

                for frame in script {
                    if socket.send(Message::Text(frame.to_string())).await.is_err() {
                        return;
                    }
                }

                while let Some(Ok(message)) = socket.next().await {
                    if let Message::Text(text) = message {
                        if let Ok(value) = serde_json::from_str(&text) {
                            let _ = received_tx.send(value);
                        }
                    }
                }
            });
        }
    });

    StubServer {
        url,
        handshakes,
        received,
    }
}

async fn logged_in_client(realtime: RealtimeConfig) -> Client {
    let direct = Arc::new(MockDispatcher::responding(ok()));
    direct.push(MockOutcome::json(login_response("SID", "uid-1")));
    let client = client(direct, ClientConfig::default().with_realtime(realtime), None);
    client.login("tester@example.com", "pw").await.unwrap();
    client
}

fn chat_frame(ndc_id: i64, thread_id: &str, content: &str) -> Value {
    json!({
        "t": 1000,
        "o": {
            "ndcId": ndc_id,
            "chatMessage": {"type": 0, "content": content, "threadId": thread_id}
        }
    })
}

/// Test: handshake, classification, commands and queued outbound frames
#[tokio::test]
async fn test_realtime_session_workflow() {
    let mut server = spawn_server(vec![
        json!({"t": 120, "o": {"ndcId": 7, "payload": {}}}),
        json!({"t": 9999, "o": {"ndcId": 7}}),
        chat_frame(5, "T", "hello there"),
        chat_frame(5, "T", "!echo hello 42"),
    ])
    .await;
    let client =
        logged_in_client(RealtimeConfig::default().with_ws_url(server.url.clone())).await;

    let channel = client.realtime().unwrap();
    assert!(Arc::ptr_eq(&channel, &client.realtime().unwrap()));
    assert_eq!(channel.state(), ChannelState::Disconnected);

    let (tip_tx, mut tips) = mpsc::unbounded_channel();
    channel.on(Topic::Tip, move |scope: Client, _frame| {
        let tip_tx = tip_tx.clone();
        async move {
            let _ = tip_tx.send(scope.ndc_id());
        }
    });

    let (command_tx, mut commands) = mpsc::unbounded_channel();
    channel.command_args("!echo", move |scope: Client, context, args| {
        let command_tx = command_tx.clone();
        async move {
            let args: Vec<String> = args.iter().map(|a| a.as_str().to_string()).collect();
            let _ = command_tx.send((scope.ndc_id(), context.thread_id, args));
        }
    });

    let opened = Arc::new(AtomicUsize::new(0));
    let counter = opened.clone();
    channel.on_open(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    // Queued before any socket exists
    channel.send_typing(5, "T").await.unwrap();
    channel.start();
    channel.start();

    // Signed handshake
    let handshake = timeout(WAIT, server.handshakes.recv()).await.unwrap().unwrap();
    let millis = handshake
        .query
        .strip_prefix(&format!("signbody={}%7C", DEVICE_ID))
        .unwrap()
        .to_string();
    assert!(millis.parse::<u128>().is_ok());
    assert_eq!(handshake.headers["ndcdeviceid"], DEVICE_ID);
    assert_eq!(handshake.headers["ndcauth"], "sid=SID");
    assert_eq!(handshake.headers["auid"], "uid-1");
    assert_eq!(
        handshake.headers["ndc-msg-sig"],
        CredentialSigner::default().sign_body(format!("{}|{}", DEVICE_ID, millis).as_bytes())
    );

    // Inbound dispatch with community scopes
    assert_eq!(timeout(WAIT, tips.recv()).await.unwrap(), Some(Some(7)));
    let (ndc_id, thread_id, args) = timeout(WAIT, commands.recv()).await.unwrap().unwrap();
    assert_eq!(ndc_id, Some(5));
    assert_eq!(thread_id.as_deref(), Some("T"));
    assert_eq!(args, ["hello", "42"]);

    // The plain chat message did not match the prefix
    assert!(commands.try_recv().is_err());

    // Outbound queue drained on connect
    let typing = timeout(WAIT, server.received.recv()).await.unwrap().unwrap();
    assert_eq!(typing["t"], 304);
    assert_eq!(typing["o"]["target"], "ndc://x5/chat-thread/T");
    assert_eq!(typing["o"]["actions"][0], "Typing");
    let id: u64 = typing["o"]["id"].as_str().unwrap().parse().unwrap();
    assert!(id >= 1000);

    assert_eq!(channel.state(), ChannelState::Open);
    assert_eq!(opened.load(Ordering::SeqCst), 1);

    // Voice chat: join and open share one id
    channel.start_voice_chat(5, "V").await.unwrap();
    let join = timeout(WAIT, server.received.recv()).await.unwrap().unwrap();
    let open = timeout(WAIT, server.received.recv()).await.unwrap().unwrap();
    assert_eq!(join["t"], 112);
    assert_eq!(open["t"], 108);
    assert_eq!(join["o"]["id"], open["o"]["id"]);
    assert!(channel.voice_sessions().contains("V"));

    channel.end_voice_chat(5, "V").await.unwrap();
    let leave = timeout(WAIT, server.received.recv()).await.unwrap().unwrap();
    assert_eq!(leave["o"]["joinRole"], 2);
    assert!(channel.voice_sessions().is_empty());

    channel.close().await;
    assert_eq!(channel.state(), ChannelState::Closed);
    assert!(matches!(
        channel.send_typing(5, "T").await,
        Err(NetworkError::ChannelClosed)
    ));
}

/// Test: the socket is replaced on a timer and listeners survive the swap
#[tokio::test]
async fn test_periodic_reconnect_keeps_listeners() {
    let mut server = spawn_server(vec![chat_frame(0, "G", "!ping")]).await;
    let client = logged_in_client(
        RealtimeConfig::default()
            .with_ws_url(server.url.clone())
            .with_reconnect_interval(Duration::from_millis(300)),
    )
    .await;
    let channel = client.realtime().unwrap();

    let (ping_tx, mut pings) = mpsc::unbounded_channel();
    channel.command("!ping", move |scope: Client, _context| {
        let ping_tx = ping_tx.clone();
        async move {
            let _ = ping_tx.send(scope.ndc_id());
        }
    });

    let closed = Arc::new(AtomicUsize::new(0));
    let counter = closed.clone();
    channel.on_close(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    channel.start();

    for _ in 0..2 {
        timeout(WAIT, server.handshakes.recv()).await.unwrap().unwrap();
        // Community 0 resolves to the global scope
        assert_eq!(timeout(WAIT, pings.recv()).await.unwrap(), Some(None));
    }
    assert!(closed.load(Ordering::SeqCst) >= 1);

    channel.close().await;
}

/// Test: an unreachable endpoint reports errors and keeps retrying
#[tokio::test]
async fn test_unreachable_endpoint_retries() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = logged_in_client(
        RealtimeConfig::default()
            .with_ws_url(url)
            .with_reconnect_interval(Duration::from_millis(100)),
    )
    .await;
    let channel = client.realtime().unwrap();

    let (error_tx, mut errors) = mpsc::unbounded_channel();
    channel.on_error(move |e| {
        let _ = error_tx.send(e.to_string());
    });
    channel.start();

    for _ in 0..2 {
        let message = timeout(WAIT, errors.recv()).await.unwrap().unwrap();
        assert!(message.starts_with("WebSocket error"));
    }
    assert_ne!(channel.state(), ChannelState::Open);

    channel.close().await;
    assert_eq!(channel.state(), ChannelState::Closed);
}
