// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Voice sessions and their keep-alive loops.
//!
//! Each start of a voice session gets a fresh epoch. A keep-alive loop
//! re-sends the join frame for its thread on every tick and stops once the
//! thread leaves the [`VoiceSessionSet`] or is restarted under a newer epoch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::frame::{join_voice, OutboundQueue};
use crate::oracle::ElapsedRealtimeClock;

#[derive(Debug, Default)]
struct Sessions {
    active: HashMap<String, u64>,
    next_epoch: u64,
}

/// Active voice thread identifiers.
#[derive(Debug, Default)]
pub struct VoiceSessionSet {
    inner: RwLock<Sessions>,
}

impl VoiceSessionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session and returns its epoch, or `None` if the thread was
    /// already active.
    pub fn insert(&self, thread_id: &str) -> Option<u64> {
        let mut inner = self.inner.write();
        if inner.active.contains_key(thread_id) {
            return None;
        }
        inner.next_epoch += 1;
        let epoch = inner.next_epoch;
        inner.active.insert(thread_id.to_string(), epoch);
        Some(epoch)
    }

    pub fn remove(&self, thread_id: &str) -> bool {
        self.inner.write().active.remove(thread_id).is_some()
    }

    pub fn contains(&self, thread_id: &str) -> bool {
        self.inner.read().active.contains_key(thread_id)
    }

    /// True while `epoch` is the running session of `thread_id`.
    pub fn is_current(&self, thread_id: &str, epoch: u64) -> bool {
        self.inner.read().active.get(thread_id) == Some(&epoch)
    }

    pub fn len(&self) -> usize {
        self.inner.read().active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().active.is_empty()
    }

    pub fn clear(&self) {
        self.inner.write().active.clear();
    }
}

/// Spawns the keep-alive loop for session `epoch` of `thread_id`.
///
/// The first frame is sent one `period` after the call.
pub fn spawn_keep_alive(
    sessions: Arc<VoiceSessionSet>,
    queue: OutboundQueue,
    clock: Arc<ElapsedRealtimeClock>,
    ndc_id: i64,
    thread_id: String,
    epoch: u64,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if !sessions.is_current(&thread_id, epoch) {
                debug!(thread_id = %thread_id, epoch, "Voice session ended, stopping keep-alive");
                return;
            }

            let id = match clock.now().await {
                Ok(id) => id,
                Err(e) => {
                    warn!(thread_id = %thread_id, error = %e, "Keep-alive skipped, clock unavailable");
                    continue;
                }
            };

            if let Err(e) = queue.push(&join_voice(ndc_id, &thread_id, id)) {
                debug!(thread_id = %thread_id, error = %e, "Keep-alive frame dropped");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{OracleError, SignatureOracle};
    use async_trait::async_trait;
    use serde_json::Value;

    struct FixedOracle;

    #[async_trait]
    impl SignatureOracle for FixedOracle {
        async fn request_remote_signature(
            &self,
            _payload: &str,
            _user_id: Option<&str>,
        ) -> Result<String, OracleError> {
            Ok(String::new())
        }

        async fn fetch_public_key_material(&self, _user_id: &str) -> Result<Value, OracleError> {
            Ok(Value::Null)
        }

        async fn fetch_elapsed_base(&self) -> Result<String, OracleError> {
            Ok("1000".into())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_keep_alive_stops_after_removal() {
        let sessions = Arc::new(VoiceSessionSet::new());
        let (queue, mut rx) = OutboundQueue::new(16);
        let clock = Arc::new(ElapsedRealtimeClock::new(Arc::new(FixedOracle)));
        let period = Duration::from_secs(60);

        let epoch = sessions.insert("T").unwrap();
        let handle = spawn_keep_alive(
            sessions.clone(),
            queue,
            clock,
            7,
            "T".to_string(),
            epoch,
            period,
        );

        tokio::time::sleep(period / 2).await;
        assert!(rx.try_recv().is_err());

        for _ in 0..3 {
            tokio::time::sleep(period).await;
            let frame: Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
            assert_eq!(frame["t"], 112);
            assert_eq!(frame["o"]["threadId"], "T");
            assert_eq!(frame["o"]["joinRole"], 1);
        }

        sessions.remove("T");
        tokio::time::sleep(period * 3).await;

        assert!(rx.try_recv().is_err());
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_failures_are_ignored() {
        let sessions = Arc::new(VoiceSessionSet::new());
        let (queue, rx) = OutboundQueue::new(1);
        drop(rx);
        let clock = Arc::new(ElapsedRealtimeClock::new(Arc::new(FixedOracle)));

        let epoch = sessions.insert("T").unwrap();
        let handle = spawn_keep_alive(
            sessions.clone(),
            queue,
            clock,
            7,
            "T".to_string(),
            epoch,
            Duration::from_secs(60),
        );

        tokio::time::sleep(Duration::from_secs(150)).await;
        assert!(!handle.is_finished());

        sessions.remove("T");
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_within_period_stops_old_loop() {
        let sessions = Arc::new(VoiceSessionSet::new());
        let (queue, mut rx) = OutboundQueue::new(64);
        let clock = Arc::new(ElapsedRealtimeClock::new(Arc::new(FixedOracle)));
        let period = Duration::from_secs(60);

        let epoch = sessions.insert("T").unwrap();
        let first = spawn_keep_alive(
            sessions.clone(),
            queue.clone(),
            clock.clone(),
            7,
            "T".to_string(),
            epoch,
            period,
        );

        tokio::time::sleep(Duration::from_secs(10)).await;
        sessions.remove("T");
        let epoch = sessions.insert("T").unwrap();
        let second = spawn_keep_alive(
            sessions.clone(),
            queue,
            clock,
            7,
            "T".to_string(),
            epoch,
            period,
        );

        // Nudge past the second loop's tick boundaries
        tokio::time::sleep(Duration::from_secs(1)).await;
        for _ in 0..5 {
            tokio::time::sleep(period).await;
            let frames = std::iter::from_fn(|| rx.try_recv().ok()).count();
            assert_eq!(frames, 1);
        }

        assert!(first.is_finished());
        assert!(!second.is_finished());

        sessions.remove("T");
        tokio::time::sleep(period).await;
        assert!(second.is_finished());
    }

    #[test]
    fn test_session_set() {
        let set = VoiceSessionSet::new();
        let first = set.insert("a").unwrap();
        assert!(set.insert("a").is_none());
        assert!(set.contains("a"));
        assert!(set.is_current("a", first));
        assert!(set.remove("a"));
        assert!(set.is_empty());

        let second = set.insert("a").unwrap();
        assert_ne!(first, second);
        assert!(!set.is_current("a", first));
        assert!(set.is_current("a", second));
    }
}
