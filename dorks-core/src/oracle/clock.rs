// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Elapsed Realtime Clock
//!
//! Logical millisecond counter seeded once from the oracle and then advanced
//! locally: `now = base + (wall_now - captured_at)`. Every read re-stamps the
//! base, so only the first read costs a round trip.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use super::{OracleError, SignatureOracle};

#[derive(Debug, Clone, Copy)]
struct ClockBase {
    value: u64,
    captured_at: Instant,
}

/// Skew-tolerant logical clock shared by realtime helpers.
pub struct ElapsedRealtimeClock {
    oracle: Arc<dyn SignatureOracle>,
    base: Mutex<Option<ClockBase>>,
}

impl ElapsedRealtimeClock {
    /// Creates an unseeded clock.
    pub fn new(oracle: Arc<dyn SignatureOracle>) -> Self {
        ElapsedRealtimeClock {
            oracle,
            base: Mutex::new(None),
        }
    }

    /// Returns the current logical time in milliseconds.
    ///
    /// The lock is held across the seeding round trip so concurrent first
    /// reads share a single fetch.
    pub async fn now(&self) -> Result<u64, OracleError> {
        let mut base = self.base.lock().await;

        let next = match *base {
            Some(previous) => {
                let captured_at = Instant::now();
                let elapsed = captured_at.duration_since(previous.captured_at);
                ClockBase {
                    value: previous.value + elapsed.as_millis() as u64,
                    captured_at,
                }
            }
            None => {
                let raw = self.oracle.fetch_elapsed_base().await?;
                let value = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| OracleError::InvalidClock(raw.clone()))?;
                debug!(value, "Seeded elapsed realtime clock");
                ClockBase {
                    value,
                    captured_at: Instant::now(),
                }
            }
        };

        *base = Some(next);
        Ok(next.value)
    }

    /// Returns the current logical time in its wire form.
    pub async fn now_string(&self) -> Result<String, OracleError> {
        Ok(self.now().await?.to_string())
    }

    /// Returns true once the first remote fetch has completed.
    pub async fn is_seeded(&self) -> bool {
        self.base.lock().await.is_some()
    }
}
