//! Per-user sliding-window rate limiting for the AI draft endpoint.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::ApiError;

/// Keyed sliding-window limiter: at most `max` hits per key per `window`.
#[derive(Clone)]
pub struct RateLimiter {
    max: u32,
    window: Duration,
    hits: Arc<Mutex<HashMap<Uuid, VecDeque<Instant>>>>,
}

impl RateLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        Self {
            max,
            window,
            hits: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record a hit for the key, failing with 429 once the window is full.
    pub async fn check(&self, key: Uuid) -> Result<(), ApiError> {
        let now = Instant::now();
        let mut hits = self.hits.lock().await;

        // Expire old hits everywhere and drop drained keys, so the map
        // tracks only keys with live hits rather than every key ever seen.
        hits.retain(|_, window| {
            while let Some(&oldest) = window.front() {
                if now.duration_since(oldest) >= self.window {
                    window.pop_front();
                } else {
                    break;
                }
            }
            !window.is_empty()
        });

        let window = hits.entry(key).or_default();
        if window.len() >= self.max as usize {
            return Err(ApiError::too_many_requests(
                "AI draft rate limit exceeded. Try again later.",
            ));
        }

        window.push_back(now);
        Ok(())
    }

    /// Number of keys with live hits. Used by tests.
    pub async fn tracked_keys(&self) -> usize {
        self.hits.lock().await.len()
    }
}
