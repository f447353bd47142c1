use std::sync::Arc;

use crate::config;
use crate::fanout::Fanout;
use crate::middleware::rate_limit::RateLimiter;
use crate::services::{BlobStore, DraftGenerator, PaymentGateway};
use crate::store::Store;

/// Shared application state, built once at startup and injected into every
/// handler. Collaborators are trait objects so deployments and tests can
/// swap implementations; nothing is discovered ambiently.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub blob: Arc<dyn BlobStore>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub draft_ai: Arc<dyn DraftGenerator>,
    pub fanout: Fanout,
    pub ai_limiter: RateLimiter,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        blob: Arc<dyn BlobStore>,
        gateway: Arc<dyn PaymentGateway>,
        draft_ai: Arc<dyn DraftGenerator>,
    ) -> Self {
        let rate = &config::config().rate_limit;
        Self {
            store,
            blob,
            gateway,
            draft_ai,
            fanout: Fanout::new(),
            ai_limiter: RateLimiter::new(
                rate.ai_draft_max,
                std::time::Duration::from_secs(rate.ai_draft_window_secs),
            ),
        }
    }
}
