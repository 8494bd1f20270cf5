//! Multi-agent capability check with a stale-while-revalidate cache.
//!
//! Results younger than `stale_after` are served without asking the store.
//! Between `stale_after` and `expire_after` the store is asked again, and the
//! old answer is served if that fails. Past `expire_after` the answer is gone
//! and a failed check means unsupported.

use crate::config::FeatureGateConfig;
use crate::store::ConfigStoreClient;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
struct CachedCheck {
    supported: bool,
    checked_at: Instant,
}

/// Cached capability answer as currently known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureGateResult {
    pub supported: bool,
    /// False once the answer is older than the freshness window.
    pub fresh: bool,
}

#[derive(Debug, Default)]
struct GateCache {
    entry: Option<CachedCheck>,
    /// Bumped by `invalidate`; checks started under an older generation are not cached.
    generation: u64,
}

pub struct FeatureGate {
    store: Arc<dyn ConfigStoreClient>,
    cache: Mutex<GateCache>,
    stale_after: Duration,
    expire_after: Duration,
}

impl FeatureGate {
    pub fn new(store: Arc<dyn ConfigStoreClient>, config: &FeatureGateConfig) -> Self {
        let stale_after = Duration::from_secs(config.stale_after_secs);
        let expire_after = Duration::from_secs(config.expire_after_secs).max(stale_after);
        Self {
            store,
            cache: Mutex::new(GateCache::default()),
            stale_after,
            expire_after,
        }
    }

    /// Whether the selected model provider supports multiple agents.
    ///
    /// Never fails: an unanswerable check counts as unsupported.
    pub async fn is_multi_agent_supported(&self) -> bool {
        let now = Instant::now();
        let (cached, generation) = {
            let cache = self.cache.lock();
            (cache.entry, cache.generation)
        };
        if let Some(check) = cached {
            if now.duration_since(check.checked_at) < self.stale_after {
                return check.supported;
            }
        }
        let fallback = cached
            .filter(|check| now.duration_since(check.checked_at) < self.expire_after)
            .map(|check| check.supported);

        match self.store.check_feature_support().await {
            Ok(supported) => {
                let mut cache = self.cache.lock();
                if cache.generation != generation {
                    debug!(supported, "Capability answer predates invalidation, not cached");
                    return supported;
                }
                debug!(supported, "Multi-agent capability checked");
                cache.entry = Some(CachedCheck {
                    supported,
                    checked_at: Instant::now(),
                });
                supported
            }
            Err(err) => match fallback {
                Some(supported) => {
                    warn!(error = %err, supported, "Capability check failed, serving stale answer");
                    supported
                }
                None => {
                    warn!(error = %err, "Capability check failed, treating as unsupported");
                    let mut cache = self.cache.lock();
                    if cache.generation == generation {
                        cache.entry = None;
                    }
                    false
                }
            },
        }
    }

    /// Drop the cached answer; the next check goes to the store.
    pub fn invalidate(&self) {
        debug!("Capability cache invalidated");
        let mut cache = self.cache.lock();
        cache.entry = None;
        cache.generation += 1;
    }

    /// The cached answer, if it has not expired.
    pub fn cached(&self) -> Option<FeatureGateResult> {
        let check = self.cache.lock().entry?;
        let age = Instant::now().duration_since(check.checked_at);
        if age >= self.expire_after {
            return None;
        }
        Some(FeatureGateResult {
            supported: check.supported,
            fresh: age < self.stale_after,
        })
    }
}
