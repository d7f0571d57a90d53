//! Shared application state.
//!
//! Holds the snapshot provider every subscription reads from, the stream
//! settings applied to new subscriptions, and a live subscription counter.
//! Facet state is not here: each subscription owns its own.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use gamefeed_core::StreamConfig;

/// State shared by all handlers.
#[derive(Debug)]
pub struct AppState<P> {
    provider: Arc<P>,
    stream: StreamConfig,
    subscriptions: Arc<AtomicUsize>,
}

impl<P> AppState<P> {
    /// Create state over a provider.
    pub fn new(provider: Arc<P>, stream: StreamConfig) -> Self {
        Self {
            provider,
            stream,
            subscriptions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The snapshot provider.
    pub const fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    /// Settings for new subscriptions.
    pub const fn stream_config(&self) -> StreamConfig {
        self.stream
    }

    /// Number of subscriptions whose driver is still running.
    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.load(Ordering::Relaxed)
    }

    /// Count one subscription until the returned guard is dropped.
    pub fn track_subscription(&self) -> SubscriptionGuard {
        self.subscriptions.fetch_add(1, Ordering::Relaxed);
        SubscriptionGuard {
            counter: Arc::clone(&self.subscriptions),
        }
    }
}

/// Decrements the live subscription count on drop.
#[derive(Debug)]
pub struct SubscriptionGuard {
    counter: Arc<AtomicUsize>,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::Relaxed);
    }
}
