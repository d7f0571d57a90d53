//! Per-subscription stream driver.
//!
//! Owns one [`FacetState`] and one output channel. Writes the preamble,
//! then loops: run a cycle, write the events (or a keepalive comment when
//! there are none), flush, sleep. The loop ends when the subscriber goes
//! away or the output channel fails, and optionally after a configured
//! number of failed cycles in a row.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use gamefeed_types::GameId;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::StreamSettings;
use crate::emitter::{self, EmitError};
use crate::engine::{CycleError, DiffEngine};
use crate::provider::SnapshotProvider;
use crate::state::FacetState;

/// Timing and limits for one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Pause between the end of one cycle and the start of the next.
    pub poll_interval: Duration,
    /// Consecutive failed cycles after which the stream gives up.
    /// Zero, the default, retries forever.
    pub max_consecutive_failures: u32,
    /// Number of squares on the board, for range checks.
    pub board_size: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            max_consecutive_failures: 0,
            board_size: 40,
        }
    }
}

impl From<&StreamSettings> for StreamConfig {
    fn from(settings: &StreamSettings) -> Self {
        Self {
            poll_interval: Duration::from_millis(settings.poll_interval_ms),
            max_consecutive_failures: settings.max_consecutive_failures,
            board_size: settings.board_size,
        }
    }
}

/// Why a stream stopped.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Writing or flushing the output channel failed.
    #[error("subscriber channel failed: {0}")]
    Transport(#[from] std::io::Error),

    /// An event payload could not be serialized.
    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),

    /// Too many cycles failed in a row.
    #[error("{failures} consecutive cycles failed, last: {last}")]
    Cycle {
        /// Length of the failure streak.
        failures: u32,
        /// The most recent cycle error.
        last: CycleError,
    },

    /// The subscriber disconnected.
    #[error("subscriber disconnected")]
    Closed,
}

impl From<EmitError> for StreamError {
    fn from(err: EmitError) -> Self {
        match err {
            EmitError::Encode(source) => Self::Encode(source),
            EmitError::Transport(source) => Self::Transport(source),
        }
    }
}

/// Drives one subscription from preamble to disconnect.
#[derive(Debug)]
pub struct StreamDriver<P> {
    engine: DiffEngine<P>,
    config: StreamConfig,
    state: FacetState,
    subscription_id: Uuid,
    cycles: u64,
    shutdown: CancellationToken,
}

impl<P: SnapshotProvider> StreamDriver<P> {
    /// Create a driver with empty facet state.
    pub fn new(provider: Arc<P>, game_id: GameId, config: StreamConfig) -> Self {
        Self {
            engine: DiffEngine::new(provider, game_id, config.board_size),
            config,
            state: FacetState::new(),
            subscription_id: Uuid::now_v7(),
            cycles: 0,
            shutdown: CancellationToken::new(),
        }
    }

    /// Stop the stream with [`StreamError::Closed`] once `shutdown` is
    /// cancelled. Checked while waiting between cycles.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Identifier of this subscription, for logs.
    pub const fn subscription_id(&self) -> Uuid {
        self.subscription_id
    }

    /// Number of cycles attempted so far.
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Current facet state.
    pub const fn state(&self) -> &FacetState {
        &self.state
    }

    /// Write the preamble, then stream events until the subscription ends.
    ///
    /// Never returns `Ok`: an open stream runs for as long as the
    /// subscriber listens.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Closed`] on disconnect,
    /// [`StreamError::Transport`] if the channel fails, and
    /// [`StreamError::Cycle`] once the consecutive-failure limit is hit.
    pub async fn run<W>(&mut self, mut out: W) -> Result<Infallible, StreamError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        out.write_all(emitter::preamble().as_bytes()).await?;
        out.flush().await?;
        self.run_cycles(out).await
    }

    /// Stream events without the preamble, for transports that carry the
    /// content type and caching directive out of band.
    ///
    /// # Errors
    ///
    /// Same as [`StreamDriver::run`].
    pub async fn run_cycles<W>(&mut self, out: W) -> Result<Infallible, StreamError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let mut out = BufWriter::new(out);

        tracing::info!(
            subscription_id = %self.subscription_id,
            game_id = %self.engine.game_id(),
            poll_interval = ?self.config.poll_interval,
            "Subscription opened"
        );

        let mut failures: u32 = 0;
        loop {
            failures = self.step(&mut out, failures).await?;

            tokio::select! {
                biased;
                () = self.shutdown.cancelled() => return Err(StreamError::Closed),
                () = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }
    }

    /// Run one cycle and write its events, or a keepalive if there are
    /// none. Returns the updated failure streak.
    async fn step<W>(&mut self, out: &mut W, failures: u32) -> Result<u32, StreamError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        self.cycles = self.cycles.saturating_add(1);

        match self.engine.cycle(&mut self.state).await {
            Ok(events) => {
                if events.is_empty() {
                    emitter::write_keepalive(out).await?;
                }
                for event in &events {
                    emitter::write_event(out, event).await?;
                }
                out.flush().await?;
                if !events.is_empty() {
                    tracing::debug!(
                        subscription_id = %self.subscription_id,
                        cycle = self.cycles,
                        events = events.len(),
                        "Pushed events"
                    );
                }
                Ok(0)
            }
            Err(err) => {
                let failures = failures.saturating_add(1);
                tracing::warn!(
                    subscription_id = %self.subscription_id,
                    cycle = self.cycles,
                    failures,
                    error = %err,
                    "Cycle failed, keeping previous state"
                );
                emitter::write_keepalive(out).await?;
                out.flush().await?;
                let limit = self.config.max_consecutive_failures;
                if limit > 0 && failures >= limit {
                    return Err(StreamError::Cycle { failures, last: err });
                }
                Ok(failures)
            }
        }
    }
}
