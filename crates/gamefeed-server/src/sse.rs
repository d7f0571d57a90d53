//! `GET /api/games/{id}/events`: one push-event stream per request.
//!
//! The handler checks that the game exists, then starts a [`StreamDriver`]
//! on its own task writing into an in-memory pipe whose read half becomes
//! the response body. The content type and caching directive travel as
//! real response headers, so the driver skips its preamble. Dropping the
//! body (client gone) cancels the driver.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use futures::Stream;
use gamefeed_core::emitter::{CACHE_CONTROL, CONTENT_TYPE};
use gamefeed_core::{SnapshotProvider, StreamDriver, StreamError};
use gamefeed_types::GameId;
use tokio::io::DuplexStream;
use tokio_util::io::ReaderStream;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::Instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// Bytes buffered between the driver and the response body.
const PIPE_CAPACITY: usize = 16 * 1024;

/// Open a push-event stream for one game.
///
/// # Errors
///
/// Returns [`ApiError::InvalidId`] for a non-numeric id,
/// [`ApiError::NotFound`] for an unknown game, and
/// [`ApiError::Unavailable`] if the provider cannot be read.
pub async fn game_events<P>(
    State(state): State<Arc<AppState<P>>>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError>
where
    P: SnapshotProvider + 'static,
{
    let game_id: GameId = raw_id
        .parse()
        .map_err(|err| ApiError::InvalidId(format!("{raw_id:?}: {err}")))?;

    state.provider().fetch_game(game_id).await?;

    let (writer, reader) = tokio::io::duplex(PIPE_CAPACITY);
    let shutdown = CancellationToken::new();
    let mut driver = StreamDriver::new(Arc::clone(state.provider()), game_id, state.stream_config())
        .with_shutdown(shutdown.clone());

    let span = tracing::info_span!(
        "subscription",
        subscription_id = %driver.subscription_id(),
        %game_id,
    );
    let guard = state.track_subscription();

    tokio::spawn(
        async move {
            match driver.run_cycles(writer).await {
                Err(StreamError::Closed | StreamError::Transport(_)) => {
                    tracing::debug!(cycles = driver.cycles(), "Subscriber disconnected");
                }
                Err(err) => {
                    tracing::error!(cycles = driver.cycles(), error = %err, "Stream ended");
                }
                Ok(never) => match never {},
            }
            drop(guard);
        }
        .instrument(span),
    );

    let body = SubscriberBody {
        inner: ReaderStream::new(reader),
        _cancel_on_drop: shutdown.drop_guard(),
    };

    Ok((
        [
            (header::CONTENT_TYPE, CONTENT_TYPE),
            (header::CACHE_CONTROL, CACHE_CONTROL),
        ],
        Body::from_stream(body),
    )
        .into_response())
}

/// Response body stream that stops its driver when dropped.
struct SubscriberBody {
    inner: ReaderStream<DuplexStream>,
    _cancel_on_drop: DropGuard,
}

impl Stream for SubscriberBody {
    type Item = <ReaderStream<DuplexStream> as Stream>::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
