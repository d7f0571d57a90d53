//! Server-sent-events wire encoding.
//!
//! A stream opens with a fixed header preamble and then carries one frame
//! per change event:
//!
//! ```text
//! event: playerBalance
//! data: [[8,400,200]]
//!
//! ```
//!
//! A payload containing newlines is split across consecutive `data:` lines.
//! Cycles without events write a bare comment line instead, which clients
//! ignore but which surfaces a closed channel as a write error.

use gamefeed_types::ChangeEvent;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Media type of the stream.
pub const CONTENT_TYPE: &str = "text/event-stream";

/// Caching directive sent with the stream.
pub const CACHE_CONTROL: &str = "no-cache";

/// Comment frame written when a cycle has nothing to report.
pub const KEEPALIVE: &str = ":\n\n";

/// Failure while putting an event on the wire.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// The payload could not be serialized.
    #[error("failed to encode event payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// The output channel rejected the write.
    #[error("failed to write to subscriber: {0}")]
    Transport(#[from] std::io::Error),
}

/// The header block written once at the start of a stream, terminated by a
/// blank line.
pub fn preamble() -> String {
    format!("Content-Type: {CONTENT_TYPE}\nCache-Control: {CACHE_CONTROL}\n\n")
}

/// Frame a named event with an already-encoded payload.
pub fn frame(name: &str, payload: &str) -> String {
    let mut out = format!("event: {name}\n");
    for line in payload.split('\n') {
        out.push_str("data: ");
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    out
}

/// Encode one change event as a complete SSE frame.
///
/// # Errors
///
/// Returns [`EmitError::Encode`] if the payload cannot be serialized.
pub fn encode(event: &ChangeEvent) -> Result<String, EmitError> {
    let payload = event.payload_json()?;
    Ok(frame(event.name(), &payload))
}

/// Encode and write one event. Does not flush.
///
/// # Errors
///
/// Returns [`EmitError`] if encoding or the write fails.
pub async fn write_event<W>(out: &mut W, event: &ChangeEvent) -> Result<(), EmitError>
where
    W: AsyncWrite + Unpin,
{
    let encoded = encode(event)?;
    out.write_all(encoded.as_bytes()).await?;
    Ok(())
}

/// Write a [`KEEPALIVE`] comment. Does not flush.
///
/// # Errors
///
/// Returns [`EmitError::Transport`] if the write fails.
pub async fn write_keepalive<W>(out: &mut W) -> Result<(), EmitError>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(KEEPALIVE.as_bytes()).await?;
    Ok(())
}
