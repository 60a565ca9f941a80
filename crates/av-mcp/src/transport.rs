//! Input side of the stdio transport
//!
//! The MCP session reads newline-delimited JSON-RPC. A frame that is not
//! UTF-8, not JSON, or a request with a `null` id would end the session, so
//! such frames are dropped with a warning before they reach it.

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader, DuplexStream};
use tracing::{Instrument, debug, warn};

use av_utils::LogContext;

use crate::Result;
use crate::error::MCPError;

const PIPE_CAPACITY: usize = 64 * 1024;

/// Check one raw frame; `Ok(None)` for a blank line
///
/// Returns the frame without surrounding whitespace.
pub fn check_frame(frame: &[u8]) -> Result<Option<&str>> {
    let text = std::str::from_utf8(frame)
        .map_err(|e| MCPError::InvalidFrame(format!("not UTF-8: {e}")))?
        .trim();
    if text.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(text)
        .map_err(|e| MCPError::InvalidFrame(format!("not JSON: {e}")))?;

    // MCP request ids are strings or integers; absent means notification
    if value.get("id").is_some_and(Value::is_null) {
        return Err(MCPError::InvalidFrame("request id must not be null".to_string()));
    }

    Ok(Some(text))
}

/// Forward the well-formed frames of `input` to the returned stream
///
/// The returned stream ends when `input` does.
pub fn filter_frames<R>(input: R, log: &LogContext) -> DuplexStream
where
    R: AsyncRead + Send + Unpin + 'static,
{
    let (mut sink, source) = tokio::io::duplex(PIPE_CAPACITY);

    tokio::spawn(
        async move {
            let mut reader = BufReader::new(input);
            let mut frame = Vec::new();

            loop {
                frame.clear();
                match reader.read_until(b'\n', &mut frame).await {
                    Ok(0) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Input read failed: {}", e);
                        break;
                    }
                }

                let text = match check_frame(&frame) {
                    Ok(Some(text)) => text,
                    Ok(None) => continue,
                    Err(e) => {
                        warn!("Dropping frame: {}", e);
                        continue;
                    }
                };

                let forwarded = async {
                    sink.write_all(text.as_bytes()).await?;
                    sink.write_all(b"\n").await
                };
                if forwarded.await.is_err() {
                    debug!("Session input closed");
                    break;
                }
            }
        }
        .instrument(log.span()),
    );

    source
}
