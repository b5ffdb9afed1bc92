use anyhow::Result;
use futures::{Stream, StreamExt};
use std::fmt::Display;

use super::buffering::CircularLineBuffer;
use crate::streaming::{FramePayload, FrameStream, StreamEvent};

/// Literal prefix marking a candidate event line
pub const FRAME_PREFIX: &str = "data: ";

/// What a single trimmed line turned out to be
#[derive(Debug, Clone, PartialEq)]
pub enum FrameLine {
    /// Blank, comment, or anything without the frame prefix
    Ignored,
    /// A well-formed frame and the events it carries (possibly none)
    Events(Vec<StreamEvent>),
    /// Prefix present but the payload did not parse
    Malformed(String),
}

/// Classify one line of the chunked body
pub fn parse_frame_line(line: &str) -> FrameLine {
    let line = line.trim();

    let Some(data) = line.strip_prefix(FRAME_PREFIX) else {
        return FrameLine::Ignored;
    };
    if data.is_empty() {
        return FrameLine::Ignored;
    }

    match serde_json::from_str::<FramePayload>(data) {
        Ok(payload) => FrameLine::Events(payload.into_events()),
        Err(e) => FrameLine::Malformed(e.to_string()),
    }
}

/// Incremental decoder: raw bytes in, ordered events out
///
/// Each `push` processes every complete line in the buffer and keeps the
/// trailing fragment for the next chunk. Malformed frames are logged and
/// skipped so one corrupt frame cannot sink the rest of the turn.
pub struct FrameDecoder {
    buffer: CircularLineBuffer,
    frames: usize,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            buffer: CircularLineBuffer::with_capacity(8192),
            frames: 0,
        }
    }

    /// Feed one transport chunk
    pub fn push(&mut self, bytes: &[u8]) -> Vec<StreamEvent> {
        self.buffer.extend(bytes);

        let mut events = Vec::new();
        while let Some(line) = self.buffer.next_line() {
            self.handle_line(line, &mut events);
        }
        events
    }

    /// Give the residual buffer one last parse once the transport is done
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if let Some(line) = self.buffer.take_remainder() {
            self.handle_line(line, &mut events);
        }
        events
    }

    /// Bytes of the incomplete trailing fragment
    pub fn pending(&self) -> Vec<u8> {
        self.buffer.pending()
    }

    /// Number of well-formed frames seen so far
    pub fn frames_processed(&self) -> usize {
        self.frames
    }

    fn handle_line(&mut self, line: Result<String>, events: &mut Vec<StreamEvent>) {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Skipping undecodable frame: {}", e);
                return;
            }
        };

        match parse_frame_line(&line) {
            FrameLine::Ignored => {}
            FrameLine::Events(parsed) => {
                self.frames += 1;
                tracing::debug!(frame = self.frames, events = parsed.len(), "Frame decoded");
                events.extend(parsed);
            }
            FrameLine::Malformed(reason) => {
                tracing::warn!("Skipping malformed frame ({}): {}", reason, line);
            }
        }
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a chunked byte stream into an ordered event stream
///
/// Transport failures surface as a single `Err` and end the stream. A clean
/// close flushes the residual buffer through the same rules as every other
/// line.
pub fn parse_frame_stream<S, B, E>(byte_stream: S) -> FrameStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(byte_stream);
        let mut decoder = FrameDecoder::new();
        let mut failed = false;

        while let Some(chunk_result) = byte_chunks.next().await {
            match chunk_result {
                Ok(bytes) => {
                    for event in decoder.push(bytes.as_ref()) {
                        yield Ok(event);
                    }
                }
                Err(e) => {
                    yield Err(anyhow::anyhow!("Stream error: {}", e));
                    failed = true;
                    break;
                }
            }
        }

        if !failed {
            for event in decoder.finish() {
                yield Ok(event);
            }
        }
    })
}
