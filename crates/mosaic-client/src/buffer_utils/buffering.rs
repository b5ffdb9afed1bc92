use anyhow::Result;
use std::collections::VecDeque;

/// Circular byte buffer for line-based parsing across transport chunks
///
/// Lines are split on raw `\n` bytes before decoding, so a multi-byte UTF-8
/// character cut in half by a chunk boundary is reassembled before it is
/// ever turned into text.
pub struct CircularLineBuffer {
    buffer: VecDeque<u8>,
}

impl CircularLineBuffer {
    /// Create a new buffer with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    /// Add bytes to the buffer
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend(bytes);
    }

    /// Extract next complete line (up to `\n`), trimmed
    ///
    /// Returns None if no complete line is available; the incomplete tail
    /// stays buffered.
    pub fn next_line(&mut self) -> Option<Result<String>> {
        let newline_pos = self.buffer.iter().position(|&b| b == b'\n')?;

        let line_bytes: Vec<u8> = self.buffer.drain(..=newline_pos).collect();

        Some(decode_trimmed(&line_bytes))
    }

    /// Drain whatever is left, even without a trailing newline
    pub fn take_remainder(&mut self) -> Option<Result<String>> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest: Vec<u8> = self.buffer.drain(..).collect();
        Some(decode_trimmed(&rest))
    }

    /// Bytes held back waiting for their newline
    pub fn pending(&self) -> Vec<u8> {
        self.buffer.iter().copied().collect()
    }

    /// Current buffer size
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

fn decode_trimmed(bytes: &[u8]) -> Result<String> {
    match std::str::from_utf8(bytes) {
        Ok(line) => Ok(line.trim().to_string()),
        Err(e) => Err(anyhow::anyhow!("Invalid UTF-8: {}", e)),
    }
}
