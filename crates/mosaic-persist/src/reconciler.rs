//! Message mutations
//!
//! These are the only operations that touch message contents. Every one
//! addresses its thread by id and quietly does nothing when that thread has
//! since been deleted; the returned `bool` reports whether anything changed.
//!
//! Together they hold two invariants per thread: at most one message has
//! `is_streaming` set, and a message never goes back to streaming once
//! finalized.

use mosaic_types::Message;

use crate::store::ThreadStore;

impl ThreadStore {
    /// Append a message to the end of a thread
    ///
    /// A streaming placeholder is refused while another one is still open
    /// on the same thread.
    pub fn append(&mut self, thread_id: &str, message: Message) -> bool {
        let Some(thread) = self.thread_mut(thread_id) else {
            tracing::debug!(thread_id = %thread_id, "Append skipped, thread is gone");
            return false;
        };

        if message.is_streaming && thread.streaming_message().is_some() {
            tracing::warn!(thread_id = %thread_id, "Refusing second streaming message");
            return false;
        }

        thread.messages.push(message);
        true
    }

    /// Replace the content of a streaming message with the accumulated text
    pub fn update_streaming_content(
        &mut self,
        thread_id: &str,
        message_id: &str,
        content: impl Into<String>,
    ) -> bool {
        match self.streaming_target(thread_id, message_id) {
            Some(message) => {
                message.content = content.into();
                true
            }
            None => false,
        }
    }

    /// Set final content and close the stream; later calls are no-ops
    pub fn finalize(
        &mut self,
        thread_id: &str,
        message_id: &str,
        content: impl Into<String>,
    ) -> bool {
        match self.streaming_target(thread_id, message_id) {
            Some(message) => {
                message.content = content.into();
                message.is_streaming = false;
                true
            }
            None => false,
        }
    }

    /// Swap a placeholder for its replacement in a single step
    ///
    /// The replacement takes the placeholder's position. If the placeholder
    /// is already gone the replacement is appended so no answer is lost.
    pub fn remove_and_replace(
        &mut self,
        thread_id: &str,
        message_id: &str,
        mut replacement: Message,
    ) -> bool {
        let Some(thread) = self.thread_mut(thread_id) else {
            tracing::debug!(thread_id = %thread_id, "Replace skipped, thread is gone");
            return false;
        };

        let position = thread.messages.iter().position(|m| m.has_id(message_id));
        let other_streaming = thread
            .messages
            .iter()
            .any(|m| m.is_streaming && !m.has_id(message_id));
        if replacement.is_streaming && other_streaming {
            replacement.is_streaming = false;
        }

        match position {
            Some(index) => thread.messages[index] = replacement,
            None => thread.messages.push(replacement),
        }
        true
    }

    /// Drop a message outright
    pub fn remove(&mut self, thread_id: &str, message_id: &str) -> bool {
        let Some(thread) = self.thread_mut(thread_id) else {
            return false;
        };
        let before = thread.messages.len();
        thread.messages.retain(|m| !m.has_id(message_id));
        thread.messages.len() != before
    }

    fn streaming_target(&mut self, thread_id: &str, message_id: &str) -> Option<&mut Message> {
        let thread = self.thread_mut(thread_id)?;
        let message = thread.message_mut(message_id)?;
        if !message.is_streaming {
            tracing::debug!(message_id = %message_id, "Message already finalized");
            return None;
        }
        Some(message)
    }
}
