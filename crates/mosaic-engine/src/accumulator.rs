use mosaic_client::StreamEvent;

/// Failure reason when the body ends without a terminal frame
pub const STREAM_CLOSED_EARLY: &str = "stream closed before completion";

/// What the engine should do with the placeholder after one event
#[derive(Debug, Clone, PartialEq)]
pub enum IngestStep {
    /// Overwrite the placeholder with the accumulated text
    Update(String),
    /// Close the placeholder with this content
    Finalize(String),
    /// Server wants tool work; retry synchronously
    Escalate,
    /// Close the placeholder as failed with this reason
    Fail(String),
    /// Nothing to do
    Ignore,
}

/// Folds ordered stream events into placeholder mutations
///
/// Pure state machine: no I/O, no store access. Once a terminal step has
/// been produced every later input is ignored.
#[derive(Debug, Default)]
pub struct StreamIngest {
    accumulated: String,
    deltas: usize,
    finished: bool,
}

impl StreamIngest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: StreamEvent) -> IngestStep {
        if self.finished {
            return IngestStep::Ignore;
        }

        match event {
            StreamEvent::Delta { content } => {
                self.accumulated.push_str(&content);
                self.deltas += 1;
                IngestStep::Update(self.accumulated.clone())
            }
            StreamEvent::Done { has_tools: true, .. } => {
                self.finished = true;
                IngestStep::Escalate
            }
            StreamEvent::Done { full_content, .. } => {
                self.finished = true;
                IngestStep::Finalize(full_content.unwrap_or_else(|| self.accumulated.clone()))
            }
            StreamEvent::Error { message } => self.fail(message),
        }
    }

    /// The transport failed mid-body
    pub fn transport_error(&mut self, reason: impl Into<String>) -> IngestStep {
        if self.finished {
            return IngestStep::Ignore;
        }
        self.fail(reason.into())
    }

    /// The body ended; only meaningful if no terminal frame arrived
    pub fn close(&mut self) -> IngestStep {
        if self.finished {
            return IngestStep::Ignore;
        }
        tracing::warn!(deltas = self.deltas, "Stream closed without a done frame");
        self.fail(STREAM_CLOSED_EARLY.to_string())
    }

    pub fn accumulated(&self) -> &str {
        &self.accumulated
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn deltas(&self) -> usize {
        self.deltas
    }

    fn fail(&mut self, reason: String) -> IngestStep {
        self.finished = true;
        IngestStep::Fail(reason)
    }
}

/// Content for a placeholder closed by a stream error; partial text is kept
pub fn annotate_failure(partial: &str, reason: &str) -> String {
    if partial.is_empty() {
        format!("Streaming error: {}", reason)
    } else {
        format!("{}\n\n[Streaming error: {}]", partial, reason)
    }
}
