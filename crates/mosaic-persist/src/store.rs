use mosaic_types::Thread;

use crate::error::{PersistError, Result};

/// Owns every thread plus the active-thread pointer
///
/// Threads are kept newest first. Message contents are only reachable
/// mutably through the reconciler operations in [`crate::reconciler`].
#[derive(Debug, Clone, Default)]
pub struct ThreadStore {
    threads: Vec<Thread>,
    active: Option<String>,
}

impl ThreadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a snapshot; the first thread becomes active
    pub fn from_threads(threads: Vec<Thread>) -> Self {
        let active = threads.first().map(|t| t.id.clone());
        Self { threads, active }
    }

    /// Guarantee at least one thread exists, creating a default if needed
    pub fn ensure_default(&mut self) -> &Thread {
        if self.threads.is_empty() {
            return self.create_thread();
        }
        if self.active_thread().is_none() {
            self.active = self.threads.first().map(|t| t.id.clone());
        }
        &self.threads[0]
    }

    /// Add a new empty thread at the front and make it active
    pub fn create_thread(&mut self) -> &Thread {
        let thread = Thread::new(format!("Thread {}", self.threads.len() + 1));
        tracing::info!(thread_id = %thread.id, name = %thread.name, "Thread created");

        self.active = Some(thread.id.clone());
        self.threads.insert(0, thread);
        &self.threads[0]
    }

    /// Remove a thread; if it was active the first remaining thread takes over
    pub fn delete_thread(&mut self, thread_id: &str) -> Result<Thread> {
        let index = self.index_of(thread_id)?;
        let removed = self.threads.remove(index);

        if self.active.as_deref() == Some(thread_id) {
            self.active = self.threads.first().map(|t| t.id.clone());
        }

        tracing::info!(
            thread_id = %thread_id,
            active = ?self.active,
            "Thread deleted"
        );
        Ok(removed)
    }

    pub fn rename_thread(&mut self, thread_id: &str, name: impl Into<String>) -> Result<()> {
        let index = self.index_of(thread_id)?;
        self.threads[index].name = name.into();
        Ok(())
    }

    pub fn set_active(&mut self, thread_id: &str) -> Result<()> {
        self.index_of(thread_id)?;
        self.active = Some(thread_id.to_string());
        Ok(())
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_thread(&self) -> Option<&Thread> {
        self.active.as_deref().and_then(|id| self.thread(id))
    }

    pub fn thread(&self, thread_id: &str) -> Option<&Thread> {
        self.threads.iter().find(|t| t.id == thread_id)
    }

    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    pub(crate) fn thread_mut(&mut self, thread_id: &str) -> Option<&mut Thread> {
        self.threads.iter_mut().find(|t| t.id == thread_id)
    }

    fn index_of(&self, thread_id: &str) -> Result<usize> {
        self.threads
            .iter()
            .position(|t| t.id == thread_id)
            .ok_or_else(|| PersistError::ThreadNotFound(thread_id.to_string()))
    }
}
