use futures::StreamExt;
use mosaic_client::{
    Backend, CanonicalMode, ChatRequest, ChatResponse, DocumentUpload, GalleryItem,
    HistoryResponse, Settings, StreamEvent,
};
use mosaic_persist::{PersistError, SnapshotStore, ThreadStore};
use mosaic_types::{Message, Thread, ViewKind};
use std::collections::HashSet;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{mpsc, Mutex, RwLock};

use crate::accumulator::{annotate_failure, IngestStep, StreamIngest};
use crate::documents::{accepted_records, DocumentRecord, UploadOutcome};
use crate::error::{EngineError, Result};
use crate::request::{ImageInput, RequestBuilder};
use crate::router::filter_messages;

/// One user action to send
#[derive(Debug, Clone)]
pub struct SendInput {
    pub text: String,
    pub mode: CanonicalMode,
    pub image: Option<ImageInput>,
    /// Target thread; the active thread when unset
    pub thread_id: Option<String>,
}

impl SendInput {
    pub fn new(text: impl Into<String>, mode: CanonicalMode) -> Self {
        Self {
            text: text.into(),
            mode,
            image: None,
            thread_id: None,
        }
    }

    pub fn with_image(mut self, image: ImageInput) -> Self {
        self.image = Some(image);
        self
    }

    pub fn on_thread(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }
}

/// How the reply was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Single `/chat` request
    Direct,
    /// `/chat/stream` ran to completion
    Streamed,
    /// Stream escalated to a synchronous `/chat`
    Fallback,
}

#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub thread_id: String,
    pub delivery: Delivery,
    /// The assistant message as it ended up in the thread
    pub reply: Message,
    /// The reply is an error report rather than an answer
    pub failed: bool,
}

/// Marks a thread busy for the lifetime of one send
struct SendGuard<'a> {
    in_flight: &'a StdMutex<HashSet<String>>,
    thread_id: String,
}

impl<'a> SendGuard<'a> {
    fn acquire(in_flight: &'a StdMutex<HashSet<String>>, thread_id: &str) -> Result<Self> {
        let mut busy = in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !busy.insert(thread_id.to_string()) {
            return Err(EngineError::SendInProgress(thread_id.to_string()));
        }
        Ok(Self {
            in_flight,
            thread_id: thread_id.to_string(),
        })
    }
}

impl Drop for SendGuard<'_> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.thread_id);
    }
}

/// Drives sends against the backend and owns all conversation state
///
/// Every message mutation goes through the thread store's reconciler
/// operations. The store lock is never held across a network await, so
/// stream updates, fallback swaps and thread management interleave only at
/// I/O boundaries.
pub struct Engine {
    backend: Arc<dyn Backend>,
    snapshot: Arc<dyn SnapshotStore>,
    store: Mutex<ThreadStore>,
    settings: RwLock<Settings>,
    documents: Mutex<Vec<DocumentRecord>>,
    gallery: Mutex<Vec<GalleryItem>>,
    in_flight: StdMutex<HashSet<String>>,
    base_url: String,
}

impl Engine {
    pub(crate) fn new(
        backend: Arc<dyn Backend>,
        snapshot: Arc<dyn SnapshotStore>,
        store: ThreadStore,
        settings: Settings,
        base_url: String,
    ) -> Self {
        Self {
            backend,
            snapshot,
            store: Mutex::new(store),
            settings: RwLock::new(settings),
            documents: Mutex::new(Vec::new()),
            gallery: Mutex::new(Vec::new()),
            in_flight: StdMutex::new(HashSet::new()),
            base_url,
        }
    }

    /// Create a builder for fluent construction
    pub fn builder() -> crate::builder::EngineBuilder {
        crate::builder::EngineBuilder::new()
    }

    // ------------------------------------------------------------------
    // Sending
    // ------------------------------------------------------------------

    pub async fn send(&self, input: SendInput) -> Result<SendOutcome> {
        self.send_with_progress(input, None).await
    }

    /// Like [`Engine::send`], also forwarding each stream event as it is applied
    pub async fn send_with_progress(
        &self,
        input: SendInput,
        progress: Option<mpsc::UnboundedSender<StreamEvent>>,
    ) -> Result<SendOutcome> {
        if input.text.trim().is_empty() && input.image.is_none() {
            return Err(EngineError::EmptyInput);
        }

        let thread_id = match input.thread_id.clone() {
            Some(id) => id,
            None => self
                .store
                .lock()
                .await
                .active_id()
                .map(str::to_string)
                .ok_or(EngineError::NoActiveThread)?,
        };

        let _guard = SendGuard::acquire(&self.in_flight, &thread_id)?;
        let settings = self.settings.read().await.clone();

        let request = {
            let mut store = self.store.lock().await;
            if store.thread(&thread_id).is_none() {
                return Err(PersistError::ThreadNotFound(thread_id).into());
            }

            let mut user_message = Message::user(input.text.clone()).with_mode(input.mode);
            if let Some(image) = &input.image {
                user_message = user_message.with_image(image.path.clone());
            }
            store.append(&thread_id, user_message);

            let messages = store
                .thread(&thread_id)
                .map(|t| t.messages.as_slice())
                .unwrap_or_default();

            RequestBuilder::new(thread_id.clone(), input.mode)
                .text(input.text)
                .image(input.image.as_ref())
                .settings(settings.clone())
                .history_from(messages)
                .build()?
        };

        let streaming = settings.enable_streaming
            && settings.enable_agent
            && request.mode.supports_streaming()
            && request.image_base64.is_none();

        tracing::info!(
            thread_id = %thread_id,
            mode = %request.mode,
            streaming,
            history = request.history.len(),
            "Sending message"
        );

        if streaming {
            Ok(self.run_stream(&thread_id, &request, progress).await)
        } else {
            Ok(self.run_direct(&thread_id, &request).await)
        }
    }

    async fn run_direct(&self, thread_id: &str, request: &ChatRequest) -> SendOutcome {
        match self.backend.chat(request).await {
            Ok(response) => {
                let has_image = response.image_url.is_some();
                let reply = reply_message(response, request.mode);
                self.store.lock().await.append(thread_id, reply.clone());

                if has_image && request.mode == CanonicalMode::ImageGen {
                    self.refresh_gallery().await;
                }

                SendOutcome {
                    thread_id: thread_id.to_string(),
                    delivery: Delivery::Direct,
                    reply,
                    failed: false,
                }
            }
            Err(e) => self.transport_failure(thread_id, e, Delivery::Direct).await,
        }
    }

    /// A request that got no response becomes a plain assistant error message
    async fn transport_failure(
        &self,
        thread_id: &str,
        error: anyhow::Error,
        delivery: Delivery,
    ) -> SendOutcome {
        tracing::error!(thread_id = %thread_id, "Chat request failed: {:#}", error);
        let reply = Message::assistant(format!(
            "Error: {:#}. Make sure the backend is running at {}",
            error, self.base_url
        ));
        self.store.lock().await.append(thread_id, reply.clone());

        SendOutcome {
            thread_id: thread_id.to_string(),
            delivery,
            reply,
            failed: true,
        }
    }

    async fn run_stream(
        &self,
        thread_id: &str,
        request: &ChatRequest,
        progress: Option<mpsc::UnboundedSender<StreamEvent>>,
    ) -> SendOutcome {
        // No placeholder until the server has answered
        let mut events = match self.backend.chat_stream(request).await {
            Ok(events) => events,
            Err(e) => return self.transport_failure(thread_id, e, Delivery::Streamed).await,
        };

        let placeholder = Message::streaming_placeholder(request.mode);
        let message_id = placeholder.id.clone().unwrap_or_default();
        self.store.lock().await.append(thread_id, placeholder);

        let mut ingest = StreamIngest::new();

        let step = loop {
            let step = match events.next().await {
                Some(Ok(event)) => {
                    if let Some(tx) = &progress {
                        let _ = tx.send(event.clone());
                    }
                    ingest.push(event)
                }
                Some(Err(e)) => ingest.transport_error(format!("{:#}", e)),
                None => ingest.close(),
            };

            match step {
                IngestStep::Update(content) => {
                    self.store
                        .lock()
                        .await
                        .update_streaming_content(thread_id, &message_id, content);
                }
                IngestStep::Ignore => {}
                terminal => break terminal,
            }
        };

        match step {
            IngestStep::Finalize(content) => {
                self.store
                    .lock()
                    .await
                    .finalize(thread_id, &message_id, content);
                tracing::debug!(thread_id = %thread_id, deltas = ingest.deltas(), "Stream finished");
                self.outcome(thread_id, &message_id, Delivery::Streamed, false).await
            }
            IngestStep::Escalate => self.run_fallback(thread_id, &message_id, request).await,
            IngestStep::Fail(reason) => {
                tracing::error!(thread_id = %thread_id, "Stream failed: {}", reason);
                let content = annotate_failure(ingest.accumulated(), &reason);
                self.store
                    .lock()
                    .await
                    .finalize(thread_id, &message_id, content);
                self.outcome(thread_id, &message_id, Delivery::Streamed, true).await
            }
            // The loop only breaks on terminal steps
            IngestStep::Update(_) | IngestStep::Ignore => {
                self.outcome(thread_id, &message_id, Delivery::Streamed, true).await
            }
        }
    }

    /// Replace the placeholder with a synchronous answer to the same request
    async fn run_fallback(
        &self,
        thread_id: &str,
        message_id: &str,
        request: &ChatRequest,
    ) -> SendOutcome {
        tracing::info!(thread_id = %thread_id, "Server requested tool work, retrying without streaming");

        match self.backend.chat(request).await {
            Ok(response) => {
                let reply = reply_message(response, request.mode);
                self.store
                    .lock()
                    .await
                    .remove_and_replace(thread_id, message_id, reply.clone());

                SendOutcome {
                    thread_id: thread_id.to_string(),
                    delivery: Delivery::Fallback,
                    reply,
                    failed: false,
                }
            }
            Err(e) => {
                tracing::error!(thread_id = %thread_id, "Fallback request failed: {:#}", e);
                let content = annotate_failure("", &format!("{:#}", e));
                self.store
                    .lock()
                    .await
                    .finalize(thread_id, message_id, content);
                self.outcome(thread_id, message_id, Delivery::Fallback, true).await
            }
        }
    }

    async fn outcome(
        &self,
        thread_id: &str,
        message_id: &str,
        delivery: Delivery,
        failed: bool,
    ) -> SendOutcome {
        let reply = self
            .store
            .lock()
            .await
            .thread(thread_id)
            .and_then(|t| t.message(message_id).cloned())
            .unwrap_or_else(|| Message::assistant(String::new()));

        SendOutcome {
            thread_id: thread_id.to_string(),
            delivery,
            reply,
            failed,
        }
    }

    // ------------------------------------------------------------------
    // Threads
    // ------------------------------------------------------------------

    pub async fn threads(&self) -> Vec<Thread> {
        self.store.lock().await.threads().to_vec()
    }

    pub async fn thread(&self, thread_id: &str) -> Option<Thread> {
        self.store.lock().await.thread(thread_id).cloned()
    }

    pub async fn active_thread(&self) -> Option<Thread> {
        self.store.lock().await.active_thread().cloned()
    }

    pub async fn create_thread(&self) -> Thread {
        self.store.lock().await.create_thread().clone()
    }

    pub async fn delete_thread(&self, thread_id: &str) -> Result<Thread> {
        Ok(self.store.lock().await.delete_thread(thread_id)?)
    }

    pub async fn rename_thread(&self, thread_id: &str, name: &str) -> Result<()> {
        Ok(self.store.lock().await.rename_thread(thread_id, name)?)
    }

    pub async fn set_active(&self, thread_id: &str) -> Result<()> {
        Ok(self.store.lock().await.set_active(thread_id)?)
    }

    /// Messages of a thread as shown in one view
    pub async fn view(&self, thread_id: &str, view: ViewKind) -> Result<Vec<Message>> {
        let store = self.store.lock().await;
        let thread = store
            .thread(thread_id)
            .ok_or_else(|| PersistError::ThreadNotFound(thread_id.to_string()))?;
        Ok(filter_messages(&thread.messages, view)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Write every thread to the snapshot
    pub async fn save(&self) -> Result<()> {
        let threads = self.threads().await;
        self.snapshot.save(&threads).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub async fn settings(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Takes effect from the next send
    pub async fn set_settings(&self, settings: Settings) {
        *self.settings.write().await = settings;
    }

    // ------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------

    /// Upload files into the active thread's retrieval corpus
    pub async fn upload_documents(&self, files: Vec<DocumentUpload>) -> Result<UploadOutcome> {
        let thread_id = self
            .store
            .lock()
            .await
            .active_id()
            .map(str::to_string)
            .unwrap_or_default();

        let names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();

        let response = self
            .backend
            .upload_documents(&thread_id, files.clone())
            .await
            .map_err(|e| EngineError::Upload(format!("{:#}", e)))?;

        if response.is_error() {
            let message = response
                .message
                .clone()
                .unwrap_or_else(|| "document upload failed".to_string());
            tracing::error!(files = ?names, "Upload rejected: {}", message);
            return Err(EngineError::Upload(message));
        }

        let committed = accepted_records(&files, &response);

        for warning in &response.warnings {
            tracing::warn!("Upload warning: {}", warning);
        }
        tracing::info!(accepted = committed.len(), submitted = names.len(), "Documents uploaded");

        self.documents.lock().await.extend(committed.iter().cloned());

        Ok(UploadOutcome {
            committed,
            warnings: response.warnings,
        })
    }

    pub async fn documents(&self) -> Vec<DocumentRecord> {
        self.documents.lock().await.clone()
    }

    /// Forget a document locally
    pub async fn remove_document(&self, id: &str) -> bool {
        let mut documents = self.documents.lock().await;
        let before = documents.len();
        documents.retain(|d| d.id != id);
        documents.len() != before
    }

    // ------------------------------------------------------------------
    // Gallery
    // ------------------------------------------------------------------

    /// Last successfully loaded gallery
    pub async fn gallery(&self) -> Vec<GalleryItem> {
        self.gallery.lock().await.clone()
    }

    pub async fn load_gallery(&self, limit: Option<usize>) -> Result<Vec<GalleryItem>> {
        let items = self.backend.list_gallery(limit).await?;
        *self.gallery.lock().await = items.clone();
        Ok(items)
    }

    /// Reload the gallery, keeping the previous list on failure
    pub async fn refresh_gallery(&self) {
        if let Err(e) = self.load_gallery(None).await {
            tracing::warn!("Gallery refresh failed: {}", e);
        }
    }

    pub async fn delete_gallery_item(&self, id: i64) -> Result<()> {
        self.backend.delete_gallery_item(id).await?;
        self.gallery.lock().await.retain(|item| item.id != id);
        Ok(())
    }

    /// Returns how many entries the server removed
    pub async fn clear_gallery(&self) -> Result<usize> {
        let deleted = self.backend.clear_gallery().await?;
        self.gallery.lock().await.clear();
        Ok(deleted)
    }

    // ------------------------------------------------------------------
    // Server-side history
    // ------------------------------------------------------------------

    pub async fn fetch_history(&self, thread_id: &str) -> Result<HistoryResponse> {
        Ok(self.backend.fetch_history(thread_id).await?)
    }

    pub async fn clear_history(&self, thread_id: &str) -> Result<()> {
        Ok(self.backend.clear_history(thread_id).await?)
    }
}

fn reply_message(response: ChatResponse, mode: CanonicalMode) -> Message {
    let mut reply = Message::assistant(response.content)
        .with_mode(mode)
        .with_tools(response.tools);
    if let Some(url) = response.image_url {
        reply = reply.with_image_url(url);
    }
    reply
}
