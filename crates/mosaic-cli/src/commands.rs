use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mosaic_client::DocumentUpload;
use mosaic_engine::{
    resolve_mode, Engine, ImageInput, Message, PhotoMode, SendInput, TopMode, ViewKind,
};
use mosaic_types::{split_links, Segment, ToolRecord};
use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Debug, Parser)]
#[command(name = "mosaic", version, about = "Multimodal assistant client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a message and print the reply
    Send(SendArgs),
    /// List threads (the active one is marked with *)
    Threads,
    /// Start a new thread and make it active
    NewThread,
    DeleteThread {
        id: String,
    },
    RenameThread {
        id: String,
        name: String,
    },
    /// Print a thread as seen in one view
    Show {
        thread_id: String,
        #[arg(long, default_value = "chat")]
        view: ViewKind,
    },
    /// Upload documents for retrieval
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List generated images, newest first
    Gallery {
        #[arg(long)]
        limit: Option<usize>,
    },
    GalleryDelete {
        id: i64,
    },
    GalleryClear,
    /// Print the server-side memory of a thread
    History {
        thread_id: String,
    },
    ClearHistory {
        thread_id: String,
    },
}

#[derive(Debug, Parser)]
pub struct SendArgs {
    pub text: String,
    #[arg(long, default_value = "chat")]
    pub mode: TopMode,
    #[arg(long, default_value = "generate")]
    pub photo: PhotoMode,
    /// Image to analyze
    #[arg(long)]
    pub image: Option<PathBuf>,
    /// Target thread instead of the active one
    #[arg(long)]
    pub thread: Option<String>,
}

impl Command {
    /// Whether the thread snapshot needs saving afterwards
    pub fn mutates_threads(&self) -> bool {
        matches!(
            self,
            Command::Send(_)
                | Command::NewThread
                | Command::DeleteThread { .. }
                | Command::RenameThread { .. }
        )
    }
}

pub async fn run(command: Command, engine: &Engine) -> Result<()> {
    match command {
        Command::Send(args) => send(args, engine).await,
        Command::Threads => {
            let active = engine.active_thread().await.map(|t| t.id);
            for thread in engine.threads().await {
                let marker = if active.as_deref() == Some(thread.id.as_str()) { "*" } else { " " };
                println!(
                    "{} {}  {}  ({} messages)",
                    marker,
                    thread.id,
                    thread.name,
                    thread.messages.len()
                );
            }
            Ok(())
        }
        Command::NewThread => {
            let thread = engine.create_thread().await;
            println!("{}  {}", thread.id, thread.name);
            Ok(())
        }
        Command::DeleteThread { id } => {
            let removed = engine.delete_thread(&id).await?;
            println!("Deleted {}", removed.name);
            Ok(())
        }
        Command::RenameThread { id, name } => {
            engine.rename_thread(&id, &name).await?;
            Ok(())
        }
        Command::Show { thread_id, view } => {
            for message in engine.view(&thread_id, view).await? {
                print_message(&message);
            }
            Ok(())
        }
        Command::Upload { files } => upload(files, engine).await,
        Command::Gallery { limit } => {
            for item in engine.load_gallery(limit).await? {
                println!(
                    "{:>6}  {}  {}",
                    item.id,
                    item.image_url,
                    item.prompt.unwrap_or_default()
                );
            }
            Ok(())
        }
        Command::GalleryDelete { id } => {
            engine.delete_gallery_item(id).await?;
            Ok(())
        }
        Command::GalleryClear => {
            let deleted = engine.clear_gallery().await?;
            println!("Removed {} images", deleted);
            Ok(())
        }
        Command::History { thread_id } => {
            let history = engine.fetch_history(&thread_id).await?;
            for entry in history.history {
                println!("{}", entry);
            }
            Ok(())
        }
        Command::ClearHistory { thread_id } => {
            engine.clear_history(&thread_id).await?;
            Ok(())
        }
    }
}

async fn send(args: SendArgs, engine: &Engine) -> Result<()> {
    let mode = resolve_mode(args.mode, args.photo);
    let mut input = SendInput::new(args.text, mode);
    if let Some(path) = &args.image {
        input = input.with_image(ImageInput::from_path(path).await?);
    }
    if let Some(thread_id) = args.thread {
        input = input.on_thread(thread_id);
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let (outcome, streamed) = tokio::join!(engine.send_with_progress(input, Some(tx)), async {
        let mut streamed = false;
        while let Some(event) = rx.recv().await {
            if let mosaic_client::StreamEvent::Delta { content } = event {
                eprint!("{}", content);
                streamed = true;
            }
        }
        streamed
    });
    if streamed {
        eprintln!();
    }

    let outcome = outcome?;
    tracing::debug!(delivery = ?outcome.delivery, failed = outcome.failed, "Send finished");
    print_message(&outcome.reply);
    Ok(())
}

async fn upload(files: Vec<PathBuf>, engine: &Engine) -> Result<()> {
    let mut uploads = Vec::with_capacity(files.len());
    for path in &files {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        uploads.push(DocumentUpload::new(name, bytes));
    }

    let outcome = engine.upload_documents(uploads).await?;
    for record in &outcome.committed {
        println!("{}  {} bytes  via {}", record.name, record.size, record.method);
    }
    for warning in &outcome.warnings {
        eprintln!("warning: {}", warning);
    }
    Ok(())
}

fn print_message(message: &Message) {
    let mut text = String::new();
    for segment in split_links(&message.content) {
        match segment {
            Segment::Text(t) => text.push_str(&t),
            Segment::Link { text: label, url } => text.push_str(&format!("{} <{}>", label, url)),
        }
    }

    println!("[{}] {}", message.role.as_str(), text);
    if let Some(image) = &message.image {
        println!("    image: {}", image);
    }
    if let Some(url) = &message.image_url {
        println!("    generated: {}", url);
    }
    for tool in &message.tools {
        match tool {
            ToolRecord::Tool { name, result } => println!("    tool {} -> {}", name, result),
            ToolRecord::Image { url, .. } => println!("    image tool -> {}", url),
            ToolRecord::Rag { docs } => println!("    sources: {}", docs.join(", ")),
        }
    }
}
