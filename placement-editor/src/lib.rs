pub mod bridge;
pub mod clipboard;
pub mod config;
pub mod console;
pub mod document;
pub mod error;
pub mod projector;
pub mod result;
pub mod storage;
pub mod store;

use bridge::PersistenceBridge;
use clipboard::Clipboard;
use console::{Command, Target};
use document::DocumentIo;
use error::ConsoleError;
use projector::{SceneGraph, SceneProjector};
use result::EditorResult;
use shared::{ConnectionStatus, ContextRole, ObjectKey, ObjectPatch, StorageEvent};
use storage::FileStorage;
use store::TransformStore;

use futures::{select, FutureExt, StreamExt};
use log::{debug, error, info, warn};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_stream::wrappers::{BroadcastStream, IntervalStream};

/// The editing context: owns the transform store and answers console commands.
pub struct Editor {
    store: TransformStore,
    document: DocumentIo,
    clipboard: Clipboard,
    preview: SceneGraph,
    main_app: ConnectionStatus,
    status_interval: Duration,
}

impl Editor {
    pub fn from_config(config: &config::Config) -> anyhow::Result<Self> {
        let storage = FileStorage::open(&config.storage_dir)?;
        let bridge = PersistenceBridge::new(
            Box::new(storage),
            ContextRole::Editor,
            config.connection_timeout(),
        );
        Ok(Self::new(
            TransformStore::new(bridge),
            DocumentIo::from_config(config),
            Clipboard::new(config.clipboard_command.clone()),
            config.status_interval(),
        ))
    }

    pub fn new(
        store: TransformStore,
        document: DocumentIo,
        clipboard: Clipboard,
        status_interval: Duration,
    ) -> Self {
        let mut preview = SceneGraph::default();
        preview.project_all(store.snapshot());
        Self {
            store,
            document,
            clipboard,
            preview,
            main_app: ConnectionStatus::Disconnected,
            status_interval,
        }
    }

    pub fn store(&self) -> &TransformStore {
        &self.store
    }

    pub fn preview(&self) -> &SceneGraph {
        &self.preview
    }

    /// Start-up load. A missing or broken document is not an error here: the
    /// built-in values stay in place and the editor keeps running.
    pub async fn load_initial_document(&mut self) {
        match self.document.load_into(&mut self.store).await {
            Ok(loaded) => info!("Loaded {} object(s) from the config document", loaded.len()),
            Err(e) => warn!(
                "Config document unavailable ({}), using built-in placements",
                e
            ),
        }
    }

    pub async fn run(mut self, destroyer: oneshot::Receiver<()>) {
        let mut status_ticks =
            IntervalStream::new(tokio::time::interval(self.status_interval)).fuse();
        // Subscribed before the initial load so the preview sees it.
        let mut local_events = BroadcastStream::new(self.store.bridge().subscribe()).fuse();

        let stdin = tokio::io::stdin();
        let mut reader =
            tokio_util::codec::FramedRead::new(stdin, tokio_util::codec::LinesCodec::new()).fuse();
        let mut destroyer = destroyer.fuse();

        self.load_initial_document().await;
        info!("Editor is running, type \"help\" for commands");
        'main: loop {
            select! {
                _ = status_ticks.next() => {
                    self.poll_status();
                },
                event = local_events.select_next_some() => {
                    match event {
                        Ok(event) => self.on_storage_event(&event),
                        Err(e) => debug!("Preview missed storage events: {}", e),
                    }
                },
                line = reader.next() => {
                    match line {
                        Some(Ok(line)) => {
                            if !self.on_console_input(&line).await {
                                break 'main;
                            }
                        }
                        Some(Err(e)) => warn!("Could not read console input: {}", e),
                        None => info!("Console input closed"),
                    }
                },
                _ = destroyer => {
                    info!("Shutdown requested. Shutting down");
                    break 'main;
                },
            }
        }
    }

    fn poll_status(&mut self) {
        let status = self.store.bridge().poll_connection(shared::now_millis());
        if status != self.main_app {
            info!("Main application {}", status);
            self.main_app = status;
        }
    }

    fn on_storage_event(&mut self, event: &StorageEvent) {
        if let Some(key) = self.preview.apply_event(event) {
            debug!("Preview updated for {}", key);
        }
    }

    /// Returns false when the user asked to quit.
    pub async fn on_console_input(&mut self, line: &str) -> bool {
        match console::parse(line) {
            Ok(None) => true,
            Ok(Some(Command::Quit)) => false,
            Ok(Some(command)) => {
                match self.execute(command).await {
                    Ok(Some(reply)) => println!("{}", reply),
                    Ok(None) => {}
                    Err(e) => error!("{}", e),
                }
                true
            }
            Err(e) => {
                error!("{}", e);
                true
            }
        }
    }

    /// Runs one command. A failure leaves every transform as it was.
    pub async fn execute(&mut self, command: Command) -> EditorResult<Option<String>> {
        let reply = match command {
            Command::Help => console::HELP.to_string(),
            Command::Get(Some(key)) => console::describe(&self.store.get(key)),
            Command::Get(None) => ObjectKey::ALL
                .iter()
                .map(|key| console::describe(&self.store.get(*key)))
                .collect::<Vec<_>>()
                .join("\n"),
            Command::Set {
                key,
                field,
                axis,
                values,
            } => {
                let patch =
                    console::build_patch(&self.store.get(key), &field, axis.as_deref(), &values)?;
                console::describe(&self.store.update(patch))
            }
            Command::Patch { key, json } => {
                let value = serde_json::from_str(&json).map_err(ConsoleError::Patch)?;
                let patch = ObjectPatch::from_value(key, value).map_err(ConsoleError::Patch)?;
                console::describe(&self.store.update(patch))
            }
            Command::Import(Target::One(key)) => {
                let transform = self.document.import_object(key).await?;
                self.store.replace_all(transform.clone());
                console::describe(&transform)
            }
            Command::Import(Target::All) => {
                let loaded = self.document.load_into(&mut self.store).await?;
                let names: Vec<&str> = loaded.iter().map(|key| key.as_str()).collect();
                format!("Imported {}", names.join(", "))
            }
            Command::Reset(Target::One(key)) => {
                console::describe(&self.document.reset_object(key, &mut self.store).await?)
            }
            Command::Reset(Target::All) => {
                // Each object on its own; one failing does not stop the others.
                let mut lines = vec![];
                for key in ObjectKey::ALL.iter().copied() {
                    match self.document.reset_object(key, &mut self.store).await {
                        Ok(_) => lines.push(format!("{} reset", key)),
                        Err(e) => {
                            error!("Resetting {} failed: {}", key, e);
                            lines.push(format!("{} not reset: {}", key, e));
                        }
                    }
                }
                lines.join("\n")
            }
            Command::Export(key) => self.document.export_object(&self.store.get(key)).await?,
            Command::Copy(key) => {
                self.document
                    .copy_object(&self.store.get(key), &self.clipboard)
                    .await?;
                format!(
                    "Copied the config document with the current {} to the clipboard",
                    key
                )
            }
            Command::Status => {
                self.poll_status();
                format!("Main application: {}", self.main_app)
            }
            Command::Quit => return Ok(None),
        };
        Ok(Some(reply))
    }
}
