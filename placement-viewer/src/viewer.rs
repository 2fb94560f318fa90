use futures::{select, FutureExt, StreamExt};
use log::{debug, info, warn};
use placement_editor::bridge::PersistenceBridge;
use placement_editor::projector::{SceneGraph, SceneProjector};
use placement_editor::storage::StorageWatcher;
use shared::{
    ConfigDocument, ConnectionStatus, ObjectKey, ObjectTransform, SceneTransforms, StorageEvent,
};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio_stream::wrappers::IntervalStream;

const WATCH_POLL: Duration = Duration::from_millis(100);

/// What the main application currently shows. Read by the status endpoint.
#[derive(Debug, Clone)]
pub struct ViewerState {
    pub transforms: SceneTransforms,
    pub scene: SceneGraph,
    pub editor: ConnectionStatus,
}

impl ViewerState {
    pub fn new(transforms: SceneTransforms) -> Self {
        let mut scene = SceneGraph::default();
        scene.project_all(&transforms);
        Self {
            transforms,
            scene,
            editor: ConnectionStatus::Disconnected,
        }
    }
}

pub type SharedState = Arc<Mutex<ViewerState>>;

pub fn lock(state: &SharedState) -> MutexGuard<'_, ViewerState> {
    // A panic on the endpoint thread leaves the data itself intact.
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Document sections over built-in values, then whatever the editor last
/// mirrored into storage on top.
pub fn initial_transforms(
    document: Option<&ConfigDocument>,
    bridge: &PersistenceBridge,
) -> SceneTransforms {
    let mut transforms = SceneTransforms::default();
    for key in ObjectKey::ALL.iter().copied() {
        if let Some(transform) = document.and_then(|document| document.section(key)) {
            transforms.set(transform);
        }
        if let Some(transform) = bridge.load_slot(key) {
            transforms.set(transform);
        }
    }
    transforms
}

pub struct Viewer {
    bridge: PersistenceBridge,
    watcher: StorageWatcher,
    state: SharedState,
}

impl Viewer {
    pub fn new(bridge: PersistenceBridge, watcher: StorageWatcher, state: SharedState) -> Self {
        Self {
            bridge,
            watcher,
            state,
        }
    }

    pub async fn run(mut self, status_interval: Duration) {
        let mut status_ticks = IntervalStream::new(tokio::time::interval(status_interval)).fuse();
        let mut watch_ticks = IntervalStream::new(tokio::time::interval(WATCH_POLL)).fuse();
        let ctrl_c = tokio::signal::ctrl_c().fuse();
        futures::pin_mut!(ctrl_c);

        info!("Main application is running");
        'main: loop {
            select! {
                _ = status_ticks.next() => {
                    self.on_status_tick();
                },
                _ = watch_ticks.next() => {
                    for event in self.watcher.drain() {
                        apply_storage_event(&self.state, &event);
                    }
                },
                _ = ctrl_c => {
                    info!("Shutdown requested. Shutting down");
                    break 'main;
                },
            }
        }
    }

    fn on_status_tick(&mut self) {
        let now = shared::now_millis();
        if let Err(e) = self.bridge.heartbeat(now) {
            warn!("Could not write heartbeat: {}", e);
        }
        let status = self.bridge.poll_connection(now);
        let mut state = lock(&self.state);
        if state.editor != status {
            info!("Editor {}", status);
            state.editor = status;
        }
    }
}

/// Applies one change seen in storage. Anything that is not a readable
/// transform slot is ignored.
pub fn apply_storage_event(state: &SharedState, event: &StorageEvent) -> Option<ObjectKey> {
    let key = ObjectKey::from_storage_slot(&event.key)?;
    let value = match event.new_value.as_deref() {
        Some(value) => value,
        None => {
            debug!("{} was removed from storage, keeping the last value", event.key);
            return None;
        }
    };
    match ObjectTransform::from_json(key, value) {
        Ok(transform) => {
            let mut state = lock(state);
            state.scene.project(&transform);
            state.transforms.set(transform);
            debug!("Applied {} from storage", key);
            Some(key)
        }
        Err(e) => {
            warn!("Ignoring unreadable {}: {}", event.key, e);
            None
        }
    }
}
