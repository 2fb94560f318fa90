mod http_status;
mod viewer;

use log::{info, warn};
use placement_editor::bridge::PersistenceBridge;
use placement_editor::config::{Config, DEFAULT_SETTINGS_PATH};
use placement_editor::document::DocumentIo;
use placement_editor::storage::{FileStorage, StorageWatcher};
use shared::ContextRole;
use std::sync::{Arc, Mutex};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shared::init_logging();
    let config = Config::load(std::path::Path::new(DEFAULT_SETTINGS_PATH))?;

    let storage = FileStorage::open(&config.storage_dir)?;
    let watcher = StorageWatcher::watch(storage.dir(), &[ContextRole::MainApp.heartbeat_key()])?;
    let bridge = PersistenceBridge::new(
        Box::new(storage),
        ContextRole::MainApp,
        config.connection_timeout(),
    );

    let document = match DocumentIo::from_config(&config).read_document().await {
        Ok(document) => Some(document),
        Err(e) => {
            warn!("Config document unavailable ({}), using built-in placements", e);
            None
        }
    };
    let transforms = viewer::initial_transforms(document.as_ref(), &bridge);
    info!("Watching {} for editor changes", config.storage_dir.display());

    let state = Arc::new(Mutex::new(viewer::ViewerState::new(transforms)));
    let _http = http_status::spawn_http_status(config.viewer_port, state.clone())?;
    viewer::Viewer::new(bridge, watcher, state)
        .run(config.status_interval())
        .await;
    Ok(())
}
