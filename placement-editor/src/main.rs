use placement_editor::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shared::init_logging();
    let config = config::Config::load(std::path::Path::new(config::DEFAULT_SETTINGS_PATH))?;
    let editor = Editor::from_config(&config)?;

    let (destroyer_tx, destroyer_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = destroyer_tx.send(());
        }
    });
    editor.run(destroyer_rx).await;
    Ok(())
}
