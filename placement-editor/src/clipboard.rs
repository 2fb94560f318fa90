use crate::error::ClipboardError;
use crate::result::ClipboardResult;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;

/// System clipboard reached through a helper program that reads text on stdin.
#[derive(Debug, Clone, PartialEq)]
pub struct Clipboard {
    command: Option<Vec<String>>,
}

impl Clipboard {
    /// Uses `command` when given, otherwise whatever this platform usually has.
    pub fn new(command: Option<Vec<String>>) -> Self {
        Self {
            command: command.or_else(platform_command),
        }
    }

    pub async fn write_text(&self, text: &str) -> ClipboardResult {
        let command = match &self.command {
            Some(command) if !command.is_empty() => command,
            _ => return Err(ClipboardError::NoCommand),
        };
        let mut child = tokio::process::Command::new(&command[0])
            .args(&command[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ClipboardError::Spawn(command[0].clone(), e))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(ClipboardError::Pipe)?;
            // stdin is dropped here so the helper sees EOF
        }
        let status = child.wait().await.map_err(ClipboardError::Pipe)?;
        if !status.success() {
            return Err(ClipboardError::Exit(status));
        }
        Ok(())
    }
}

fn platform_command() -> Option<Vec<String>> {
    let command: &[&str] = if cfg!(target_os = "macos") {
        &["pbcopy"]
    } else if cfg!(windows) {
        &["clip"]
    } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
        &["wl-copy"]
    } else if std::env::var_os("DISPLAY").is_some() {
        &["xclip", "-selection", "clipboard"]
    } else {
        return None;
    };
    Some(command.iter().map(|s| s.to_string()).collect())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn command(args: &[&str]) -> Option<Vec<String>> {
        Some(args.iter().map(|s| s.to_string()).collect())
    }

    #[tokio::test]
    async fn text_reaches_the_helper() {
        let target = std::env::temp_dir().join(format!(
            "placement-clipboard-{}-{}",
            std::process::id(),
            shared::now_millis()
        ));
        let script = format!("cat > '{}'", target.display());
        let clipboard = Clipboard::new(command(&["sh", "-c", &script]));
        clipboard.write_text("{\n  \"truck\": {}\n}").await.unwrap();
        let written = std::fs::read_to_string(&target).unwrap();
        assert_eq!(written, "{\n  \"truck\": {}\n}");
        let _ = std::fs::remove_file(&target);
    }

    #[tokio::test]
    async fn missing_helper_is_reported() {
        let clipboard = Clipboard::new(command(&["/nonexistent/clipboard-helper"]));
        let result = clipboard.write_text("text").await;
        assert!(matches!(result, Err(ClipboardError::Spawn(_, _))));
    }

    #[tokio::test]
    async fn failing_helper_is_reported() {
        let clipboard = Clipboard::new(command(&["sh", "-c", "cat > /dev/null; exit 3"]));
        let result = clipboard.write_text("text").await;
        assert!(matches!(result, Err(ClipboardError::Exit(_))));
    }

    #[tokio::test]
    async fn empty_command_has_nothing_to_run() {
        let clipboard = Clipboard {
            command: Some(vec![]),
        };
        assert!(matches!(
            clipboard.write_text("text").await,
            Err(ClipboardError::NoCommand)
        ));
    }
}
