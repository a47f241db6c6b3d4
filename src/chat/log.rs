/// Chat log sink — append-only file with a live console mirror.
///
/// Every recorded event becomes a `[HH:MM:SS] <event>` line. Writes go
/// through an unbounded channel to a background task so chat sessions
/// never block on disk; every failure along the way (file open, write,
/// channel closed) is swallowed. Logging must never interrupt chat
/// operation.
use std::path::PathBuf;

use chrono::Local;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Prefix an event with the current wall-clock time, `[HH:MM:SS]`.
pub fn stamp(event: &str) -> String {
    format!("[{}] {event}", Local::now().format("%H:%M:%S"))
}

/// Cloneable handle to the chat log. Cheap to pass into every session.
#[derive(Debug, Clone)]
pub struct ChatLog {
    tx: mpsc::UnboundedSender<String>,
}

impl ChatLog {
    /// Open the log at `path` (created if absent, appended otherwise)
    /// and spawn the writer task. Must be called inside a tokio runtime.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            let mut file = match OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) => {
                    // Sessions keep running without a disk log.
                    warn!(path = %path.display(), "chat log unavailable: {e}");
                    return;
                }
            };

            while let Some(line) = rx.recv().await {
                let _ = file.write_all(line.as_bytes()).await;
                let _ = file.write_all(b"\n").await;
            }
        });

        Self { tx }
    }

    /// Timestamp `event`, mirror it to the console, append it to disk.
    pub fn record(&self, event: &str) {
        self.append(stamp(event));
    }

    /// Mirror and append an already-formatted line verbatim.
    pub fn append(&self, line: String) {
        info!("{line}");
        let _ = self.tx.send(line);
    }
}
