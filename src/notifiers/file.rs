use crate::notifiers::{Alert, Notifier};
use crate::WatchError;
use async_trait::async_trait;
use log::info;
use std::path::PathBuf;
use tokio::fs;

/// Writes each alert's attachment into a directory instead of mailing it.
/// Useful for refreshing a local copy of the published baseline files.
pub struct FileNotifier {
    dir: PathBuf,
}

impl FileNotifier {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileNotifier { dir: dir.into() }
    }
}

#[async_trait]
impl Notifier for FileNotifier {
    fn name(&self) -> &str {
        "file"
    }

    async fn send(&self, alert: &Alert) -> Result<(), WatchError> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(&alert.attachment.filename);
        fs::write(&path, &alert.attachment.content).await?;
        info!("{}: wrote {}", alert.text, path.display());
        Ok(())
    }
}
