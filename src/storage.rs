use crate::models::PageSnapshot;
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

/// Reads the hidden field values the page is served with. Missing or
/// corrupt files give an empty page; the charts then draw their defaults.
pub async fn load_snapshot(path: &Path) -> PageSnapshot {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<PageSnapshot>(&bytes) {
            Ok(snapshot) => {
                info!(path = %path.display(), fields = snapshot.fields.len(), "loaded page snapshot");
                snapshot
            }
            Err(err) => {
                error!("failed to parse page snapshot: {err}");
                PageSnapshot::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no page snapshot, starting empty");
            PageSnapshot::default()
        }
        Err(err) => {
            error!("failed to read page snapshot: {err}");
            PageSnapshot::default()
        }
    }
}
