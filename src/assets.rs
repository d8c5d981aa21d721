use crate::errors::ScriptError;
use crate::loader::{Asset, LOCAL_PREFIX, ScriptHost, ScriptRequest};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tokio::fs;
use tracing::debug;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Serves `/static/...` scripts from disk and fetches everything else.
#[derive(Debug)]
pub struct AssetHost {
    static_dir: PathBuf,
    client: reqwest::Client,
    loaded: Mutex<HashSet<Asset>>,
}

impl AssetHost {
    pub fn new(static_dir: PathBuf) -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            static_dir,
            client,
            loaded: Mutex::new(HashSet::new()),
        }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ScriptError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ScriptError::Network(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScriptError::NotFound(format!("{url} ({status})")));
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| ScriptError::Network(err.to_string()))?;
        Ok(body.to_vec())
    }
}

impl ScriptHost for AssetHost {
    fn is_available(&self, asset: Asset) -> bool {
        self.loaded
            .lock()
            .map(|loaded| loaded.contains(&asset))
            .unwrap_or(false)
    }

    async fn load(&self, request: &ScriptRequest) -> Result<(), ScriptError> {
        let body = match request.url.strip_prefix(LOCAL_PREFIX) {
            Some(relative) => read_static(&self.static_dir, relative).await?,
            None => self.fetch(&request.url).await?,
        };
        if let Some(integrity) = &request.integrity {
            verify_integrity(&body, integrity, &request.url)?;
        }
        debug!(url = %request.url, bytes = body.len(), "script body received");

        if let Some(asset) = Asset::recognize(&request.url) {
            if let Ok(mut loaded) = self.loaded.lock() {
                loaded.insert(asset);
            }
        }
        Ok(())
    }
}

/// Reads `relative` under `root`, refusing paths that climb out of it.
pub async fn read_static(root: &Path, relative: &str) -> Result<Vec<u8>, ScriptError> {
    let relative = Path::new(relative);
    if !relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        return Err(ScriptError::NotFound(relative.display().to_string()));
    }
    match fs::read(root.join(relative)).await {
        Ok(bytes) => Ok(bytes),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(ScriptError::NotFound(relative.display().to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

/// Checks `body` against a subresource-integrity value. Any listed hash
/// matching is enough.
pub fn verify_integrity(body: &[u8], integrity: &str, url: &str) -> Result<(), ScriptError> {
    let mut recognized = false;
    for entry in integrity.split_whitespace() {
        let Some((algorithm, expected)) = entry.split_once('-') else {
            continue;
        };
        let digest = match algorithm {
            "sha256" => STANDARD.encode(Sha256::digest(body)),
            "sha384" => STANDARD.encode(Sha384::digest(body)),
            "sha512" => STANDARD.encode(Sha512::digest(body)),
            _ => continue,
        };
        recognized = true;
        if digest == expected {
            return Ok(());
        }
    }
    if !recognized {
        return Err(ScriptError::BadIntegrity(integrity.to_string()));
    }
    Err(ScriptError::Integrity {
        url: url.to_string(),
        expected: integrity.to_string(),
    })
}
