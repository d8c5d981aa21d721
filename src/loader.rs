use crate::errors::{LoadError, ScriptError};
use serde::Serialize;
use std::future::Future;
use tracing::{error, info, warn};

pub const PRIMARY_CDN_HOST: &str = "cdn.jsdelivr.net";
pub const MIRROR_CDN_HOST: &str = "cdnjs.cloudflare.com/ajax/libs";
pub const LOCAL_PREFIX: &str = "/static/";

/// local → primary CDN → mirror.
pub const MAX_FALLBACK_HOPS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Asset {
    ChartLibrary,
    LabelPlugin,
}

impl Asset {
    pub fn local_path(self) -> &'static str {
        match self {
            Asset::ChartLibrary => "/static/js/vendor/chart.min.js",
            Asset::LabelPlugin => "/static/js/vendor/chartjs-plugin-datalabels.min.js",
        }
    }

    pub fn cdn_url(self) -> &'static str {
        match self {
            Asset::ChartLibrary => "https://cdn.jsdelivr.net/npm/chart.js@3.9.1/dist/chart.min.js",
            Asset::LabelPlugin => "https://cdn.jsdelivr.net/npm/chartjs-plugin-datalabels@2.0.0",
        }
    }

    pub fn recognize(url: &str) -> Option<Self> {
        if url.contains("chart.min.js") {
            Some(Asset::ChartLibrary)
        } else if url.contains("datalabels") {
            Some(Asset::LabelPlugin)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRequest {
    pub url: String,
    pub integrity: Option<String>,
    pub cross_origin: Option<&'static str>,
    pub async_load: bool,
}

impl ScriptRequest {
    pub fn new(url: impl Into<String>, integrity: Option<&str>) -> Self {
        let integrity = integrity.map(str::to_string);
        Self {
            url: url.into(),
            cross_origin: integrity.as_ref().map(|_| "anonymous"),
            integrity,
            async_load: true,
        }
    }
}

pub trait ScriptHost: Send + Sync {
    fn is_available(&self, asset: Asset) -> bool;

    fn load(&self, request: &ScriptRequest) -> impl Future<Output = Result<(), ScriptError>> + Send;
}

pub fn fallback_for(url: &str) -> Option<String> {
    if url.contains(PRIMARY_CDN_HOST) {
        return Some(url.replace(PRIMARY_CDN_HOST, MIRROR_CDN_HOST));
    }
    if url.starts_with(LOCAL_PREFIX) {
        return Asset::recognize(url).map(|asset| asset.cdn_url().to_string());
    }
    None
}

pub async fn load<S: ScriptHost>(
    host: &S,
    url: &str,
    integrity: Option<&str>,
) -> Result<String, LoadError> {
    let mut request = ScriptRequest::new(url, integrity);
    let mut attempts = 0;

    loop {
        attempts += 1;
        info!(url = %request.url, attempt = attempts, "loading script");
        let err = match host.load(&request).await {
            Ok(()) => {
                info!(url = %request.url, "script loaded");
                return Ok(request.url);
            }
            Err(err) => err,
        };
        warn!(url = %request.url, "script failed to load: {err}");

        let next = if attempts <= MAX_FALLBACK_HOPS {
            fallback_for(&request.url)
        } else {
            None
        };
        match next {
            Some(next) => {
                info!(from = %request.url, to = %next, "trying fallback source");
                request = ScriptRequest::new(next, None);
            }
            None => {
                error!(url, attempts, "no script source left to try");
                return Err(LoadError {
                    url: url.to_string(),
                    attempts,
                    last: err,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeScripts;

    #[test]
    fn fallback_chain_for_known_assets() {
        let local = Asset::ChartLibrary.local_path();
        let cdn = fallback_for(local).unwrap();
        assert_eq!(cdn, Asset::ChartLibrary.cdn_url());
        assert_eq!(
            fallback_for(&cdn).unwrap(),
            "https://cdnjs.cloudflare.com/ajax/libs/npm/chart.js@3.9.1/dist/chart.min.js"
        );
        assert_eq!(fallback_for(&fallback_for(&cdn).unwrap()), None);

        let plugin = fallback_for(Asset::LabelPlugin.local_path()).unwrap();
        assert_eq!(plugin, Asset::LabelPlugin.cdn_url());
    }

    #[test]
    fn unknown_local_asset_has_no_fallback() {
        assert_eq!(fallback_for("/static/js/vendor/other.js"), None);
        assert_eq!(fallback_for("https://example.com/chart.min.js"), None);
    }

    #[test]
    fn integrity_marks_request_cross_origin() {
        let request = ScriptRequest::new("https://cdn.jsdelivr.net/x.js", Some("sha384-abc"));
        assert_eq!(request.cross_origin, Some("anonymous"));
        assert!(request.async_load);
        assert_eq!(ScriptRequest::new("/static/x.js", None).cross_origin, None);
    }

    #[tokio::test]
    async fn local_failure_falls_back_to_cdn_once() {
        let host = FakeScripts::new().failing(Asset::ChartLibrary.local_path());

        let loaded = load(&host, Asset::ChartLibrary.local_path(), None).await.unwrap();

        assert_eq!(loaded, Asset::ChartLibrary.cdn_url());
        assert_eq!(
            host.requested(),
            vec![Asset::ChartLibrary.local_path(), Asset::ChartLibrary.cdn_url()]
        );
    }

    #[tokio::test]
    async fn cdn_failure_falls_back_to_mirror() {
        let cdn = Asset::LabelPlugin.cdn_url();
        let host = FakeScripts::new().failing(cdn);

        let loaded = load(&host, cdn, Some("sha384-xyz")).await.unwrap();

        assert!(loaded.starts_with("https://cdnjs.cloudflare.com/ajax/libs/"));
        let requests = host.requests();
        assert_eq!(requests[0].integrity.as_deref(), Some("sha384-xyz"));
        assert_eq!(requests[1].integrity, None);
    }

    #[tokio::test]
    async fn exhausted_chain_stops_after_two_hops() {
        let host = FakeScripts::new().offline();

        let err = load(&host, Asset::ChartLibrary.local_path(), None).await.unwrap_err();

        assert_eq!(err.attempts, 3);
        assert_eq!(host.requested().len(), 3);
        assert_eq!(err.url, Asset::ChartLibrary.local_path());
    }

    #[tokio::test]
    async fn unrecognized_asset_fails_without_retry() {
        let host = FakeScripts::new().offline();
        let err = load(&host, "/static/js/vendor/other.js", None).await.unwrap_err();
        assert_eq!(err.attempts, 1);
    }
}
