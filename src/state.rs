use crate::assets::AssetHost;
use crate::dashboard::Dashboard;
use crate::models::{PageSnapshot, mounts};
use crate::page::HostPage;
use crate::render::SnapshotRenderer;
use crate::settings::Settings;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

pub type FinanceDashboard = Dashboard<HostPage, SnapshotRenderer, AssetHost>;

#[derive(Clone)]
pub struct AppState {
    pub static_dir: PathBuf,
    pub dashboard: Arc<Mutex<FinanceDashboard>>,
}

impl AppState {
    pub fn new(settings: &Settings, snapshot: PageSnapshot) -> Self {
        let page = snapshot.into_page();
        let renderer = SnapshotRenderer::new(mounts::ALL);
        let scripts = AssetHost::new(settings.static_dir.clone());
        Self {
            static_dir: settings.static_dir.clone(),
            dashboard: Arc::new(Mutex::new(Dashboard::new(
                page,
                renderer,
                scripts,
                settings.timings,
            ))),
        }
    }
}
