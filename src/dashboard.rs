//! Page-ready orchestration of the finance charts.
//!
//! `NotLoaded → Loading → Ready`; once `Ready`, reloads rebuild every chart
//! from the page's current hidden fields without touching the scripts.

use crate::builders;
use crate::chart::ChartConfig;
use crate::errors::LoadError;
use crate::loader::{self, Asset, ScriptHost};
use crate::models::{FinanceData, LoadState, ResolvedSources, fields, mounts};
use crate::page::{ErrorBlock, Page};
use crate::registry::ChartRegistry;
use crate::render::{ChartHandle, Plugin, Renderer};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Wait before drawing when the scripts were already on the page.
    pub settle: Duration,
    /// Wait before the single re-check of missing anchors.
    pub anchor_retry: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(100),
            anchor_retry: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountOutcome {
    Drawn(ChartHandle),
    Failed(String),
}

/// What one pass of the pipeline did.
#[derive(Debug)]
pub enum PassReport {
    LoadFailed(LoadError),
    MissingAnchors(Vec<String>),
    Rendered(BTreeMap<&'static str, MountOutcome>),
}

impl PassReport {
    pub fn drawn(&self) -> usize {
        match self {
            PassReport::Rendered(outcomes) => outcomes
                .values()
                .filter(|outcome| matches!(outcome, MountOutcome::Drawn(_)))
                .count(),
            _ => 0,
        }
    }
}

pub struct Dashboard<P, R, S> {
    page: P,
    renderer: R,
    scripts: S,
    registry: ChartRegistry,
    timings: Timings,
    state: LoadState,
    sources: ResolvedSources,
}

impl<P, R, S> Dashboard<P, R, S>
where
    P: Page,
    R: Renderer,
    S: ScriptHost,
{
    pub fn new(page: P, renderer: R, scripts: S, timings: Timings) -> Self {
        Self {
            page,
            renderer,
            scripts,
            registry: ChartRegistry::new(),
            timings,
            state: LoadState::NotLoaded,
            sources: ResolvedSources::default(),
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn scripts(&self) -> &S {
        &self.scripts
    }

    pub fn scripts_mut(&mut self) -> &mut S {
        &mut self.scripts
    }

    pub fn registry(&self) -> &ChartRegistry {
        &self.registry
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn sources(&self) -> &ResolvedSources {
        &self.sources
    }

    /// Page-ready entry point: make sure the scripts are there, then draw.
    pub async fn start(&mut self) -> PassReport {
        if self.state != LoadState::Ready {
            if let Err(err) = self.ensure_scripts().await {
                self.state = LoadState::NotLoaded;
                self.show_load_failure();
                return PassReport::LoadFailed(err);
            }
            self.state = LoadState::Ready;
            self.renderer.register_plugin(Plugin::DataLabels);
        }
        self.build_pass().await
    }

    /// Destroys every chart, then rebuilds from the page's current fields.
    pub async fn reload(&mut self) -> PassReport {
        if self.state != LoadState::Ready {
            info!(state = ?self.state, "charting scripts not loaded, starting instead");
            return self.retry().await;
        }
        let destroyed = self.registry.destroy_all(&mut self.renderer);
        info!(destroyed, "reloading finance charts");
        self.reset_mounts();
        self.build_pass().await
    }

    /// The error block's retry control.
    pub async fn retry(&mut self) -> PassReport {
        let destroyed = self.registry.destroy_all(&mut self.renderer);
        info!(destroyed, "retrying finance charts");
        self.reset_mounts();
        self.start().await
    }

    async fn ensure_scripts(&mut self) -> Result<(), LoadError> {
        let has_library = self.scripts.is_available(Asset::ChartLibrary);
        let has_plugin = self.scripts.is_available(Asset::LabelPlugin);

        if has_library && has_plugin {
            info!("charting scripts already present");
            sleep(self.timings.settle).await;
            return Ok(());
        }

        self.state = LoadState::Loading;
        if !has_library {
            info!("charting library not present, loading local copy");
            let library = loader::load(&self.scripts, Asset::ChartLibrary.local_path(), None).await?;
            self.sources.library = Some(library);
            self.load_plugin().await?;
            return Ok(());
        }

        self.load_plugin().await?;
        sleep(self.timings.settle).await;
        Ok(())
    }

    async fn load_plugin(&mut self) -> Result<(), LoadError> {
        let plugin = loader::load(&self.scripts, Asset::LabelPlugin.local_path(), None).await?;
        self.sources.plugin = Some(plugin);
        Ok(())
    }

    async fn build_pass(&mut self) -> PassReport {
        let mut missing = self.missing_anchors();
        if !missing.is_empty() {
            warn!(?missing, delay = ?self.timings.anchor_retry, "chart anchors missing, retrying once");
            sleep(self.timings.anchor_retry).await;
            missing = self.missing_anchors();
        }
        if !missing.is_empty() {
            error!(?missing, "chart anchors still missing, giving up");
            let block = ErrorBlock::missing_anchors(&missing);
            for mount in mounts::ALL {
                if self.page.has_mount(mount) {
                    self.page.set_mount_hidden(mount, true);
                    self.page.append_error(mount, block.clone());
                }
            }
            return PassReport::MissingAnchors(missing);
        }

        let data = FinanceData::extract(&self.page);
        let charts: [(&'static str, ChartConfig); 4] = [
            (mounts::REVENUE_TREND, builders::revenue_trend(&data)),
            (mounts::PLAN_DISTRIBUTION, builders::plan_distribution(&data)),
            (mounts::TOP_PRODUCTS, builders::top_products(&data)),
            (mounts::PRODUCT_BREAKDOWN, builders::product_breakdown(&data)),
        ];

        let mut outcomes = BTreeMap::new();
        for (mount, config) in charts {
            let outcome = match self
                .registry
                .render_at(&mut self.page, &mut self.renderer, mount, config)
            {
                Ok(handle) => MountOutcome::Drawn(handle),
                Err(err) => MountOutcome::Failed(err.to_string()),
            };
            outcomes.insert(mount, outcome);
        }

        let report = PassReport::Rendered(outcomes);
        info!(drawn = report.drawn(), "finance charts rendered");
        report
    }

    fn missing_anchors(&self) -> Vec<String> {
        let fields = fields::ALL.iter().filter(|id| !self.page.has_field(id));
        let mounts = mounts::ALL.iter().filter(|id| !self.page.has_mount(id));
        fields.chain(mounts).map(|id| id.to_string()).collect()
    }

    fn show_load_failure(&mut self) {
        error!("could not load the charting scripts, check the CDN connection or local files");
        for mount in mounts::ALL {
            self.page.set_mount_hidden(mount, true);
            self.page.append_error(mount, ErrorBlock::load_failure());
        }
    }

    fn reset_mounts(&mut self) {
        for mount in mounts::ALL {
            self.page.clear_errors(mount);
            self.page.set_mount_hidden(mount, false);
        }
    }
}
