use crate::chart::ChartConfig;
use crate::errors::RenderError;
use crate::page::{ErrorBlock, Page};
use crate::render::{ChartHandle, Renderer};
use crate::sanitize::finite_or_zero;
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

/// Live chart per mount. At most one instance exists per mount.
#[derive(Debug, Default)]
pub struct ChartRegistry {
    charts: BTreeMap<String, ChartHandle>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, mount: &str) -> Option<ChartHandle> {
        self.charts.get(mount).copied()
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Draws `config` at `mount`, replacing whatever is drawn there.
    ///
    /// A construction failure hides the mount and leaves an error block next
    /// to it; precondition failures only log.
    pub fn render_at<P: Page, R: Renderer>(
        &mut self,
        page: &mut P,
        renderer: &mut R,
        mount: &str,
        mut config: ChartConfig,
    ) -> Result<ChartHandle, RenderError> {
        if !page.has_mount(mount) {
            error!(mount, "chart mount not found");
            return Err(RenderError::MissingMount(mount.to_string()));
        }
        if config.data.datasets.is_empty() {
            error!(mount, "chart config has no series");
            return Err(RenderError::NoSeries(mount.to_string()));
        }
        for series in &mut config.data.datasets {
            if series.data.is_empty() {
                warn!(mount, series = %series.label, "empty series, drawing a single zero");
                series.data.push(0.0);
            }
            for value in &mut series.data {
                *value = finite_or_zero(*value);
            }
        }

        self.clear_surface(renderer, mount);

        debug!(mount, kind = ?config.kind, "creating chart");
        match renderer.create(mount, &config) {
            Ok(handle) => {
                self.charts.insert(mount.to_string(), handle);
                Ok(handle)
            }
            Err(err) => {
                error!(mount, "failed to create chart: {err}");
                page.set_mount_hidden(mount, true);
                page.append_error(mount, ErrorBlock::render_failure(err.to_string()));
                Err(err)
            }
        }
    }

    pub fn destroy<R: Renderer>(&mut self, renderer: &mut R, mount: &str) -> bool {
        match self.charts.remove(mount) {
            Some(handle) => {
                renderer.destroy(handle);
                true
            }
            None => false,
        }
    }

    pub fn destroy_all<R: Renderer>(&mut self, renderer: &mut R) -> usize {
        let charts = std::mem::take(&mut self.charts);
        for (mount, handle) in &charts {
            debug!(mount = %mount, "destroying chart");
            renderer.destroy(*handle);
        }
        charts.len()
    }

    fn clear_surface<R: Renderer>(&mut self, renderer: &mut R, mount: &str) {
        if self.destroy(renderer, mount) {
            debug!(mount, "destroyed registered chart");
        }
        if let Some(orphan) = renderer.bound_to(mount) {
            info!(mount, "destroying chart created outside the registry");
            renderer.destroy(orphan);
        }
    }
}
