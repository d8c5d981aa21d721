use crate::chart::ChartConfig;
use crate::errors::RenderError;
use crate::models::ChartView;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Opaque id of a chart instance owned by a [`Renderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ChartHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Plugin {
    DataLabels,
}

/// The charting library as seen from the page.
pub trait Renderer {
    fn create(&mut self, surface: &str, config: &ChartConfig) -> Result<ChartHandle, RenderError>;

    fn destroy(&mut self, handle: ChartHandle);

    /// The chart currently bound to `surface`, whoever created it.
    fn bound_to(&self, surface: &str) -> Option<ChartHandle>;

    fn register_plugin(&mut self, plugin: Plugin);
}

#[derive(Debug, Clone)]
pub struct LiveChart {
    pub surface: String,
    pub view: ChartView,
}

/// Keeps every live chart as its serialized config.
#[derive(Debug, Default)]
pub struct SnapshotRenderer {
    surfaces: BTreeSet<String>,
    charts: BTreeMap<ChartHandle, LiveChart>,
    plugins: BTreeSet<Plugin>,
    next_id: u64,
}

impl SnapshotRenderer {
    pub fn new<I, S>(surfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            surfaces: surfaces.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn chart_at(&self, surface: &str) -> Option<&LiveChart> {
        self.charts.values().find(|chart| chart.surface == surface)
    }

    pub fn plugins(&self) -> impl Iterator<Item = Plugin> + '_ {
        self.plugins.iter().copied()
    }
}

impl Renderer for SnapshotRenderer {
    fn create(&mut self, surface: &str, config: &ChartConfig) -> Result<ChartHandle, RenderError> {
        if !self.surfaces.contains(surface) {
            return Err(RenderError::NoContext(surface.to_string()));
        }
        self.next_id += 1;
        let handle = ChartHandle(self.next_id);
        let view = ChartView::new(handle.0, config)?;
        self.charts.insert(
            handle,
            LiveChart {
                surface: surface.to_string(),
                view,
            },
        );
        Ok(handle)
    }

    fn destroy(&mut self, handle: ChartHandle) {
        self.charts.remove(&handle);
    }

    fn bound_to(&self, surface: &str) -> Option<ChartHandle> {
        self.charts
            .iter()
            .find(|(_, chart)| chart.surface == surface)
            .map(|(handle, _)| *handle)
    }

    fn register_plugin(&mut self, plugin: Plugin) {
        self.plugins.insert(plugin);
    }
}
