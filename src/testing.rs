//! Collaborator doubles shared by the unit tests.

use crate::chart::ChartConfig;
use crate::errors::{RenderError, ScriptError};
use crate::loader::{Asset, ScriptHost, ScriptRequest};
use crate::render::{ChartHandle, Plugin, Renderer};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Created(ChartHandle, String),
    Destroyed(ChartHandle),
    Plugin(Plugin),
}

/// Renderer that logs every call in order.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    surfaces: BTreeSet<String>,
    failing: BTreeSet<String>,
    live: BTreeMap<ChartHandle, String>,
    events: Vec<RenderEvent>,
    last_config: Option<ChartConfig>,
    next_id: u64,
}

impl RecordingRenderer {
    pub fn new<I: IntoIterator<Item = &'static str>>(surfaces: I) -> Self {
        Self {
            surfaces: surfaces.into_iter().map(str::to_string).collect(),
            ..Self::default()
        }
    }

    pub fn fail_on(&mut self, surface: &str) {
        self.failing.insert(surface.to_string());
    }

    pub fn events(&self) -> &[RenderEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn live_on(&self, surface: &str) -> usize {
        self.live.values().filter(|s| *s == surface).count()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn last_config(&self) -> Option<&ChartConfig> {
        self.last_config.as_ref()
    }
}

impl Renderer for RecordingRenderer {
    fn create(&mut self, surface: &str, config: &ChartConfig) -> Result<ChartHandle, RenderError> {
        if !self.surfaces.contains(surface) || self.failing.contains(surface) {
            return Err(RenderError::NoContext(surface.to_string()));
        }
        self.next_id += 1;
        let handle = ChartHandle(self.next_id);
        self.live.insert(handle, surface.to_string());
        self.events.push(RenderEvent::Created(handle, surface.to_string()));
        self.last_config = Some(config.clone());
        Ok(handle)
    }

    fn destroy(&mut self, handle: ChartHandle) {
        self.live.remove(&handle);
        self.events.push(RenderEvent::Destroyed(handle));
    }

    fn bound_to(&self, surface: &str) -> Option<ChartHandle> {
        self.live
            .iter()
            .find(|(_, s)| s.as_str() == surface)
            .map(|(handle, _)| *handle)
    }

    fn register_plugin(&mut self, plugin: Plugin) {
        self.events.push(RenderEvent::Plugin(plugin));
    }
}

/// Script host with scripted outcomes per URL.
#[derive(Debug, Default)]
pub struct FakeScripts {
    available: HashSet<Asset>,
    failing: HashSet<String>,
    offline: bool,
    requests: Mutex<Vec<ScriptRequest>>,
}

impl FakeScripts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_available(mut self, asset: Asset) -> Self {
        self.available.insert(asset);
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// Every request fails.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn requests(&self) -> Vec<ScriptRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

impl ScriptHost for FakeScripts {
    fn is_available(&self, asset: Asset) -> bool {
        self.available.contains(&asset)
    }

    async fn load(&self, request: &ScriptRequest) -> Result<(), ScriptError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.offline || self.failing.contains(&request.url) {
            return Err(ScriptError::Network(format!("{} unreachable", request.url)));
        }
        Ok(())
    }
}
