//! Headless map widget factory.
//!
//! Keeps the bookkeeping a real map renderer would need (live widgets,
//! their containers and markers) without drawing anything. The CLI uses
//! it to describe maps in text; tests use it to check that every widget
//! a page acquires is disposed again.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use story_core::map::{MapHandle, MapOptions, MapWidgetFactory, MarkerOptions};
use story_core::story::LatLon;

/// State of one live widget.
#[derive(Debug, Clone, PartialEq)]
pub struct MapState {
    pub container_id: String,
    pub options: MapOptions,
    pub markers: Vec<(LatLon, MarkerOptions)>,
    pub resize_count: u32,
}

#[derive(Debug, Default)]
struct Registry {
    live: HashMap<MapHandle, MapState>,
    failing: HashSet<String>,
    disposed: u32,
}

#[derive(Debug, Default)]
pub struct HeadlessMapFactory {
    next_id: AtomicU64,
    registry: Mutex<Registry>,
}

impl HeadlessMapFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every future `init` on `container_id` fail.
    pub fn fail_container(&self, container_id: impl Into<String>) {
        if let Ok(mut registry) = self.registry.lock() {
            registry.failing.insert(container_id.into());
        }
    }

    pub fn live_count(&self) -> usize {
        self.registry.lock().map(|r| r.live.len()).unwrap_or(0)
    }

    pub fn disposed_count(&self) -> u32 {
        self.registry.lock().map(|r| r.disposed).unwrap_or(0)
    }

    pub fn state(&self, handle: MapHandle) -> Option<MapState> {
        self.registry
            .lock()
            .ok()
            .and_then(|r| r.live.get(&handle).cloned())
    }

    /// Live widgets sorted by handle.
    pub fn live_maps(&self) -> Vec<(MapHandle, MapState)> {
        let mut maps: Vec<_> = self
            .registry
            .lock()
            .map(|r| r.live.iter().map(|(h, s)| (*h, s.clone())).collect())
            .unwrap_or_default();
        maps.sort_by_key(|(handle, _)| *handle);
        maps
    }
}

impl MapWidgetFactory for HeadlessMapFactory {
    fn init(&self, container_id: &str, options: MapOptions) -> Option<MapHandle> {
        let mut registry = self.registry.lock().ok()?;
        if registry.failing.contains(container_id) || !options.center.is_valid() {
            tracing::warn!("[HeadlessMapFactory] Failed to initialize map in #{}", container_id);
            return None;
        }

        let handle = MapHandle(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        registry.live.insert(
            handle,
            MapState {
                container_id: container_id.to_string(),
                options,
                markers: Vec::new(),
                resize_count: 0,
            },
        );
        tracing::debug!("[HeadlessMapFactory] Map {:?} mounted in #{}", handle, container_id);
        Some(handle)
    }

    fn add_marker(&self, handle: MapHandle, at: LatLon, options: MarkerOptions) {
        if let Ok(mut registry) = self.registry.lock() {
            if let Some(state) = registry.live.get_mut(&handle) {
                state.markers.push((at, options));
            }
        }
    }

    fn invalidate_size(&self, handle: MapHandle) {
        if let Ok(mut registry) = self.registry.lock() {
            if let Some(state) = registry.live.get_mut(&handle) {
                state.resize_count += 1;
            }
        }
    }

    fn dispose(&self, handle: MapHandle) {
        if let Ok(mut registry) = self.registry.lock() {
            if registry.live.remove(&handle).is_some() {
                registry.disposed += 1;
                tracing::debug!("[HeadlessMapFactory] Map {:?} disposed", handle);
            }
        }
    }
}
