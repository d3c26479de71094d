//! Map widget factory contract.
//!
//! The map renderer itself lives outside this workspace; pages only
//! acquire handles, place markers and dispose handles through this
//! interface.

use crate::story::LatLon;
use serde::{Deserialize, Serialize};

/// Opaque handle to one live map widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapOptions {
    pub center: LatLon,
    pub zoom: u8,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerOptions {
    pub title: String,
    pub popup: Option<String>,
}

impl MarkerOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            popup: None,
        }
    }

    pub fn with_popup(mut self, popup: impl Into<String>) -> Self {
        self.popup = Some(popup.into());
        self
    }
}

/// Creates and disposes map widgets mounted in document containers.
pub trait MapWidgetFactory: Send + Sync {
    /// Mounts a map in the container with the given element id.
    ///
    /// Returns `None` when the widget cannot be created (missing
    /// container, renderer failure).
    fn init(&self, container_id: &str, options: MapOptions) -> Option<MapHandle>;

    /// Places a marker on a live map. Unknown handles are ignored.
    fn add_marker(&self, handle: MapHandle, at: LatLon, options: MarkerOptions);

    /// Recomputes the widget size after its container became visible.
    fn invalidate_size(&self, handle: MapHandle);

    /// Releases the widget. Disposing an unknown handle is a no-op.
    fn dispose(&self, handle: MapHandle);
}
