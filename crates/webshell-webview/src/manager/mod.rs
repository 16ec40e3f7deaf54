//! WebView lifecycle management.
//!
//! `WebViewManager` builds one `wry::WebView` per native window and collects
//! the events its handlers raise until the main loop drains them.

use std::sync::{Arc, Mutex};

use crate::events::SurfaceEvent;

mod handle;
pub mod handlers;
mod lifecycle;
mod types;

pub use handle::WebViewHandle;
pub use types::WebViewConfig;

/// Builds web views and owns their shared event sink.
pub struct WebViewManager {
    /// Event sink. Handlers push here; the main event loop drains.
    pub(crate) events: Arc<Mutex<Vec<SurfaceEvent>>>,
}

impl WebViewManager {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Drain all pending events.
    pub fn drain_events(&self) -> Vec<SurfaceEvent> {
        let mut events = match self.events.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::take(&mut *events)
    }
}

impl Default for WebViewManager {
    fn default() -> Self {
        Self::new()
    }
}
