//! Event types raised by web views and by the window registry.

use serde::{Deserialize, Serialize};

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLoadState {
    /// Navigation has started.
    Started,
    /// Page has fully loaded (DOMContentLoaded + resources).
    Finished,
}

impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

/// Events emitted by a web view, keyed by the native window that hosts it.
#[derive(Debug, Clone)]
pub enum SurfaceEvent {
    /// The web view finished initializing and can serve dev tools.
    Ready { surface_id: u64 },
    /// Page load state changed. Carries the URL.
    PageLoad {
        surface_id: u64,
        state: PageLoadState,
        url: String,
    },
    /// An IPC message was received from JavaScript.
    IpcMessage { surface_id: u64, body: String },
}

/// Lifecycle events raised by the window registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// The render surface of `name` finished initializing.
    SurfaceReady { name: String },
    /// Window `name` closed and left the registry.
    WindowClosed { name: String },
    /// The last window closed; the registry is empty.
    AllWindowsClosed,
}
