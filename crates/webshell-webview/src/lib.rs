//! Named browser windows for Webshell.
//!
//! - [`WindowRegistry`] owns every open window by unique name and raises
//!   lifecycle events (surface ready, window closed, all windows closed)
//! - [`WindowSurface`]/[`WindowHost`] abstract the native window so the
//!   registry can be driven without a display
//! - [`WebViewManager`] builds `wry` web views, wiring page-load and IPC
//!   handlers into a drainable event queue
//! - [`ipc`] holds the scripts injected into every page

pub mod events;
pub mod ipc;
pub mod manager;
pub mod registry;
pub mod surface;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use events::{PageLoadState, RegistryEvent, SurfaceEvent};
pub use ipc::{IpcMessage, IpcPayload};
pub use manager::{WebViewConfig, WebViewHandle, WebViewManager};
pub use registry::{WindowEntry, WindowRegistry};
pub use surface::{WindowHost, WindowSurface};
