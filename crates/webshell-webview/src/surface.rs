//! Seams between the registry and the windowing toolkit.

use webshell_common::WindowError;
use webshell_config::WindowOptions;

/// One rendered window, exclusively owned by its registry entry.
///
/// Dropping the surface destroys the native window.
pub trait WindowSurface {
    /// Native id of the window, used to route toolkit events back to a name.
    fn surface_id(&self) -> u64;

    fn set_title_bar_visible(&mut self, visible: bool);

    /// Flip between maximized and normal.
    fn toggle_maximize(&mut self);

    fn minimize(&mut self);

    /// Open developer tooling. Only called once the surface is ready.
    fn open_dev_tools(&self);

    /// Hook run right before the registry drops the surface.
    fn close(&mut self) {}
}

/// Factory for window surfaces.
pub trait WindowHost {
    type Surface: WindowSurface;

    /// Build and show a window for `name`.
    fn open(&mut self, name: &str, options: &WindowOptions) -> Result<Self::Surface, WindowError>;
}
