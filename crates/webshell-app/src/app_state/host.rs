//! Native windows: winit window plus a child wry web view.

use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes, WindowButtons};

use webshell_common::{SessionInfo, WindowError};
use webshell_config::{WindowOptions, MIN_WINDOW_SIZE};
use webshell_webview::ipc::session_constants_script;
use webshell_webview::{WebViewConfig, WebViewHandle, WebViewManager, WindowHost, WindowSurface};

// =============================================================================
// WINDOW ATTRIBUTES
// =============================================================================

/// winit attributes for a window described by `options`.
///
/// Windows start hidden; the host shows them once the web view is attached.
pub fn window_attributes(options: &WindowOptions) -> WindowAttributes {
    let flags = options.flags();

    let mut buttons = WindowButtons::all();
    if flags.disable_maximize {
        buttons.remove(WindowButtons::MAXIMIZE);
    }
    if flags.disable_minimize {
        buttons.remove(WindowButtons::MINIMIZE);
    }
    if flags.disable_close {
        buttons.remove(WindowButtons::CLOSE);
    }

    WindowAttributes::default()
        .with_title(options.title())
        .with_inner_size(LogicalSize::new(
            f64::from(options.width()),
            f64::from(options.height()),
        ))
        .with_min_inner_size(LogicalSize::new(
            f64::from(MIN_WINDOW_SIZE),
            f64::from(MIN_WINDOW_SIZE),
        ))
        .with_resizable(!flags.no_resizable)
        .with_decorations(!flags.hide_frame)
        .with_enabled_buttons(buttons)
        .with_maximized(flags.maximize_on_show)
        .with_visible(false)
}

/// Bounds covering the whole client area of a window.
pub fn full_window_bounds(size: PhysicalSize<u32>) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Physical(wry::dpi::PhysicalPosition::new(0, 0)),
        size: wry::dpi::Size::Physical(wry::dpi::PhysicalSize::new(size.width, size.height)),
    }
}

// =============================================================================
// BROWSER WINDOW
// =============================================================================

/// A top-level window filled by one web view.
pub struct BrowserWindow {
    // Declared first so the view is dropped before its parent window.
    webview: WebViewHandle,
    window: Window,
}

impl BrowserWindow {
    /// Keep the web view covering the client area.
    pub fn resize(&self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        if let Err(e) = self.webview.set_bounds(full_window_bounds(size)) {
            tracing::warn!(
                surface_id = self.webview.surface_id(),
                error = %e,
                "Failed to update webview bounds"
            );
        }
    }
}

impl WindowSurface for BrowserWindow {
    fn surface_id(&self) -> u64 {
        u64::from(self.window.id())
    }

    fn set_title_bar_visible(&mut self, visible: bool) {
        self.window.set_decorations(visible);
    }

    fn toggle_maximize(&mut self) {
        let maximized = self.window.is_maximized();
        self.window.set_maximized(!maximized);
    }

    fn minimize(&mut self) {
        self.window.set_minimized(true);
    }

    fn open_dev_tools(&self) {
        self.webview.open_devtools();
    }

    fn close(&mut self) {
        self.window.set_visible(false);
    }
}

// =============================================================================
// HOST
// =============================================================================

/// Opens [`BrowserWindow`]s on the running event loop.
///
/// Borrowed per call; only valid inside an event loop callback.
pub struct WinitHost<'a> {
    pub event_loop: &'a ActiveEventLoop,
    pub manager: &'a WebViewManager,
    pub session: &'a SessionInfo,
}

impl WindowHost for WinitHost<'_> {
    type Surface = BrowserWindow;

    fn open(&mut self, name: &str, options: &WindowOptions) -> Result<BrowserWindow, WindowError> {
        let window = self
            .event_loop
            .create_window(window_attributes(options))
            .map_err(|e| WindowError::Surface(e.to_string()))?;

        let surface_id = u64::from(window.id());
        let config = WebViewConfig::with_url(options.url())
            .init_script(session_constants_script(name, self.session));

        let webview = self
            .manager
            .create(surface_id, &window, full_window_bounds(window.inner_size()), config)
            .map_err(|e| WindowError::Surface(e.to_string()))?;

        window.set_visible(true);
        tracing::debug!(name, surface_id, "Native window shown");

        Ok(BrowserWindow { webview, window })
    }
}

// =============================================================================
// DIALOG WINDOW
// =============================================================================

/// Fixed-size window rendering a local page: prompts and notices.
pub struct DialogWindow {
    webview: WebViewHandle,
    window: Window,
}

impl DialogWindow {
    pub fn open(
        event_loop: &ActiveEventLoop,
        manager: &WebViewManager,
        size: LogicalSize<f64>,
        html: &str,
    ) -> Result<Self, WindowError> {
        let attrs = WindowAttributes::default()
            .with_title("Webshell")
            .with_inner_size(size)
            .with_resizable(false)
            .with_enabled_buttons(WindowButtons::CLOSE);

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| WindowError::Surface(e.to_string()))?;
        let surface_id = u64::from(window.id());
        let webview = manager
            .create(
                surface_id,
                &window,
                full_window_bounds(window.inner_size()),
                WebViewConfig::with_html(html),
            )
            .map_err(|e| WindowError::Surface(e.to_string()))?;

        Ok(Self { webview, window })
    }

    pub fn surface_id(&self) -> u64 {
        self.webview.surface_id()
    }

    pub fn hide(&self) {
        self.window.set_visible(false);
    }
}

// =============================================================================
// TESTS
// =============================================================================
