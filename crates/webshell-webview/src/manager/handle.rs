use wry::WebView;

/// Handle to a managed WebView instance.
pub struct WebViewHandle {
    pub(super) webview: WebView,
    /// Native id of the window hosting this view.
    pub(super) surface_id: u64,
}

impl WebViewHandle {
    pub fn surface_id(&self) -> u64 {
        self.surface_id
    }

    /// Set the WebView bounds (position + size) within the parent window.
    pub fn set_bounds(&self, bounds: wry::Rect) -> Result<(), wry::Error> {
        self.webview.set_bounds(bounds)
    }

    /// Open devtools (if enabled).
    pub fn open_devtools(&self) {
        self.webview.open_devtools();
    }
}
