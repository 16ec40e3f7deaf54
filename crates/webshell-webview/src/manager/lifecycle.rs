use std::sync::Arc;

use tracing::debug;
use wry::raw_window_handle;
use wry::WebViewBuilder;

use crate::events::SurfaceEvent;
use crate::ipc::IPC_INIT_SCRIPT;

use super::handle::WebViewHandle;
use super::handlers::push_event;
use super::types::WebViewConfig;
use super::WebViewManager;

impl WebViewManager {
    /// Create a new WebView as a child of the given window.
    ///
    /// `surface_id` identifies the window in every event the view raises.
    /// On success a [`SurfaceEvent::Ready`] is queued for the view.
    pub fn create<W: raw_window_handle::HasWindowHandle>(
        &self,
        surface_id: u64,
        window: &W,
        bounds: wry::Rect,
        config: WebViewConfig,
    ) -> Result<WebViewHandle, wry::Error> {
        let events = Arc::clone(&self.events);
        let sid = surface_id;

        let mut builder = WebViewBuilder::new()
            .with_bounds(bounds)
            .with_transparent(config.transparent)
            .with_devtools(config.devtools)
            .with_clipboard(true)
            .with_focused(true);

        builder = builder.with_initialization_script(IPC_INIT_SCRIPT);
        for script in &config.init_scripts {
            builder = builder.with_initialization_script(script);
        }

        if let Some(ua) = &config.user_agent {
            builder = builder.with_user_agent(ua);
        }

        builder = Self::attach_ipc_handler(builder, Arc::clone(&events), sid);
        builder = Self::attach_page_load_handler(builder, Arc::clone(&events), sid);

        let initial_url;
        if let Some(url) = &config.url {
            builder = builder.with_url(url);
            initial_url = url.clone();
        } else if let Some(html) = &config.html {
            builder = builder.with_html(html);
            initial_url = "about:blank".to_string();
        } else {
            builder = builder.with_html("<html><body></body></html>");
            initial_url = "about:blank".to_string();
        }

        let webview = builder.build_as_child(window)?;

        debug!(surface_id, url = %initial_url, "WebView created");
        push_event(&events, SurfaceEvent::Ready { surface_id });

        Ok(WebViewHandle {
            webview,
            surface_id,
        })
    }
}
