//! Registry of named windows.

use std::collections::HashMap;

use tracing::{debug, info};
use webshell_common::WindowError;
use webshell_config::WindowOptions;

use crate::events::RegistryEvent;
use crate::surface::{WindowHost, WindowSurface};

/// A live window: its name, the options it was opened with, and its surface.
pub struct WindowEntry<S> {
    name: String,
    options: WindowOptions,
    surface: S,
    surface_ready: bool,
}

impl<S> WindowEntry<S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Whether the render surface finished initializing.
    pub fn is_surface_ready(&self) -> bool {
        self.surface_ready
    }
}

/// Owns every open window, keyed by a unique name.
///
/// Lives on the owning thread and is mutated only there. Lifecycle events
/// are queued and handed out by [`WindowRegistry::drain_events`].
pub struct WindowRegistry<S> {
    entries: HashMap<String, WindowEntry<S>>,
    events: Vec<RegistryEvent>,
}

impl<S: WindowSurface> WindowRegistry<S> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// Open a window named `name` and register it.
    ///
    /// Empty and already-present names are rejected before the host is asked
    /// for anything, so a failed call leaves the registry untouched.
    pub fn create<H: WindowHost<Surface = S>>(
        &mut self,
        host: &mut H,
        name: &str,
        options: WindowOptions,
    ) -> Result<&WindowEntry<S>, WindowError> {
        if name.is_empty() {
            return Err(WindowError::EmptyName);
        }
        if self.entries.contains_key(name) {
            return Err(WindowError::DuplicateName(name.to_string()));
        }

        let surface = host.open(name, &options)?;
        info!(name, url = %options.url(), "window opened");

        let entry = WindowEntry {
            name: name.to_string(),
            options,
            surface,
            surface_ready: false,
        };
        Ok(self.entries.entry(name.to_string()).or_insert(entry))
    }

    pub fn get(&self, name: &str) -> Result<&WindowEntry<S>, WindowError> {
        self.entries
            .get(name)
            .ok_or_else(|| WindowError::NotFound(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut WindowEntry<S>, WindowError> {
        self.entries
            .get_mut(name)
            .ok_or_else(|| WindowError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Close a window on request. The entry leaves through [`Self::on_window_closed`].
    pub fn close(&mut self, name: &str) -> Result<(), WindowError> {
        self.get_mut(name)?.surface.close();
        self.on_window_closed(name);
        Ok(())
    }

    /// A window closed by any means. Unknown names are ignored.
    ///
    /// Emits `WindowClosed`, then `AllWindowsClosed` if this was the last one.
    /// Returns whether an entry was removed.
    pub fn on_window_closed(&mut self, name: &str) -> bool {
        let Some(entry) = self.entries.remove(name) else {
            debug!(name, "close for unknown window ignored");
            return false;
        };
        drop(entry);
        info!(name, remaining = self.entries.len(), "window closed");

        self.events.push(RegistryEvent::WindowClosed {
            name: name.to_string(),
        });
        if self.entries.is_empty() {
            self.events.push(RegistryEvent::AllWindowsClosed);
        }
        true
    }

    /// The user asked to close a window (title bar button, keyboard).
    ///
    /// Windows opened with `disable_close` ignore the request. Returns whether
    /// the window closed.
    pub fn user_close_requested(&mut self, name: &str) -> bool {
        match self.entries.get(name) {
            Some(entry) if entry.options.flags().disable_close => {
                debug!(name, "user close ignored: close disabled");
                false
            }
            Some(_) => self.on_window_closed(name),
            None => false,
        }
    }

    /// The render surface of `name` finished initializing. Fires once per window.
    pub fn on_surface_ready(&mut self, name: &str) {
        if let Some(entry) = self.entries.get_mut(name) {
            if entry.surface_ready {
                return;
            }
            entry.surface_ready = true;
            debug!(name, "render surface ready");
            self.events.push(RegistryEvent::SurfaceReady {
                name: name.to_string(),
            });
        }
    }

    pub fn set_title_bar_visible(&mut self, name: &str, visible: bool) -> Result<(), WindowError> {
        self.get_mut(name)?.surface.set_title_bar_visible(visible);
        Ok(())
    }

    pub fn toggle_maximize(&mut self, name: &str) -> Result<(), WindowError> {
        self.get_mut(name)?.surface.toggle_maximize();
        Ok(())
    }

    pub fn minimize(&mut self, name: &str) -> Result<(), WindowError> {
        self.get_mut(name)?.surface.minimize();
        Ok(())
    }

    pub fn open_dev_tools(&mut self, name: &str) -> Result<(), WindowError> {
        let entry = self.get(name)?;
        if !entry.surface_ready {
            return Err(WindowError::ToolingUnavailable(name.to_string()));
        }
        entry.surface.open_dev_tools();
        Ok(())
    }

    /// Name of the window whose surface has this native id.
    pub fn find_by_surface(&self, surface_id: u64) -> Option<&str> {
        self.entries
            .values()
            .find(|e| e.surface.surface_id() == surface_id)
            .map(|e| e.name.as_str())
    }

    /// Take all queued lifecycle events.
    pub fn drain_events(&mut self) -> Vec<RegistryEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop every window without raising lifecycle events. Used at process teardown.
    pub fn close_all(&mut self) {
        for (name, mut entry) in self.entries.drain() {
            entry.surface.close();
            debug!(name = %name, "window torn down");
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: WindowSurface> Default for WindowRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingHost, SurfaceCall};
    use webshell_config::WindowFlags;

    fn registry_with(names: &[&str]) -> (WindowRegistry<crate::testing::RecordingSurface>, RecordingHost) {
        let mut host = RecordingHost::new();
        let mut registry = WindowRegistry::new();
        for name in names {
            registry
                .create(&mut host, name, WindowOptions::default())
                .unwrap();
        }
        (registry, host)
    }

    #[test]
    fn create_registers_and_shows() {
        let (registry, host) = registry_with(&["main"]);
        assert_eq!(registry.len(), 1);
        assert_eq!(host.opened(), vec!["main".to_string()]);
        assert_eq!(registry.get("main").unwrap().name(), "main");
    }

    #[test]
    fn duplicate_name_is_rejected_without_mutation() {
        let (mut registry, mut host) = registry_with(&["main"]);
        let before = registry.get("main").unwrap().surface().surface_id();

        let err = registry
            .create(&mut host, "main", WindowOptions::default())
            .err()
            .unwrap();

        assert_eq!(err, WindowError::DuplicateName("main".into()));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("main").unwrap().surface().surface_id(), before);
        assert_eq!(host.opened().len(), 1);
    }

    #[test]
    fn empty_name_is_rejected() {
        let (mut registry, mut host) = registry_with(&[]);
        let err = registry
            .create(&mut host, "", WindowOptions::default())
            .err()
            .unwrap();
        assert_eq!(err, WindowError::EmptyName);
        assert!(registry.is_empty());
    }

    #[test]
    fn host_failure_leaves_registry_untouched() {
        let (mut registry, mut host) = registry_with(&[]);
        host.fail_next_open();
        let err = registry
            .create(&mut host, "main", WindowOptions::default())
            .err()
            .unwrap();
        assert!(matches!(err, WindowError::Surface(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn get_missing_is_not_found() {
        let (registry, _) = registry_with(&[]);
        assert_eq!(
            registry.get("ghost").err().unwrap(),
            WindowError::NotFound("ghost".into())
        );
    }

    #[test]
    fn close_drains_to_all_closed_exactly_once() {
        let (mut registry, _) = registry_with(&["a", "b"]);

        registry.close("a").unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.drain_events(),
            vec![RegistryEvent::WindowClosed { name: "a".into() }]
        );

        registry.close("b").unwrap();
        assert_eq!(registry.len(), 0);
        let events = registry.drain_events();
        assert_eq!(
            events,
            vec![
                RegistryEvent::WindowClosed { name: "b".into() },
                RegistryEvent::AllWindowsClosed,
            ]
        );
        assert!(registry.drain_events().is_empty());
    }

    #[test]
    fn closed_callback_for_absent_name_is_noop() {
        let (mut registry, _) = registry_with(&["a"]);
        registry.close("a").unwrap();
        registry.drain_events();

        assert!(!registry.on_window_closed("a"));
        assert!(registry.drain_events().is_empty());
    }

    #[test]
    fn close_missing_is_not_found() {
        let (mut registry, _) = registry_with(&["a"]);
        assert_eq!(
            registry.close("b").err().unwrap(),
            WindowError::NotFound("b".into())
        );
        assert_eq!(registry.len(), 1);
        assert!(registry.drain_events().is_empty());
    }

    #[test]
    fn close_runs_surface_hook() {
        let (mut registry, host) = registry_with(&["a"]);
        registry.close("a").unwrap();
        assert!(host.calls().contains(&("a".to_string(), SurfaceCall::Close)));
    }

    #[test]
    fn user_close_honours_disable_close() {
        let mut host = RecordingHost::new();
        let mut registry = WindowRegistry::new();
        let locked = WindowOptions::new(
            None,
            None,
            800,
            600,
            WindowFlags {
                disable_close: true,
                ..WindowFlags::default()
            },
        );
        registry.create(&mut host, "locked", locked).unwrap();
        registry
            .create(&mut host, "free", WindowOptions::default())
            .unwrap();

        assert!(!registry.user_close_requested("locked"));
        assert!(registry.user_close_requested("free"));
        assert!(registry.contains("locked"));
        assert!(!registry.contains("free"));

        // Remote close still goes through.
        registry.close("locked").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn dev_tools_need_ready_surface() {
        let (mut registry, host) = registry_with(&["a"]);
        assert_eq!(
            registry.open_dev_tools("a").err().unwrap(),
            WindowError::ToolingUnavailable("a".into())
        );

        registry.on_surface_ready("a");
        registry.open_dev_tools("a").unwrap();
        assert!(host.calls().contains(&("a".to_string(), SurfaceCall::DevTools)));
    }

    #[test]
    fn surface_ready_fires_once() {
        let (mut registry, _) = registry_with(&["a"]);
        registry.on_surface_ready("a");
        registry.on_surface_ready("a");
        registry.on_surface_ready("ghost");
        assert_eq!(
            registry.drain_events(),
            vec![RegistryEvent::SurfaceReady { name: "a".into() }]
        );
    }

    #[test]
    fn window_operations_reach_surface() {
        let (mut registry, host) = registry_with(&["a"]);
        registry.set_title_bar_visible("a", false).unwrap();
        registry.toggle_maximize("a").unwrap();
        registry.minimize("a").unwrap();

        let calls: Vec<SurfaceCall> = host.calls().into_iter().map(|(_, c)| c).collect();
        assert_eq!(
            calls,
            vec![
                SurfaceCall::TitleBar(false),
                SurfaceCall::ToggleMaximize,
                SurfaceCall::Minimize,
            ]
        );
    }

    #[test]
    fn operations_on_missing_window_fail() {
        let (mut registry, _) = registry_with(&[]);
        assert!(registry.set_title_bar_visible("x", true).is_err());
        assert!(registry.toggle_maximize("x").is_err());
        assert!(registry.minimize("x").is_err());
        assert!(registry.open_dev_tools("x").is_err());
    }

    #[test]
    fn find_by_surface_maps_ids() {
        let (registry, _) = registry_with(&["a", "b"]);
        let id = registry.get("b").unwrap().surface().surface_id();
        assert_eq!(registry.find_by_surface(id), Some("b"));
        assert_eq!(registry.find_by_surface(9_999), None);
    }

    #[test]
    fn close_all_raises_no_events() {
        let (mut registry, _) = registry_with(&["a", "b"]);
        registry.close_all();
        assert!(registry.is_empty());
        assert!(registry.drain_events().is_empty());
    }
}
