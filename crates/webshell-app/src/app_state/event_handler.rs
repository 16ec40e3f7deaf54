//! `ApplicationHandler` implementation for the winit event loop.

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use super::core::WebshellApp;
use super::types::UserEvent;

impl ApplicationHandler<UserEvent> for WebshellApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.start(event_loop);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let surface_id = u64::from(window_id);
        match event {
            WindowEvent::CloseRequested => {
                if self.owns_notice(surface_id) {
                    self.dismiss_notice(event_loop);
                    return;
                }
                if self.prompt.handle_close(surface_id) {
                    return;
                }
                tracing::info!(surface_id, "Window close requested");
                if self.shell.user_close_requested(surface_id) {
                    self.settle(event_loop);
                }
            }

            WindowEvent::Resized(size) => {
                self.resize_window(surface_id, size);
            }

            WindowEvent::Destroyed => {
                if self.shell.on_window_destroyed(surface_id) {
                    self.settle(event_loop);
                }
            }

            _ => {}
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::SessionWake => self.poll(event_loop),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
            return;
        }
        self.poll_and_schedule(event_loop);
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        self.shutdown(event_loop);
    }
}

impl WebshellApp {
    fn resize_window(&self, surface_id: u64, size: PhysicalSize<u32>) {
        let registry = self.shell.registry();
        let Some(name) = registry.find_by_surface(surface_id) else {
            return;
        };
        if let Ok(entry) = registry.get(name) {
            entry.surface().resize(size);
        }
    }
}
