use std::sync::Arc;

use crate::engine::config::ExplorerConfig;
use crate::engine::graphics::Renderer;
use crate::engine::state::ExplorerState;
use crate::engine::user_input::UserInput;
use crate::engine::{EngineError, EngineResult};

use log::{debug, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{CursorGrabMode, Window, WindowAttributes, WindowId};

/// Minimal winit wrapper (2025 winit style: ApplicationHandler).
pub struct Windowing;

impl Windowing {
    pub fn run_app(
        config: ExplorerConfig,
        renderer: Renderer,
        user_input: UserInput,
    ) -> EngineResult<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = App {
            window: None,
            state: ExplorerState::new(&config),
            config,
            renderer,
            user_input,
            cursor_grabbed: false,
            fatal: None,
        };

        event_loop.run_app(&mut app)?;

        match app.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct App {
    window: Option<Arc<Window>>,
    config: ExplorerConfig,
    state: ExplorerState,
    renderer: Renderer,
    user_input: UserInput,
    /// Whether the OS cursor is currently grabbed; follows `state.mouse_captured`.
    cursor_grabbed: bool,
    fatal: Option<EngineError>,
}

impl App {
    /// Stops the loop; `run_app` hands the error back to the caller.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: EngineError) {
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn create_window(&self, event_loop: &ActiveEventLoop) -> EngineResult<Arc<Window>> {
        let window_config = &self.config.window;
        let attrs: WindowAttributes = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_resizable(window_config.resizable)
            .with_inner_size(winit::dpi::LogicalSize::new(
                window_config.width as f64,
                window_config.height as f64,
            ));

        Ok(Arc::new(event_loop.create_window(attrs)?))
    }

    /// Applies every queued control event, oldest first.
    fn process_input(&mut self) {
        if !self.user_input.has_pending() {
            return;
        }
        let before = self.state.fractal;
        let events: Vec<_> = self.user_input.drain().collect();
        self.state = self.state.apply_all(events);
        if self.state.fractal != before {
            let f = &self.state.fractal;
            debug!(
                "scale={:.2} zoom={:.3} offset={}",
                f.scale, f.debug_zoom, f.debug_offset
            );
        }
        self.sync_cursor_grab();
    }

    fn sync_cursor_grab(&mut self) {
        if self.cursor_grabbed == self.state.mouse_captured {
            return;
        }
        let Some(window) = self.window.as_ref() else {
            return;
        };

        if self.state.mouse_captured {
            let result = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = result {
                warn!("failed to grab cursor: {e}");
            }
            info!("mouse look on");
            window.set_cursor_visible(false);
        } else {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                warn!("failed to release cursor: {e}");
            }
            window.set_cursor_visible(true);
            info!("mouse look off");
        }
        self.cursor_grabbed = self.state.mouse_captured;
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match self.create_window(event_loop) {
            Ok(window) => window,
            Err(e) => return self.fail(event_loop, e),
        };

        if let Err(e) = self.renderer.init_for_window(&window) {
            return self.fail(event_loop, e);
        }

        info!(
            "window {}x{} ready, press Escape to toggle mouse look",
            window.inner_size().width,
            window.inner_size().height
        );

        window.request_redraw();
        self.window = Some(window);
        self.sync_cursor_grab();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.user_input.handle_window_event(&event) {
            self.process_input();
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                self.renderer.resize(size);
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                self.process_input();

                if let Err(e) = self.renderer.draw_frame(&self.state) {
                    return self.fail(event_loop, e);
                }

                if let Some(w) = &self.window {
                    w.pre_present_notify();
                    w.request_redraw();
                }
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.user_input.handle_mouse_motion(delta);
        }
    }
}
