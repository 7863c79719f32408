use crate::input::{key_action, pointer_event, Action, PointerKind};
use crate::view::screen_for;
use anyhow::{anyhow, Context, Result};
use pixels::{Pixels, SurfaceTexture};
use sot_core::Catalog;
use sot_experiment::{ExperimentConfig, ResultSink, SessionEvent, SessionStateMachine};
use sot_render::{FontVec, SceneRenderer};
use sot_timing::HighPrecisionTimer;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{Fullscreen, Window, WindowId},
};

pub type Sinks = Vec<Box<dyn ResultSink>>;
pub type Session = SessionStateMachine<HighPrecisionTimer, Sinks>;

pub struct App {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    session: Session,
    renderer: Option<SceneRenderer>,
    font: Option<FontVec>,
    cursor: Option<(f64, f64)>,
    should_exit: bool,
}

impl App {
    pub fn new(
        config: ExperimentConfig,
        catalog: Catalog,
        font: Option<FontVec>,
        sinks: Sinks,
    ) -> Self {
        SceneRenderer::prepare_labels(
            config.test_time_budget_secs,
            catalog.test_trials.len().max(catalog.practice_trials.len()),
        );
        let session = SessionStateMachine::new(config, catalog, HighPrecisionTimer::new(), sinks);
        Self {
            window: None,
            pixels: None,
            session,
            renderer: None,
            font,
            cursor: None,
            should_exit: false,
        }
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        info!(
            platform = std::env::consts::OS,
            arch = std::env::consts::ARCH,
            "spatial orientation test starting; SPACE to begin, ESC to quit"
        );
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .ok_or_else(|| anyhow!("no monitor available"))?;

        let attributes = Window::default_attributes()
            .with_title("Spatial Orientation Test")
            .with_fullscreen(Some(Fullscreen::Borderless(Some(monitor))))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(attributes)?);
        let size = window.inner_size();
        info!(
            width = size.width,
            height = size.height,
            scale = window.scale_factor(),
            "window created"
        );

        let surface = SurfaceTexture::new(size.width, size.height, window.clone());
        self.pixels = Some(Pixels::new(size.width, size.height, surface)?);
        self.renderer = Some(SceneRenderer::new(size.width, size.height, self.font.take())?);

        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let (Some(pixels), Some(renderer)) = (self.pixels.as_mut(), self.renderer.as_mut()) else {
            return Ok(());
        };
        renderer.render(&screen_for(&self.session));
        renderer.copy_to(pixels.frame_mut())?;
        pixels.render().context("presenting frame")?;
        Ok(())
    }

    fn update(&mut self) {
        let dispatched = self.session.pump();
        if dispatched > 0 {
            debug!(dispatched, phase = ?self.session.phase, "timer events");
        }
        if self.session.take_finish_notice() {
            if let Some(record) = self.session.results() {
                info!(copy = %record.copy_line(), "session complete");
            }
        }
    }

    fn dispatch(&mut self, event: SessionEvent) {
        if !self.session.handle_event(event) && !event.is_capture_input() {
            debug!(?event, phase = ?self.session.phase, "event ignored");
        }
    }

    fn handle_key(&mut self, key: PhysicalKey, repeat: bool, event_loop: &ActiveEventLoop) {
        let PhysicalKey::Code(code) = key else {
            return;
        };
        match key_action(self.session.phase, code) {
            // held arrows keep turning the dial; everything else fires once per press
            Some(Action::Session(event)) if repeat && !event.is_capture_input() => {}
            Some(Action::Session(event)) => self.dispatch(event),
            Some(Action::Exit) if repeat => {}
            Some(Action::Exit) => self.cleanup_and_exit(event_loop),
            None => {}
        }
    }

    fn handle_pointer(&mut self, kind: PointerKind) {
        let (Some((x, y)), Some(renderer)) = (self.cursor, self.renderer.as_ref()) else {
            return;
        };
        let dial = renderer.layout().dial;
        if let Some(event) = pointer_event(&dial, kind, x, y) {
            self.dispatch(event);
        }
    }

    fn handle_resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(size.width, size.height) {
                error!("failed to resize surface: {e}");
            }
            if let Err(e) = pixels.resize_buffer(size.width, size.height) {
                error!("failed to resize buffer: {e}");
            }
        }
        if let Some(renderer) = &mut self.renderer {
            if let Err(e) = renderer.resize(size.width, size.height) {
                error!("failed to resize renderer: {e}");
            }
        }
        info!(width = size.width, height = size.height, "display resized");
    }

    fn cleanup_and_exit(&mut self, event_loop: &ActiveEventLoop) {
        if !self.session.is_finished() {
            warn!(
                answered = self.session.responses().len(),
                "exiting before the test finished; no results were exported"
            );
        }
        self.should_exit = true;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                error!("failed to create window and surface: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.cleanup_and_exit(event_loop),
            WindowEvent::RedrawRequested => {
                self.update();
                if let Err(e) = self.render() {
                    error!("render failed: {e:#}");
                    self.cleanup_and_exit(event_loop);
                    return;
                }
                if let Some(win) = &self.window {
                    win.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() => {
                self.handle_key(event.physical_key, event.repeat, event_loop);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some((position.x, position.y));
                self.handle_pointer(PointerKind::Move);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.dispatch(SessionEvent::PointerLeave);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.handle_pointer(PointerKind::Down),
                ElementState::Released => self.handle_pointer(PointerKind::Up),
            },
            WindowEvent::Resized(size) => self.handle_resize(size),
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.handle_resize(size);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
        }
    }
}
