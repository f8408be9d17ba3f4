//! Desktop window surface backed by winit.
//!
//! The frame pump owns the loop, so the winit event loop is driven with
//! `pump_app_events` between iterations instead of `run_app`.

use std::time::Duration;

use hearth_graphics::SurfaceDescriptor;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::error::AppError;
use crate::surface::{SurfaceAdapter, SurfaceEvent};

/// Pumps allowed for the platform to deliver `resumed` at startup.
const STARTUP_PUMPS: u32 = 100;

/// A native window presented into by the host.
pub struct WinitSurface {
    event_loop: EventLoop<()>,
    state: WindowState,
}

impl WinitSurface {
    /// Open a window with the given title and inner size in physical pixels.
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, AppError> {
        let mut event_loop = EventLoop::new().map_err(|e| AppError::Window(e.to_string()))?;
        let attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(PhysicalSize::new(width, height));
        let mut state = WindowState::new(attributes, PhysicalSize::new(width, height));

        for _ in 0..STARTUP_PUMPS {
            let status = event_loop.pump_app_events(Some(Duration::from_millis(10)), &mut state);
            if let Some(err) = state.error.take() {
                return Err(AppError::Window(err));
            }
            if let PumpStatus::Exit(code) = status {
                return Err(AppError::Window(format!(
                    "event loop exited during startup (code {code})"
                )));
            }
            if state.window.is_some() {
                break;
            }
        }
        if state.window.is_none() {
            return Err(AppError::Window("window was not created".into()));
        }

        // Sizes reported during creation are already in the descriptor.
        state.events.clear();
        Ok(Self { event_loop, state })
    }

    /// The underlying window, while it exists.
    pub fn window(&self) -> Option<&Window> {
        self.state.window.as_ref()
    }
}

impl SurfaceAdapter for WinitSurface {
    fn current_descriptor(&self) -> SurfaceDescriptor {
        self.state.descriptor()
    }

    fn is_available(&self) -> bool {
        self.state.available
    }

    fn pump_events(&mut self, wait: Duration) -> Result<Vec<SurfaceEvent>, AppError> {
        let status = self.event_loop.pump_app_events(Some(wait), &mut self.state);
        if let Some(err) = self.state.error.take() {
            return Err(AppError::Window(err));
        }
        if let PumpStatus::Exit(code) = status
            && !self.state.exit_reported
        {
            log::info!("WinitSurface: event loop exited (code {})", code);
            self.state.exit_reported = true;
            self.state.events.push(SurfaceEvent::CloseRequested);
        }
        Ok(std::mem::take(&mut self.state.events))
    }
}

struct WindowState {
    attributes: WindowAttributes,
    window: Option<Window>,
    window_id: u64,
    size: PhysicalSize<u32>,
    available: bool,
    created_once: bool,
    exit_reported: bool,
    events: Vec<SurfaceEvent>,
    error: Option<String>,
}

impl WindowState {
    fn new(attributes: WindowAttributes, size: PhysicalSize<u32>) -> Self {
        Self {
            attributes,
            window: None,
            window_id: 0,
            size,
            available: false,
            created_once: false,
            exit_reported: false,
            events: Vec::new(),
            error: None,
        }
    }

    fn descriptor(&self) -> SurfaceDescriptor {
        SurfaceDescriptor::window(self.window_id, self.size.width, self.size.height)
    }
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match event_loop.create_window(self.attributes.clone()) {
            Ok(window) => {
                self.window_id = u64::from(window.id());
                self.size = window.inner_size();
                self.available = true;
                log::info!(
                    "Window created ({}x{} physical)",
                    self.size.width,
                    self.size.height
                );
                if self.created_once {
                    self.events.push(SurfaceEvent::SurfaceRestored);
                }
                self.created_once = true;
                self.window = Some(window);
            }
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                self.error = Some(e.to_string());
                event_loop.exit();
            }
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        log::info!("Window surface suspended");
        self.window = None;
        self.available = false;
        self.events.push(SurfaceEvent::SurfaceDestroyed);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                self.events.push(SurfaceEvent::CloseRequested);
            }
            WindowEvent::Resized(size) => {
                self.size = size;
                self.events.push(SurfaceEvent::Resized(self.descriptor()));
            }
            WindowEvent::Destroyed => {
                self.window = None;
                self.available = false;
                self.events.push(SurfaceEvent::SurfaceDestroyed);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                log::info!("Escape pressed, closing");
                self.events.push(SurfaceEvent::CloseRequested);
            }
            _ => {}
        }
    }
}
