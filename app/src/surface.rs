//! Window/surface adapters.
//!
//! A [`SurfaceAdapter`] reports the size and identity of whatever the host
//! presents into, and the platform events that change it. It owns no GPU
//! resources.

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use hearth_graphics::SurfaceDescriptor;

use crate::error::AppError;

/// Platform events relevant to presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The surface has a new size. A zero area means minimized.
    Resized(SurfaceDescriptor),
    /// The surface can no longer be presented into.
    SurfaceDestroyed,
    /// A previously destroyed surface is usable again.
    SurfaceRestored,
    /// The user asked to close the window.
    CloseRequested,
}

/// Boundary between the frame pump and the platform.
pub trait SurfaceAdapter {
    /// Current size and identity of the surface.
    fn current_descriptor(&self) -> SurfaceDescriptor;

    /// Whether the surface can be presented into right now.
    fn is_available(&self) -> bool {
        true
    }

    /// Collect pending platform events.
    ///
    /// `wait` bounds how long the call may block when nothing is pending;
    /// the pump passes a non-zero wait only while it has nothing to draw.
    fn pump_events(&mut self, wait: Duration) -> Result<Vec<SurfaceEvent>, AppError>;
}

/// Off-screen surface with scripted events.
///
/// Events are scheduled by pump index: an event scheduled at `n` is
/// delivered by the `n`-th call to [`pump_events`](SurfaceAdapter::pump_events)
/// (counting from zero).
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    descriptor: SurfaceDescriptor,
    available: bool,
    scheduled: BTreeMap<u64, Vec<SurfaceEvent>>,
    queued: VecDeque<SurfaceEvent>,
    pumps: u64,
}

impl HeadlessSurface {
    /// Off-screen surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            descriptor: SurfaceDescriptor::offscreen(width, height),
            available: true,
            scheduled: BTreeMap::new(),
            queued: VecDeque::new(),
            pumps: 0,
        }
    }

    /// Deliver `event` on the `at_pump`-th pump.
    pub fn with_event(mut self, at_pump: u64, event: SurfaceEvent) -> Self {
        self.schedule(at_pump, event);
        self
    }

    /// Deliver a resize to `width`x`height` on the `at_pump`-th pump.
    pub fn with_resize(self, at_pump: u64, width: u32, height: u32) -> Self {
        let descriptor = self.descriptor.with_size(width, height);
        self.with_event(at_pump, SurfaceEvent::Resized(descriptor))
    }

    /// Deliver `event` on the `at_pump`-th pump.
    pub fn schedule(&mut self, at_pump: u64, event: SurfaceEvent) {
        self.scheduled.entry(at_pump).or_default().push(event);
    }

    /// Deliver `event` on the next pump.
    pub fn push(&mut self, event: SurfaceEvent) {
        self.queued.push_back(event);
    }

    /// Number of completed pumps.
    pub fn pumps(&self) -> u64 {
        self.pumps
    }

    fn apply(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Resized(descriptor) => self.descriptor = descriptor,
            SurfaceEvent::SurfaceDestroyed => self.available = false,
            SurfaceEvent::SurfaceRestored => self.available = true,
            SurfaceEvent::CloseRequested => {}
        }
    }
}

impl SurfaceAdapter for HeadlessSurface {
    fn current_descriptor(&self) -> SurfaceDescriptor {
        self.descriptor
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn pump_events(&mut self, _wait: Duration) -> Result<Vec<SurfaceEvent>, AppError> {
        let mut events: Vec<SurfaceEvent> = self.queued.drain(..).collect();
        if let Some(scheduled) = self.scheduled.remove(&self.pumps) {
            events.extend(scheduled);
        }
        for event in &events {
            self.apply(*event);
        }
        self.pumps += 1;
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduled_events_arrive_on_their_pump() {
        let mut surface = HeadlessSurface::new(800, 600)
            .with_resize(1, 1024, 768)
            .with_event(2, SurfaceEvent::SurfaceDestroyed);

        assert!(surface.pump_events(Duration::ZERO).unwrap().is_empty());
        assert_eq!(surface.current_descriptor().width, 800);

        let events = surface.pump_events(Duration::ZERO).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(surface.current_descriptor().width, 1024);

        surface.pump_events(Duration::ZERO).unwrap();
        assert!(!surface.is_available());
        assert_eq!(surface.pumps(), 3);
    }

    #[test]
    fn test_pushed_events_come_first() {
        let mut surface = HeadlessSurface::new(64, 64).with_event(0, SurfaceEvent::CloseRequested);
        surface.push(SurfaceEvent::SurfaceRestored);
        assert_eq!(
            surface.pump_events(Duration::ZERO).unwrap(),
            vec![SurfaceEvent::SurfaceRestored, SurfaceEvent::CloseRequested]
        );
    }
}
