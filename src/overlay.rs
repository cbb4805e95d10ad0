use crate::geometry::{clamp_to_work_area, Coordinate, Rect, Size};
use crate::location_store::LocationStore;
use crate::signals::Signal;
use crate::timer::{format_remaining, Countdown, TickOutcome, TimerState, ToggleOutcome};
use std::time::Duration;

/// The window the overlay draws into.
pub trait OverlaySurface {
    /// Work area of the primary display, `None` when it cannot be queried.
    fn work_area(&self) -> Option<Rect>;
    fn move_to(&mut self, location: Coordinate);
    fn render(&mut self, text: &str);
    fn start_ticking(&mut self, interval: Duration);
    fn stop_ticking(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    NotDragging,
    /// `anchor` is where the button went down, relative to the overlay.
    Dragging { anchor: Coordinate },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlaySettings {
    pub default_duration: Duration,
    pub size: Size,
    pub default_location: Coordinate,
    pub tick_interval: Duration,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            default_duration: Duration::from_secs(90),
            size: Size::new(180, 60),
            default_location: Coordinate::new(100, 100),
            tick_interval: Duration::from_secs(1),
        }
    }
}

/// Countdown, drag and placement of the overlay window.
pub struct OverlayStateMachine<S: OverlaySurface> {
    surface: S,
    store: Box<dyn LocationStore>,
    settings: OverlaySettings,
    countdown: Countdown,
    drag: DragState,
    location: Coordinate,
}

impl<S: OverlaySurface> OverlayStateMachine<S> {
    /// Places the overlay at the stored location (or the default) and
    /// renders the idle countdown.
    pub fn new(surface: S, store: Box<dyn LocationStore>, settings: OverlaySettings) -> Self {
        let initial = store.load().unwrap_or(settings.default_location);
        let mut overlay = Self {
            surface,
            store,
            settings,
            countdown: Countdown::new(settings.default_duration),
            drag: DragState::NotDragging,
            location: initial,
        };
        overlay.apply_location(initial);
        overlay.refresh();
        overlay
    }

    pub fn timer_state(&self) -> TimerState {
        self.countdown.state()
    }

    pub fn default_duration(&self) -> Duration {
        self.countdown.default_duration()
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn location(&self) -> Coordinate {
        self.location
    }

    pub fn size(&self) -> Size {
        self.settings.size
    }

    pub fn display_text(&self) -> String {
        format_remaining(self.countdown.remaining())
    }

    pub fn toggle(&mut self) -> Signal {
        let signal = match self.countdown.toggle() {
            ToggleOutcome::Started => {
                self.surface.start_ticking(self.settings.tick_interval);
                Signal::TimerStarted
            }
            ToggleOutcome::Stopped => {
                self.surface.stop_ticking();
                Signal::TimerStopped
            }
        };
        tracing::debug!(state = ?self.countdown.state(), "timer toggled");
        self.refresh();
        signal
    }

    pub fn tick(&mut self) -> Option<Signal> {
        match self.countdown.tick() {
            TickOutcome::Ignored => None,
            TickOutcome::Counted { .. } => {
                self.refresh();
                None
            }
            TickOutcome::Expired => {
                self.surface.stop_ticking();
                self.refresh();
                tracing::info!("countdown expired");
                Some(Signal::TimerExpired)
            }
        }
    }

    pub fn set_default_duration(&mut self, duration: Duration) -> Signal {
        self.surface.stop_ticking();
        self.countdown.set_default_duration(duration);
        self.refresh();
        let duration = self.countdown.default_duration();
        tracing::info!(secs = duration.as_secs(), "default duration changed");
        Signal::DurationChanged(duration)
    }

    pub fn mouse_down(&mut self, button: MouseButton, local: Coordinate) {
        if button == MouseButton::Primary && self.drag == DragState::NotDragging {
            self.drag = DragState::Dragging { anchor: local };
        }
    }

    /// `screen` is the cursor position in screen coordinates.
    pub fn mouse_move(&mut self, screen: Coordinate) {
        if let DragState::Dragging { anchor } = self.drag {
            self.location = screen - anchor;
            self.surface.move_to(self.location);
        }
    }

    pub fn mouse_up(&mut self, button: MouseButton) {
        if button == MouseButton::Primary {
            self.end_drag();
        }
    }

    /// End a drag whose button release will never arrive, keeping the
    /// position reached so far.
    pub fn end_drag(&mut self) {
        if let DragState::Dragging { .. } = self.drag {
            self.drag = DragState::NotDragging;
            self.store.save(self.location);
        }
    }

    /// Move to `desired`, pulled inside the primary work area.
    pub fn apply_location(&mut self, desired: Coordinate) {
        let placed = clamp_to_work_area(desired, self.settings.size, self.surface.work_area());
        if placed != desired {
            tracing::debug!(?desired, ?placed, "overlay location clamped");
        }
        self.location = placed;
        self.surface.move_to(placed);
    }

    pub fn reset_location_to_default(&mut self) {
        self.apply_location(self.settings.default_location);
        self.store.save(self.location);
    }

    /// Stop ticking and persist the final location.
    pub fn shutdown(&mut self) {
        self.surface.stop_ticking();
        self.drag = DragState::NotDragging;
        self.store.save(self.location);
    }

    fn refresh(&mut self) {
        let text = self.display_text();
        self.surface.render(&text);
    }
}
