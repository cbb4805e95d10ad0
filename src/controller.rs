//! Wires the tray menu, the hotkey and the keyboard capture to the overlay.
//!
//! Every entry point returns an [`Outcome`] so the platform layer can show
//! notices and quit only after it has released its hold on the controller.

use crate::cues::{cue_for, CuePlayer};
use crate::geometry::Coordinate;
use crate::hotkey::{
    GlobalHotkeyBinding, HotkeyCapture, HotkeyError, HotkeyRegistrar, KeyboardFilter,
    RegisterOutcome,
};
use crate::keys::{KeyEvent, VirtualKey};
use crate::menu::{MenuCommand, MenuModel, MenuState};
use crate::overlay::{MouseButton, OverlayStateMachine, OverlaySurface};
use crate::signals::{Notice, Signal};
use std::time::Duration;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub signals: Vec<Signal>,
    pub notice: Option<Notice>,
    pub quit: bool,
}

impl Outcome {
    fn signal(signal: Signal) -> Self {
        Self {
            signals: vec![signal],
            ..Self::default()
        }
    }

    fn notice(notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            ..Self::default()
        }
    }
}

pub struct Controller<S, R, F>
where
    S: OverlaySurface,
    R: HotkeyRegistrar,
    F: KeyboardFilter,
{
    overlay: OverlayStateMachine<S>,
    binding: GlobalHotkeyBinding<R>,
    capture: HotkeyCapture<F>,
    cues: Box<dyn CuePlayer>,
    presets: Vec<Duration>,
    initial_hotkey: VirtualKey,
    sound_enabled: bool,
    shut_down: bool,
}

impl<S, R, F> Controller<S, R, F>
where
    S: OverlaySurface,
    R: HotkeyRegistrar,
    F: KeyboardFilter,
{
    pub fn new(
        overlay: OverlayStateMachine<S>,
        binding: GlobalHotkeyBinding<R>,
        capture: HotkeyCapture<F>,
        cues: Box<dyn CuePlayer>,
        presets: Vec<Duration>,
        initial_hotkey: VirtualKey,
    ) -> Self {
        Self {
            overlay,
            binding,
            capture,
            cues,
            presets,
            initial_hotkey,
            sound_enabled: true,
            shut_down: false,
        }
    }

    pub fn overlay(&self) -> &OverlayStateMachine<S> {
        &self.overlay
    }

    pub fn bound_key(&self) -> Option<VirtualKey> {
        self.binding.bound_key()
    }

    pub fn is_listening(&self) -> bool {
        self.capture.is_listening()
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn menu_model(&self) -> MenuModel {
        MenuModel::build(MenuState {
            bound_key: self.binding.bound_key(),
            listening: self.capture.is_listening(),
            presets: &self.presets,
            current_duration: self.overlay.default_duration(),
            sound_enabled: self.sound_enabled,
        })
    }

    /// Register the initial hotkey. Startup is silent unless it fails.
    pub fn start(&mut self) -> Outcome {
        match self.binding.register(self.initial_hotkey) {
            Ok(_) => Outcome::default(),
            Err(err) => Outcome::notice(notice_for(&err)),
        }
    }

    pub fn on_hotkey(&mut self, id: i32) -> Outcome {
        let Some(activated) = self.binding.handle_hotkey_message(id) else {
            return Outcome::default();
        };
        let toggled = self.overlay.toggle();
        self.finish(Outcome {
            signals: vec![activated, toggled],
            ..Outcome::default()
        })
    }

    /// Tray icon double-click.
    pub fn on_tray_activate(&mut self) -> Outcome {
        let toggled = self.overlay.toggle();
        self.finish(Outcome::signal(toggled))
    }

    pub fn on_tick(&mut self) -> Outcome {
        match self.overlay.tick() {
            Some(signal) => self.finish(Outcome::signal(signal)),
            None => Outcome::default(),
        }
    }

    pub fn on_mouse_down(&mut self, button: MouseButton, local: Coordinate) -> Outcome {
        self.overlay.mouse_down(button, local);
        Outcome::default()
    }

    pub fn on_mouse_move(&mut self, screen: Coordinate) -> Outcome {
        self.overlay.mouse_move(screen);
        Outcome::default()
    }

    pub fn on_mouse_up(&mut self, button: MouseButton) -> Outcome {
        self.overlay.mouse_up(button);
        Outcome::default()
    }

    pub fn on_capture_lost(&mut self) -> Outcome {
        self.overlay.end_drag();
        Outcome::default()
    }

    pub fn on_key_event(&mut self, event: KeyEvent) -> Outcome {
        let Some(candidate) = self.capture.handle_key_event(event) else {
            return Outcome::default();
        };

        let mut outcome = Outcome::signal(Signal::HotkeyListeningStateChanged(false));
        match self.binding.register(candidate.key) {
            Ok(RegisterOutcome::Unchanged) => {}
            Ok(RegisterOutcome::Rebound { previous }) => {
                tracing::info!(?previous, key = %candidate.key, "hotkey rebound");
                outcome.signals.push(Signal::HotkeyRebound(candidate.key));
            }
            Err(err) => outcome.notice = Some(notice_for(&err)),
        }
        self.finish(outcome)
    }

    pub fn handle_menu(&mut self, command: MenuCommand) -> Outcome {
        tracing::debug!(?command, "menu command");
        let outcome = match command {
            MenuCommand::ChangeHotkey => match self.capture.begin() {
                Ok(true) => Outcome::signal(Signal::HotkeyListeningStateChanged(true)),
                Ok(false) => Outcome::default(),
                Err(err) => Outcome::notice(notice_for(&err)),
            },
            MenuCommand::SelectPreset(index) => match self.presets.get(index).copied() {
                Some(duration) => Outcome::signal(self.overlay.set_default_duration(duration)),
                None => {
                    tracing::warn!(index, "unknown duration preset");
                    Outcome::default()
                }
            },
            MenuCommand::ToggleSound => {
                self.sound_enabled = !self.sound_enabled;
                tracing::info!(enabled = self.sound_enabled, "sound cues toggled");
                Outcome::default()
            }
            MenuCommand::ResetPosition => {
                self.overlay.reset_location_to_default();
                Outcome::default()
            }
            MenuCommand::Exit => {
                self.shutdown();
                Outcome {
                    quit: true,
                    ..Outcome::default()
                }
            }
        };
        self.finish(outcome)
    }

    /// Persist the location, stop capturing and release the hotkey slot.
    /// Later calls do nothing.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.capture.end();
        self.binding.unregister();
        self.overlay.shutdown();
        tracing::info!("overlay shut down");
    }

    fn finish(&self, outcome: Outcome) -> Outcome {
        if self.sound_enabled {
            for cue in outcome.signals.iter().copied().filter_map(cue_for) {
                self.cues.play(cue);
            }
        }
        outcome
    }
}

fn notice_for(err: &HotkeyError) -> Notice {
    match err {
        HotkeyError::Registration { key, .. } => Notice::HotkeyRegistrationFailed(*key),
        HotkeyError::HookInstall { .. } => Notice::HookInstallFailed,
    }
}
