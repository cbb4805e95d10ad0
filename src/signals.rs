use crate::keys::VirtualKey;
use std::fmt;
use std::time::Duration;

/// Events the core reports so the controller can play cues and refresh the
/// tray menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Activated,
    TimerStarted,
    TimerStopped,
    TimerExpired,
    DurationChanged(Duration),
    HotkeyRebound(VirtualKey),
    HotkeyListeningStateChanged(bool),
}

/// Failure the user has to be told about once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    HotkeyRegistrationFailed(VirtualKey),
    HookInstallFailed,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::HotkeyRegistrationFailed(key) => write!(
                f,
                "Could not register the global hotkey \"{key}\". \
                 Another application may already be using it."
            ),
            Notice::HookInstallFailed => {
                write!(f, "Could not start listening for a new hotkey.")
            }
        }
    }
}
