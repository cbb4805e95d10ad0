//! Global hotkey subsystem: the single OS registration slot and the
//! one-shot keyboard capture used to pick a new key.

pub mod binding;
pub mod capture;

use crate::keys::VirtualKey;
use std::fmt;

pub use binding::{GlobalHotkeyBinding, HotkeyRegistrar, RegisterOutcome, HOTKEY_SLOT};
pub use capture::{HotkeyCandidate, HotkeyCapture, KeyboardFilter, KeySink};

#[derive(Debug)]
pub enum HotkeyError {
    /// The OS rejected the binding, usually because another process holds it.
    Registration {
        key: VirtualKey,
        source: anyhow::Error,
    },
    /// The low-level keyboard filter could not be installed.
    HookInstall { source: anyhow::Error },
}

impl fmt::Display for HotkeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HotkeyError::Registration { key, .. } => {
                write!(f, "registration failed for hotkey '{key}'")
            }
            HotkeyError::HookInstall { .. } => write!(f, "hook install failed"),
        }
    }
}

impl std::error::Error for HotkeyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HotkeyError::Registration { source, .. } | HotkeyError::HookInstall { source } => {
                Some(&**source)
            }
        }
    }
}
