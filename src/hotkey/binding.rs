use super::HotkeyError;
use crate::keys::VirtualKey;
use crate::signals::Signal;
use anyhow::Result;

/// The one registration id this process ever uses.
pub const HOTKEY_SLOT: i32 = 1;

/// OS facility that maps a slot id to a key with no modifiers.
pub trait HotkeyRegistrar {
    fn register(&mut self, slot: i32, key: VirtualKey) -> Result<()>;
    fn unregister(&mut self, slot: i32) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Same key as before; nothing was touched.
    Unchanged,
    Rebound { previous: Option<VirtualKey> },
}

/// Owns the process-wide hotkey slot and releases it on drop.
pub struct GlobalHotkeyBinding<R: HotkeyRegistrar> {
    registrar: R,
    bound: Option<VirtualKey>,
}

impl<R: HotkeyRegistrar> GlobalHotkeyBinding<R> {
    pub fn new(registrar: R) -> Self {
        Self {
            registrar,
            bound: None,
        }
    }

    pub fn bound_key(&self) -> Option<VirtualKey> {
        self.bound
    }

    /// Replace the binding. A failed registration leaves no hotkey active;
    /// the previous key is not restored.
    pub fn register(&mut self, key: VirtualKey) -> Result<RegisterOutcome, HotkeyError> {
        if self.bound == Some(key) {
            tracing::debug!(%key, "hotkey already bound");
            return Ok(RegisterOutcome::Unchanged);
        }

        let previous = self.bound.take();
        // The slot may hold nothing yet.
        if let Err(err) = self.registrar.unregister(HOTKEY_SLOT) {
            tracing::debug!(?err, "unregister before register failed");
        }

        match self.registrar.register(HOTKEY_SLOT, key) {
            Ok(()) => {
                self.bound = Some(key);
                tracing::info!(%key, slot = HOTKEY_SLOT, "registered hotkey");
                Ok(RegisterOutcome::Rebound { previous })
            }
            Err(source) => {
                tracing::error!(%key, ?source, "failed to register hotkey");
                Err(HotkeyError::Registration { key, source })
            }
        }
    }

    pub fn unregister(&mut self) {
        let Some(key) = self.bound.take() else {
            return;
        };
        match self.registrar.unregister(HOTKEY_SLOT) {
            Ok(()) => tracing::info!(%key, "unregistered hotkey"),
            Err(err) => tracing::warn!(%key, ?err, "failed to unregister hotkey"),
        }
    }

    /// Map a platform "hotkey pressed" notification to a signal.
    pub fn handle_hotkey_message(&self, id: i32) -> Option<Signal> {
        (id == HOTKEY_SLOT && self.bound.is_some()).then_some(Signal::Activated)
    }
}

impl<R: HotkeyRegistrar> Drop for GlobalHotkeyBinding<R> {
    fn drop(&mut self) {
        self.unregister();
    }
}
