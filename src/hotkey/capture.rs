use super::HotkeyError;
use crate::keys::{KeyEvent, VirtualKey};
use anyhow::Result;
use std::sync::Arc;

/// Callback a keyboard filter invokes for every event it sees. It runs inside
/// the OS input path, so it must return immediately.
pub type KeySink = Arc<dyn Fn(KeyEvent) + Send + Sync>;

/// System-wide keyboard filter that reports events and forwards them on.
pub trait KeyboardFilter {
    type Handle;

    fn install(&mut self, sink: KeySink) -> Result<Self::Handle>;
    fn uninstall(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyCandidate {
    pub key: VirtualKey,
}

/// Learns the next physical key press. Listening ends on its own after one
/// candidate.
pub struct HotkeyCapture<F: KeyboardFilter> {
    filter: F,
    sink: KeySink,
    handle: Option<F::Handle>,
}

impl<F: KeyboardFilter> HotkeyCapture<F> {
    pub fn new(filter: F, sink: KeySink) -> Self {
        Self {
            filter,
            sink,
            handle: None,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.handle.is_some()
    }

    /// Returns `Ok(false)` when already listening.
    pub fn begin(&mut self) -> Result<bool, HotkeyError> {
        if self.handle.is_some() {
            return Ok(false);
        }

        let handle = self
            .filter
            .install(self.sink.clone())
            .map_err(|source| HotkeyError::HookInstall { source })?;
        self.handle = Some(handle);
        tracing::debug!("listening for a new hotkey");
        Ok(true)
    }

    /// Consume a filter event. The filter is uninstalled before the
    /// candidate is handed back, so the same press cannot be captured twice.
    pub fn handle_key_event(&mut self, event: KeyEvent) -> Option<HotkeyCandidate> {
        if !self.is_listening() || !event.kind.is_down() || event.injected {
            return None;
        }

        self.end();
        tracing::debug!(key = %event.key, "captured hotkey candidate");
        Some(HotkeyCandidate { key: event.key })
    }

    pub fn end(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.filter.uninstall(handle);
            tracing::debug!("stopped listening for a new hotkey");
        }
    }
}

impl<F: KeyboardFilter> Drop for HotkeyCapture<F> {
    fn drop(&mut self) {
        self.end();
    }
}
