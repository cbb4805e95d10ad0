use crate::hotkey::HotkeyRegistrar;
use crate::keys::VirtualKey;
use anyhow::{Context, Result};
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    RegisterHotKey, UnregisterHotKey, HOT_KEY_MODIFIERS,
};

/// `RegisterHotKey` against the overlay window so `WM_HOTKEY` lands in its
/// window procedure.
pub struct Win32HotkeyRegistrar {
    hwnd: isize,
}

impl Win32HotkeyRegistrar {
    pub fn new(hwnd: isize) -> Self {
        Self { hwnd }
    }

    fn hwnd(&self) -> HWND {
        HWND(self.hwnd as *mut _)
    }
}

impl HotkeyRegistrar for Win32HotkeyRegistrar {
    fn register(&mut self, slot: i32, key: VirtualKey) -> Result<()> {
        unsafe { RegisterHotKey(self.hwnd(), slot, HOT_KEY_MODIFIERS(0), key.code()) }
            .with_context(|| format!("RegisterHotKey({key}, id {slot})"))
    }

    fn unregister(&mut self, slot: i32) -> Result<()> {
        unsafe { UnregisterHotKey(self.hwnd(), slot) }
            .with_context(|| format!("UnregisterHotKey(id {slot})"))
    }
}
