use crate::hotkey::{KeySink, KeyboardFilter};
use crate::keys::{KeyEvent, KeyEventKind, VirtualKey};
use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use std::sync::Mutex;
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, SetWindowsHookExW, UnhookWindowsHookEx, HC_ACTION, HHOOK, KBDLLHOOKSTRUCT,
    KBDLLHOOKSTRUCT_FLAGS, WH_KEYBOARD_LL, WM_KEYDOWN, WM_KEYUP, WM_SYSKEYDOWN, WM_SYSKEYUP,
};

const LLKHF_INJECTED: KBDLLHOOKSTRUCT_FLAGS = KBDLLHOOKSTRUCT_FLAGS(0x10);

// The hook procedure has no user data slot.
static KEY_SINK: Lazy<Mutex<Option<KeySink>>> = Lazy::new(|| Mutex::new(None));

pub struct HookHandle(HHOOK);

/// `WH_KEYBOARD_LL` filter installed on the calling (UI) thread, which must
/// pump messages for the hook to be called.
#[derive(Debug, Default)]
pub struct Win32KeyboardFilter;

impl KeyboardFilter for Win32KeyboardFilter {
    type Handle = HookHandle;

    fn install(&mut self, sink: KeySink) -> Result<HookHandle> {
        if let Ok(mut guard) = KEY_SINK.lock() {
            *guard = Some(sink);
        }

        let installed = unsafe {
            let hmodule = GetModuleHandleW(None).context("GetModuleHandleW")?;
            SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_hook_proc), hmodule, 0)
        };
        match installed {
            Ok(hook) if !hook.0.is_null() => {
                tracing::debug!("low-level keyboard hook installed");
                Ok(HookHandle(hook))
            }
            Ok(_) => {
                clear_sink();
                Err(anyhow!(windows::core::Error::from_win32()))
            }
            Err(err) => {
                clear_sink();
                Err(anyhow!(err).context("SetWindowsHookExW(WH_KEYBOARD_LL)"))
            }
        }
    }

    fn uninstall(&mut self, handle: HookHandle) {
        clear_sink();
        if let Err(err) = unsafe { UnhookWindowsHookEx(handle.0) } {
            tracing::warn!(?err, "failed to remove keyboard hook");
        } else {
            tracing::debug!("low-level keyboard hook removed");
        }
    }
}

fn clear_sink() {
    if let Ok(mut guard) = KEY_SINK.lock() {
        *guard = None;
    }
}

fn event_kind(message: u32) -> Option<KeyEventKind> {
    match message {
        WM_KEYDOWN => Some(KeyEventKind::KeyDown),
        WM_SYSKEYDOWN => Some(KeyEventKind::SysKeyDown),
        WM_KEYUP => Some(KeyEventKind::KeyUp),
        WM_SYSKEYUP => Some(KeyEventKind::SysKeyUp),
        _ => None,
    }
}

unsafe extern "system" fn keyboard_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code == HC_ACTION as i32 {
        if let Some(kind) = event_kind(w_param.0 as u32) {
            let info = unsafe { &*(l_param.0 as *const KBDLLHOOKSTRUCT) };
            let event = KeyEvent {
                key: VirtualKey(info.vkCode),
                kind,
                injected: (info.flags & LLKHF_INJECTED) != KBDLLHOOKSTRUCT_FLAGS(0),
            };
            if let Ok(guard) = KEY_SINK.lock() {
                if let Some(sink) = guard.as_ref() {
                    sink(event);
                }
            }
        }
    }

    CallNextHookEx(HHOOK(std::ptr::null_mut()), n_code, w_param, l_param)
}
