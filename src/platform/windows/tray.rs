use super::to_wide;
use crate::menu::{MenuCommand, MenuEntry, MenuModel};
use anyhow::{anyhow, Result};
use windows::core::PCWSTR;
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, POINT, WPARAM};
use windows::Win32::UI::Shell::{
    Shell_NotifyIconW, NIF_ICON, NIF_MESSAGE, NIF_TIP, NIM_ADD, NIM_DELETE, NOTIFYICONDATAW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CreatePopupMenu, DestroyMenu, GetCursorPos, LoadIconW, PostMessageW,
    SetForegroundWindow, TrackPopupMenu, HMENU, IDI_APPLICATION, MF_CHECKED, MF_SEPARATOR,
    MF_STRING, TPM_BOTTOMALIGN, TPM_LEFTALIGN, TPM_NONOTIFY, TPM_RETURNCMD, TPM_RIGHTBUTTON,
    WM_NULL, WM_USER,
};

/// Callback message the shell sends for tray icon mouse events.
pub const WM_TRAYICON: u32 = WM_USER + 1;

const TRAY_ICON_ID: u32 = 1;

/// Notification-area icon; removed on drop.
pub struct TrayIcon {
    hwnd: isize,
}

impl TrayIcon {
    pub fn add(hwnd: HWND, tooltip: &str) -> Result<Self> {
        let mut nid = notify_data(hwnd);
        nid.uFlags = NIF_ICON | NIF_MESSAGE | NIF_TIP;
        nid.uCallbackMessage = WM_TRAYICON;
        nid.hIcon = unsafe { LoadIconW(HINSTANCE::default(), IDI_APPLICATION) }.unwrap_or_default();
        for (slot, ch) in nid.szTip.iter_mut().take(127).zip(tooltip.encode_utf16()) {
            *slot = ch;
        }

        if !unsafe { Shell_NotifyIconW(NIM_ADD, &nid) }.as_bool() {
            return Err(anyhow!("Shell_NotifyIconW(NIM_ADD) failed"));
        }
        tracing::debug!("tray icon added");
        Ok(Self {
            hwnd: hwnd.0 as isize,
        })
    }
}

impl Drop for TrayIcon {
    fn drop(&mut self) {
        let nid = notify_data(HWND(self.hwnd as *mut _));
        unsafe {
            let _ = Shell_NotifyIconW(NIM_DELETE, &nid);
        }
    }
}

fn notify_data(hwnd: HWND) -> NOTIFYICONDATAW {
    NOTIFYICONDATAW {
        cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
        hWnd: hwnd,
        uID: TRAY_ICON_ID,
        ..Default::default()
    }
}

/// Show `model` at the cursor and block until the user picks or dismisses.
pub fn show_menu(hwnd: HWND, model: &MenuModel) -> Option<MenuCommand> {
    let menu = match unsafe { CreatePopupMenu() } {
        Ok(menu) => menu,
        Err(err) => {
            tracing::error!(?err, "failed to create tray menu");
            return None;
        }
    };

    if let Err(err) = fill_menu(menu, model) {
        tracing::error!(?err, "failed to build tray menu");
        unsafe {
            let _ = DestroyMenu(menu);
        }
        return None;
    }

    let chosen = unsafe {
        let mut pt = POINT::default();
        let _ = GetCursorPos(&mut pt);
        // Required for the menu to close when clicking elsewhere.
        let _ = SetForegroundWindow(hwnd);
        let chosen = TrackPopupMenu(
            menu,
            TPM_BOTTOMALIGN | TPM_LEFTALIGN | TPM_RIGHTBUTTON | TPM_RETURNCMD | TPM_NONOTIFY,
            pt.x,
            pt.y,
            0,
            hwnd,
            None,
        );
        let _ = PostMessageW(hwnd, WM_NULL, WPARAM(0), LPARAM(0));
        let _ = DestroyMenu(menu);
        chosen
    };

    u32::try_from(chosen.0).ok().and_then(MenuCommand::from_id)
}

fn fill_menu(menu: HMENU, model: &MenuModel) -> Result<()> {
    for entry in &model.entries {
        match entry {
            MenuEntry::Separator => unsafe {
                AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null())?;
            },
            MenuEntry::Item(item) => {
                let label = to_wide(&item.label);
                let flags = if item.checked {
                    MF_STRING | MF_CHECKED
                } else {
                    MF_STRING
                };
                unsafe {
                    AppendMenuW(menu, flags, item.command.id() as usize, PCWSTR(label.as_ptr()))?;
                }
            }
        }
    }
    Ok(())
}
