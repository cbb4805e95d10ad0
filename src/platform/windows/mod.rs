//! Win32 overlay window, tray icon and message loop.
//!
//! All controller work happens on the UI thread. The controller lives in a
//! thread-local so the window procedure can reach it; modal loops (message
//! boxes, popup menus) only run once that borrow has been released.

pub mod hook;
pub mod notify;
pub mod registrar;
pub mod surface;
pub mod tray;

use crate::config::Config;
use crate::controller::{Controller, Outcome};
use crate::cues::ToneCuePlayer;
use crate::geometry::Coordinate;
use crate::hotkey::{GlobalHotkeyBinding, HotkeyCapture, KeySink};
use crate::keys::{KeyEvent, KeyEventKind, VirtualKey};
use crate::location_store::JsonLocationStore;
use crate::overlay::{MouseButton, OverlayStateMachine};
use anyhow::{anyhow, Context, Result};
use hook::Win32KeyboardFilter;
use registrar::Win32HotkeyRegistrar;
use std::cell::RefCell;
use std::sync::Arc;
use surface::{Win32Surface, TICK_TIMER_ID};
use tray::{TrayIcon, WM_TRAYICON};
use windows::core::PCWSTR;
use windows::Win32::Foundation::{COLORREF, HINSTANCE, HWND, LPARAM, LRESULT, POINT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::{ReleaseCapture, SetCapture};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetCursorPos, GetMessageW,
    LoadCursorW, PostMessageW, PostQuitMessage, RegisterClassW, SetLayeredWindowAttributes,
    ShowWindow, TranslateMessage, HMENU, IDC_SIZEALL, LWA_ALPHA, MSG, SW_SHOWNOACTIVATE, WM_APP,
    WM_CAPTURECHANGED, WM_CLOSE, WM_CONTEXTMENU, WM_DESTROY, WM_HOTKEY, WM_LBUTTONDBLCLK,
    WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MOUSEMOVE, WM_PAINT, WM_RBUTTONUP, WM_TIMER, WNDCLASSW,
    WS_EX_LAYERED, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_POPUP,
};

/// Posted by the keyboard hook: `wparam` is the key code, `lparam` the
/// encoded kind and injected flag.
const WM_KEY_CAPTURED: u32 = WM_APP + 1;

const CLASS_NAME: &str = "OverlayTimerWindow";
const TRAY_TOOLTIP: &str = "Overlay Timer";

type AppController = Controller<Win32Surface, Win32HotkeyRegistrar, Win32KeyboardFilter>;

thread_local! {
    static APP: RefCell<Option<AppController>> = const { RefCell::new(None) };
}

pub(crate) fn to_wide(value: &str) -> Vec<u16> {
    value.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Create the overlay and tray icon, then pump messages until exit.
pub fn run(config: Config) -> Result<()> {
    let hinstance: HINSTANCE = unsafe { GetModuleHandleW(None) }
        .context("GetModuleHandleW")?
        .into();
    let hwnd = create_window(hinstance, &config)?;
    let raw_hwnd = hwnd.0 as isize;

    let overlay = OverlayStateMachine::new(
        Win32Surface::new(raw_hwnd),
        Box::new(JsonLocationStore::new(&config.location_file)),
        config.overlay_settings(),
    );
    let controller = Controller::new(
        overlay,
        GlobalHotkeyBinding::new(Win32HotkeyRegistrar::new(raw_hwnd)),
        HotkeyCapture::new(Win32KeyboardFilter, key_sink(raw_hwnd)),
        Box::new(ToneCuePlayer),
        config.duration_presets.clone(),
        config.hotkey,
    );
    APP.with(|app| *app.borrow_mut() = Some(controller));

    let tray = TrayIcon::add(hwnd, TRAY_TOOLTIP);
    if let Err(err) = &tray {
        tracing::error!(?err, "tray icon unavailable; close the overlay with Alt+F4");
    }

    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOWNOACTIVATE);
    }
    dispatch(hwnd, |controller| controller.start());

    let mut msg = MSG::default();
    unsafe {
        while GetMessageW(&mut msg, HWND(std::ptr::null_mut()), 0, 0).into() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    drop(tray);
    if let Some(mut controller) = APP.with(|app| app.borrow_mut().take()) {
        controller.shutdown();
    }
    tracing::info!("message loop finished");
    Ok(())
}

fn create_window(hinstance: HINSTANCE, config: &Config) -> Result<HWND> {
    let class_name = to_wide(CLASS_NAME);
    unsafe {
        let wc = WNDCLASSW {
            lpfnWndProc: Some(wndproc),
            hInstance: hinstance,
            lpszClassName: PCWSTR(class_name.as_ptr()),
            hCursor: LoadCursorW(HINSTANCE::default(), IDC_SIZEALL).unwrap_or_default(),
            ..Default::default()
        };
        if RegisterClassW(&wc) == 0 {
            return Err(anyhow!(windows::core::Error::from_win32()).context("RegisterClassW"));
        }

        let hwnd = CreateWindowExW(
            WS_EX_LAYERED | WS_EX_TOPMOST | WS_EX_TOOLWINDOW | WS_EX_NOACTIVATE,
            PCWSTR(class_name.as_ptr()),
            PCWSTR::null(),
            WS_POPUP,
            config.default_location.x,
            config.default_location.y,
            config.overlay_size.width,
            config.overlay_size.height,
            None,
            HMENU::default(),
            hinstance,
            None,
        )
        .context("CreateWindowExW")?;

        SetLayeredWindowAttributes(hwnd, COLORREF(0), config.opacity, LWA_ALPHA)
            .context("SetLayeredWindowAttributes")?;
        Ok(hwnd)
    }
}

fn key_sink(hwnd: isize) -> KeySink {
    Arc::new(move |event: KeyEvent| {
        let (wparam, lparam) = encode_key_event(event);
        unsafe {
            let _ = PostMessageW(HWND(hwnd as *mut _), WM_KEY_CAPTURED, wparam, lparam);
        }
    })
}

const INJECTED_BIT: isize = 0x100;

fn encode_key_event(event: KeyEvent) -> (WPARAM, LPARAM) {
    let kind = match event.kind {
        KeyEventKind::KeyDown => 0,
        KeyEventKind::SysKeyDown => 1,
        KeyEventKind::KeyUp => 2,
        KeyEventKind::SysKeyUp => 3,
    };
    let injected = if event.injected { INJECTED_BIT } else { 0 };
    (WPARAM(event.key.code() as usize), LPARAM(kind | injected))
}

fn decode_key_event(wparam: WPARAM, lparam: LPARAM) -> KeyEvent {
    let kind = match lparam.0 & 0xFF {
        0 => KeyEventKind::KeyDown,
        1 => KeyEventKind::SysKeyDown,
        2 => KeyEventKind::KeyUp,
        _ => KeyEventKind::SysKeyUp,
    };
    KeyEvent {
        key: VirtualKey(wparam.0 as u32),
        kind,
        injected: lparam.0 & INJECTED_BIT != 0,
    }
}

fn client_point(lparam: LPARAM) -> Coordinate {
    let x = (lparam.0 & 0xFFFF) as u16 as i16 as i32;
    let y = ((lparam.0 >> 16) & 0xFFFF) as u16 as i16 as i32;
    Coordinate::new(x, y)
}

/// Run `f` against the controller, then act on the outcome with the borrow
/// released. Messages that arrive re-entrantly while the controller is busy
/// are dropped.
fn dispatch(hwnd: HWND, f: impl FnOnce(&mut AppController) -> Outcome) {
    let outcome = APP.with(|app| match app.try_borrow_mut() {
        Ok(mut guard) => guard.as_mut().map(f),
        Err(_) => {
            tracing::debug!("controller busy, message dropped");
            None
        }
    });
    let Some(outcome) = outcome else {
        return;
    };

    if let Some(notice) = outcome.notice {
        notify::show_notice(hwnd, &notice);
    }
    if outcome.quit {
        unsafe {
            let _ = DestroyWindow(hwnd);
        }
    }
}

fn show_tray_menu(hwnd: HWND) {
    let model = APP.with(|app| {
        app.try_borrow()
            .ok()
            .and_then(|guard| guard.as_ref().map(|controller| controller.menu_model()))
    });
    let Some(model) = model else {
        return;
    };
    if let Some(command) = tray::show_menu(hwnd, &model) {
        dispatch(hwnd, |controller| controller.handle_menu(command));
    }
}

unsafe extern "system" fn wndproc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        WM_HOTKEY => {
            dispatch(hwnd, |c| c.on_hotkey(wparam.0 as i32));
            LRESULT(0)
        }
        WM_TIMER if wparam.0 == TICK_TIMER_ID => {
            dispatch(hwnd, |c| c.on_tick());
            LRESULT(0)
        }
        WM_LBUTTONDOWN => {
            SetCapture(hwnd);
            let local = client_point(lparam);
            dispatch(hwnd, |c| c.on_mouse_down(MouseButton::Primary, local));
            LRESULT(0)
        }
        WM_MOUSEMOVE => {
            let mut pt = POINT::default();
            if GetCursorPos(&mut pt).is_ok() {
                dispatch(hwnd, |c| c.on_mouse_move(Coordinate::new(pt.x, pt.y)));
            }
            LRESULT(0)
        }
        WM_LBUTTONUP => {
            dispatch(hwnd, |c| c.on_mouse_up(MouseButton::Primary));
            let _ = ReleaseCapture();
            LRESULT(0)
        }
        // Alt+Tab, a modal box or another SetCapture can take the mouse
        // mid-drag; no WM_LBUTTONUP follows.
        WM_CAPTURECHANGED => {
            dispatch(hwnd, |c| c.on_capture_lost());
            LRESULT(0)
        }
        WM_KEY_CAPTURED => {
            let event = decode_key_event(wparam, lparam);
            dispatch(hwnd, |c| c.on_key_event(event));
            LRESULT(0)
        }
        WM_TRAYICON => {
            match lparam.0 as u32 {
                WM_LBUTTONDBLCLK => dispatch(hwnd, |c| c.on_tray_activate()),
                WM_RBUTTONUP | WM_CONTEXTMENU => show_tray_menu(hwnd),
                _ => {}
            }
            LRESULT(0)
        }
        WM_PAINT => {
            surface::paint(hwnd);
            LRESULT(0)
        }
        WM_CLOSE => {
            dispatch(hwnd, |c| {
                c.shutdown();
                Outcome::default()
            });
            let _ = DestroyWindow(hwnd);
            LRESULT(0)
        }
        WM_DESTROY => {
            PostQuitMessage(0);
            LRESULT(0)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}
