use crate::geometry::{Coordinate, Rect};
use crate::overlay::OverlaySurface;
use super::to_wide;
use std::cell::RefCell;
use std::time::Duration;
use windows::core::w;
use windows::Win32::Foundation::{COLORREF, HWND, RECT, TRUE};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, CreateFontIndirectW, DeleteObject, DrawTextW, EndPaint, FillRect, GetStockObject,
    InvalidateRect, SelectObject, SetBkMode, SetTextColor, BLACK_BRUSH, DT_CENTER, DT_SINGLELINE,
    DT_VCENTER, HBRUSH, LOGFONTW, PAINTSTRUCT, TRANSPARENT,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetClientRect, KillTimer, SetTimer, SetWindowPos, SystemParametersInfoW, HWND_TOPMOST,
    SPI_GETWORKAREA, SWP_NOACTIVATE, SWP_NOSIZE, SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS,
};

pub const TICK_TIMER_ID: usize = 1;

const FONT_HEIGHT: i32 = -32;
const FONT_WEIGHT_BOLD: i32 = 700;
const TEXT_COLOR: COLORREF = COLORREF(0x00ff_ffff);

thread_local! {
    // Read by WM_PAINT without touching the controller.
    static DISPLAY_TEXT: RefCell<String> = RefCell::new(String::new());
}

pub struct Win32Surface {
    hwnd: isize,
}

impl Win32Surface {
    pub fn new(hwnd: isize) -> Self {
        Self { hwnd }
    }

    fn hwnd(&self) -> HWND {
        HWND(self.hwnd as *mut _)
    }
}

impl OverlaySurface for Win32Surface {
    fn work_area(&self) -> Option<Rect> {
        let mut rect = RECT::default();
        let queried = unsafe {
            SystemParametersInfoW(
                SPI_GETWORKAREA,
                0,
                Some(&mut rect as *mut RECT as *mut _),
                SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS(0),
            )
        };
        match queried {
            Ok(()) => Some(Rect::new(rect.left, rect.top, rect.right, rect.bottom)),
            Err(err) => {
                tracing::warn!(?err, "work area unavailable");
                None
            }
        }
    }

    fn move_to(&mut self, location: Coordinate) {
        let moved = unsafe {
            SetWindowPos(
                self.hwnd(),
                HWND_TOPMOST,
                location.x,
                location.y,
                0,
                0,
                SWP_NOSIZE | SWP_NOACTIVATE,
            )
        };
        if let Err(err) = moved {
            tracing::warn!(?err, ?location, "failed to move overlay");
        }
    }

    fn render(&mut self, text: &str) {
        DISPLAY_TEXT.with(|current| {
            let mut current = current.borrow_mut();
            current.clear();
            current.push_str(text);
        });
        unsafe {
            let _ = InvalidateRect(self.hwnd(), None, TRUE);
        }
    }

    fn start_ticking(&mut self, interval: Duration) {
        let millis = u32::try_from(interval.as_millis()).unwrap_or(u32::MAX);
        if unsafe { SetTimer(self.hwnd(), TICK_TIMER_ID, millis, None) } == 0 {
            tracing::error!("SetTimer failed; countdown will not advance");
        }
    }

    fn stop_ticking(&mut self) {
        // Fails harmlessly when no timer is running.
        unsafe {
            let _ = KillTimer(self.hwnd(), TICK_TIMER_ID);
        }
    }
}

/// Black background, centred white bold text.
pub fn paint(hwnd: HWND) {
    let mut text = DISPLAY_TEXT.with(|current| to_wide(&current.borrow()));
    // DrawTextW takes the length from the slice; drop the terminator.
    text.pop();

    unsafe {
        let mut paint = PAINTSTRUCT::default();
        let hdc = BeginPaint(hwnd, &mut paint);

        let mut client = RECT::default();
        if GetClientRect(hwnd, &mut client).is_err() {
            client = paint.rcPaint;
        }
        FillRect(hdc, &client, HBRUSH(GetStockObject(BLACK_BRUSH).0));

        let mut font_desc = LOGFONTW {
            lfHeight: FONT_HEIGHT,
            lfWeight: FONT_WEIGHT_BOLD,
            ..Default::default()
        };
        let face = w!("Segoe UI");
        for (slot, ch) in font_desc.lfFaceName.iter_mut().zip(face.as_wide()) {
            *slot = *ch;
        }
        let font = CreateFontIndirectW(&font_desc);
        let old = SelectObject(hdc, font);

        SetBkMode(hdc, TRANSPARENT);
        SetTextColor(hdc, TEXT_COLOR);
        DrawTextW(
            hdc,
            &mut text,
            &mut client,
            DT_CENTER | DT_VCENTER | DT_SINGLELINE,
        );

        SelectObject(hdc, old);
        let _ = DeleteObject(font);
        let _ = EndPaint(hwnd, &paint);
    }
}
