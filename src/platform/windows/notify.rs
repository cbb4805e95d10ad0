use super::to_wide;
use crate::signals::Notice;
use windows::core::PCWSTR;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_ICONERROR, MB_OK};

const CAPTION: &str = "Overlay Timer";

/// Blocking error dialog. Must not be called while the controller is borrowed.
pub fn show_notice(hwnd: HWND, notice: &Notice) {
    tracing::warn!(%notice, "showing notice");
    let text = to_wide(&notice.to_string());
    let caption = to_wide(CAPTION);
    unsafe {
        MessageBoxW(
            hwnd,
            PCWSTR(text.as_ptr()),
            PCWSTR(caption.as_ptr()),
            MB_OK | MB_ICONERROR,
        );
    }
}
