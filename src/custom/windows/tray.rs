// Tray balloon notifications through Shell_NotifyIconW

use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::HWND,
        Graphics::Gdi::{InvalidateRect, RedrawWindow, RDW_INVALIDATE, RDW_UPDATENOW},
        UI::{Shell::*, WindowsAndMessaging::*},
    },
};
use windows_strings::w;

use crate::error::{MenuError, Result};
use crate::notify::hide::{force_hide, TrayIconOps};
use crate::notify::{Notification, NotificationSurface, NotifyIcon};
use crate::{info, warn};

const TRAY_UID: u32 = 1;
const TOOLTIP: &str = "Classic context menu";

/// A tray icon owned by a hidden message-only window.
pub struct TrayBalloon {
    // Stored as isize so the surface can cross into the hide timer
    hwnd: isize,
    added: AtomicBool,
}

impl TrayBalloon {
    pub fn new() -> Result<Self> {
        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                w!("STATIC"),
                w!("classic-menu"),
                WINDOW_STYLE::default(),
                0,
                0,
                0,
                0,
                Some(HWND_MESSAGE),
                None,
                None,
                None,
            )
        }
        .map_err(|e| MenuError::Notify(format!("cannot create tray host window: {}", e.message())))?;

        info!("[Tray] Created tray host window {:#X}", hwnd.0 as isize);
        Ok(Self {
            hwnd: hwnd.0 as isize,
            added: AtomicBool::new(false),
        })
    }

    fn hwnd(&self) -> HWND {
        HWND(self.hwnd as *mut _)
    }

    fn base(&self) -> NOTIFYICONDATAW {
        NOTIFYICONDATAW {
            cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
            hWnd: self.hwnd(),
            uID: TRAY_UID,
            ..Default::default()
        }
    }

    fn modify(&self, nid: &NOTIFYICONDATAW) -> bool {
        unsafe { Shell_NotifyIconW(NIM_MODIFY, nid).as_bool() }
    }
}

impl TrayIconOps for TrayBalloon {
    fn set_hidden(&self, hidden: bool) {
        let mut nid = self.base();
        nid.uFlags = NIF_STATE;
        nid.dwState = if hidden { NIS_HIDDEN } else { NOTIFY_ICON_STATE(0) };
        nid.dwStateMask = NIS_HIDDEN;
        if !self.modify(&nid) {
            warn!("[Tray] Failed to set icon hidden={}", hidden);
        }
    }

    fn clear_balloon(&self) {
        let mut nid = self.base();
        nid.uFlags = NIF_INFO;
        if !self.modify(&nid) {
            warn!("[Tray] Failed to clear balloon text");
        }
    }

    fn redraw(&self) {
        unsafe {
            if let Ok(tray) = FindWindowW(w!("Shell_TrayWnd"), PCWSTR::null()) {
                match FindWindowExW(Some(tray), None, w!("TrayNotifyWnd"), PCWSTR::null()) {
                    Ok(notify_area) => {
                        let _ = InvalidateRect(Some(notify_area), None, true);
                    }
                    Err(_) => warn!("[Tray] Could not find TrayNotifyWnd window handle"),
                }
            } else {
                warn!("[Tray] Could not find Shell_TrayWnd window handle");
            }
            let _ = RedrawWindow(Some(self.hwnd()), None, None, RDW_INVALIDATE | RDW_UPDATENOW);
        }
    }

    fn pause(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

fn info_flags(icon: NotifyIcon, silent: bool) -> NOTIFY_ICON_INFOTIP_FLAGS {
    let flags = match icon {
        NotifyIcon::None => NIIF_NONE,
        NotifyIcon::Info => NIIF_INFO,
        NotifyIcon::Warning => NIIF_WARNING,
        NotifyIcon::Error => NIIF_ERROR,
    };
    if silent {
        flags | NIIF_NOSOUND
    } else {
        flags
    }
}

/// Copies `text` into a fixed UTF-16 field, truncating and keeping the NUL.
fn fill_wide(field: &mut [u16], text: &str) {
    let max = field.len().saturating_sub(1);
    let mut len = 0;
    for (slot, unit) in field.iter_mut().zip(text.encode_utf16().take(max)) {
        *slot = unit;
        len += 1;
    }
    if let Some(terminator) = field.get_mut(len) {
        *terminator = 0;
    }
}

impl NotificationSurface for TrayBalloon {
    fn show(&self, notification: &Notification) -> Result<()> {
        let mut nid = self.base();
        nid.uFlags = NIF_ICON | NIF_TIP | NIF_INFO;
        nid.hIcon = unsafe { LoadIconW(None, IDI_APPLICATION) }.unwrap_or_default();
        fill_wide(&mut nid.szTip, TOOLTIP);
        fill_wide(&mut nid.szInfoTitle, &notification.title);
        // An empty body would dismiss the balloon instead of showing it
        fill_wide(&mut nid.szInfo, notification.message.as_deref().unwrap_or(" "));
        nid.dwInfoFlags = info_flags(notification.icon, notification.silent);

        // Explorer may have restarted since the icon was added; re-add on failure.
        if self.added.load(Ordering::Relaxed) && self.modify(&nid) {
            return Ok(());
        }
        if unsafe { Shell_NotifyIconW(NIM_ADD, &nid).as_bool() } {
            self.added.store(true, Ordering::Relaxed);
            Ok(())
        } else {
            Err(MenuError::Notify("Shell_NotifyIconW(NIM_ADD) failed".into()))
        }
    }

    fn hide(&self) {
        info!("[Tray] Forcing notification removal");
        force_hide(self);
    }
}

impl Drop for TrayBalloon {
    fn drop(&mut self) {
        unsafe {
            if self.added.load(Ordering::Relaxed) {
                let nid = self.base();
                let _ = Shell_NotifyIconW(NIM_DELETE, &nid);
            }
            let _ = DestroyWindow(self.hwnd());
        }
    }
}
