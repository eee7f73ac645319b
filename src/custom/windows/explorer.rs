// Shell window group close, explorer.exe kill and relaunch

use std::{
    collections::HashSet,
    ffi::OsStr,
    process::{Command, Stdio},
    time::Duration,
};

use sysinfo::System;
use windows::{
    core::BOOL,
    Win32::{
        Foundation::{HWND, LPARAM, WPARAM},
        UI::WindowsAndMessaging::*,
    },
};

use crate::error::{MenuError, Result};
use crate::menu::{ShellHost, ShellWindow};
use crate::{info, warn, error};

pub struct ExplorerShell;

impl ExplorerShell {
    pub fn new() -> Self {
        Self
    }
}

struct WindowScan<'a> {
    group: &'a [ShellWindow],
    explorer_pids: HashSet<u32>,
    matched: Vec<(isize, &'static str)>,
}

unsafe extern "system" fn collect_shell_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let scan = &mut *(lparam.0 as *mut WindowScan);

    let mut buffer = [0u16; 256];
    let len = GetClassNameW(hwnd, &mut buffer);
    if len <= 0 {
        return true.into();
    }
    let class = String::from_utf16_lossy(&buffer[..len as usize]);

    if let Some(entry) = scan.group.iter().find(|w| w.class == class) {
        if entry.explorer_owned_only {
            let mut pid = 0u32;
            GetWindowThreadProcessId(hwnd, Some(&mut pid));
            if !scan.explorer_pids.contains(&pid) {
                return true.into();
            }
        }
        scan.matched.push((hwnd.0 as isize, entry.class));
    }

    true.into()
}

fn pids_named(sys: &System, image: &str) -> Vec<u32> {
    sys.processes()
        .values()
        .filter(|p| p.name().eq_ignore_ascii_case(OsStr::new(image)))
        .map(|p| p.pid().as_u32())
        .collect()
}

impl ShellHost for ExplorerShell {
    fn close_windows(&self, group: &[ShellWindow]) -> Result<()> {
        let sys = System::new_all();
        let mut scan = WindowScan {
            group,
            explorer_pids: pids_named(&sys, crate::menu::SHELL_IMAGE).into_iter().collect(),
            matched: Vec::new(),
        };

        unsafe {
            EnumWindows(Some(collect_shell_window), LPARAM(&mut scan as *mut WindowScan as isize))
                .map_err(|e| MenuError::Restart(format!("cannot enumerate windows: {}", e.message())))?;
        }

        info!("[Explorer] Requesting close of {} shell window(s)", scan.matched.len());
        for (raw, class) in &scan.matched {
            let hwnd = HWND(*raw as *mut _);
            if let Err(e) = unsafe { PostMessageW(Some(hwnd), WM_CLOSE, WPARAM(0), LPARAM(0)) } {
                // Windows may vanish between enumeration and close
                warn!("[Explorer] WM_CLOSE to {} window {:#X} failed: {}", class, raw, e.message());
            }
        }
        Ok(())
    }

    fn sleep(&self, delay: Duration) {
        std::thread::sleep(delay);
    }

    fn terminate(&self, image: &str) -> Result<()> {
        let sys = System::new_all();
        let mut found = 0;
        let mut killed = 0;

        for proc_ in sys.processes().values() {
            if !proc_.name().eq_ignore_ascii_case(OsStr::new(image)) {
                continue;
            }
            found += 1;
            if proc_.kill() {
                info!("[Explorer] Killed {} (PID {})", image, proc_.pid());
                killed += 1;
            } else {
                warn!("[Explorer] Failed to kill {} (PID {})", image, proc_.pid());
            }
        }

        if found > 0 && killed == 0 {
            error!("[Explorer] None of {} {} process(es) could be killed", found, image);
            return Err(MenuError::Restart(format!("could not terminate {image}")));
        }
        if found == 0 {
            warn!("[Explorer] No running {} to terminate", image);
        }
        Ok(())
    }

    fn launch(&self, image: &str) -> Result<()> {
        match Command::new(image)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => {
                info!("[Explorer] Launched {} with PID {}", image, child.id());
                Ok(())
            }
            Err(e) => {
                error!("[Explorer] Failed to launch {}: {}", image, e);
                Err(MenuError::Restart(format!("could not launch {image}: {e}")))
            }
        }
    }

    fn is_running(&self, image: &str) -> bool {
        let sys = System::new_all();
        !pids_named(&sys, image).is_empty()
    }
}
