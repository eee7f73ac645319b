use windows::core::{Result, PCWSTR};
use windows::Win32::System::Registry::*;
use windows::Win32::Foundation::ERROR_SUCCESS;

use crate::error::MenuError;
use crate::menu::{MarkerStore, MARKER_SUBKEY};
use crate::{info, warn};

/// The classic menu marker under HKEY_CURRENT_USER.
pub struct RegistryMarker {
    subkey: &'static str,
}

impl RegistryMarker {
    pub fn new() -> Self {
        Self { subkey: MARKER_SUBKEY }
    }
}

impl MarkerStore for RegistryMarker {
    fn read(&self) -> crate::error::Result<()> {
        key_exists(self.subkey).map_err(|e| MenuError::Read(e.message()))
    }

    fn create(&self) -> crate::error::Result<()> {
        set_reg_string(self.subkey, None, "").map_err(|e| MenuError::Write(e.message()))
    }
}

fn key_exists(path: &str) -> Result<()> {
    unsafe {
        let mut key = HKEY::default();
        let path_utf16 = to_wide(path);

        let status = RegOpenKeyExW(
            HKEY_CURRENT_USER,
            PCWSTR(path_utf16.as_ptr()),
            None,
            KEY_QUERY_VALUE,
            &mut key,
        );

        if status != ERROR_SUCCESS {
            info!("[Registry] Key '{}' not readable: {:#X}", path, status.0);
            return Err(status.into());
        }

        let _ = RegCloseKey(key);
        Ok(())
    }
}

/// Creates `path` (and its parents) and writes a REG_SZ value.
/// `name` of `None` targets the key's default value.
pub fn set_reg_string(path: &str, name: Option<&str>, value: &str) -> Result<()> {
    unsafe {
        let mut key = HKEY::default();
        let path_utf16 = to_wide(path);

        let status = RegCreateKeyExW(
            HKEY_CURRENT_USER,
            PCWSTR(path_utf16.as_ptr()),
            None,
            None,
            REG_OPTION_NON_VOLATILE,
            KEY_SET_VALUE,
            None,
            &mut key,
            None,
        );

        if status != ERROR_SUCCESS {
            warn!("[Registry] Failed to create/open key '{}': {:#X}", path, status.0);
            return Err(status.into());
        }
        info!("[Registry] Opened registry key '{}'", path);

        let name_utf16 = name.map(to_wide);
        let name_ptr = name_utf16
            .as_ref()
            .map(|n| PCWSTR(n.as_ptr()))
            .unwrap_or(PCWSTR::null());

        // REG_SZ data is the UTF-16LE string including its terminator
        let data: Vec<u8> = to_wide(value).iter().flat_map(|c| c.to_le_bytes()).collect();

        let status = RegSetValueExW(key, name_ptr, None, REG_SZ, Some(&data));

        let _ = RegCloseKey(key);

        let shown = name.unwrap_or("(Default)");
        if status != ERROR_SUCCESS {
            warn!("[Registry] Failed to set '{}' in key '{}': {:#X}", shown, path, status.0);
            return Err(status.into());
        }

        info!("[Registry] Set '{}'=\"{}\" in key '{}'", shown, value, path);
        Ok(())
    }
}

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(Some(0)).collect()
}
