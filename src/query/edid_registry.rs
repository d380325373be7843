// Registry EDID query.
//
// Windows caches each monitor's EDID under its PnP instance key:
// `SYSTEM\CurrentControlSet\Enum\<DeviceID>\Device Parameters\EDID`.
// The direct instance path covers the common case; when it misses (device
// id formatting varies across driver stacks) the DISPLAY subtree is
// scanned for the hardware-id component instead. All keys are closed on
// every exit path.

use log::debug;
use windows::core::{PCWSTR, PWSTR};
use windows::Win32::System::Registry::{
    RegCloseKey, RegEnumKeyExW, RegOpenKeyExW, RegQueryValueExW, HKEY, HKEY_LOCAL_MACHINE,
    KEY_READ,
};

use super::{hardware_id, to_wide, DisplayTarget, SizeQuery};
use crate::resolve::{self, SizeCandidate};

const ENUM_DISPLAY_ROOT: &str = "SYSTEM\\CurrentControlSet\\Enum\\DISPLAY";

/// Registry EDID collaborator. Approximate by construction: EDID stores
/// the size in whole centimeters.
pub struct EdidRegistryQuery;

impl SizeQuery for EdidRegistryQuery {
    fn name(&self) -> &'static str {
        "EDID"
    }

    fn try_get_size(&self, display: &DisplayTarget) -> Option<SizeCandidate> {
        let raw = read_raw_edid(display)?;
        resolve::decode_size(&raw)
    }
}

/// Locate the raw EDID block for a display.
///
/// Also used by the report layer to decode the monitor name descriptor.
pub fn read_raw_edid(display: &DisplayTarget) -> Option<Vec<u8>> {
    if display.device_id.is_empty() {
        return None;
    }

    // Direct instance path first
    let instance_path = format!(
        "SYSTEM\\CurrentControlSet\\Enum\\{}\\Device Parameters",
        display.device_id
    );
    if let Some(edid) = read_edid_value(&instance_path) {
        debug!("{}: EDID via instance path", display.device_name);
        return Some(edid);
    }

    // Fall back to scanning the DISPLAY subtree for the hardware id
    let hw = hardware_id(&display.device_id)?;
    scan_display_tree(hw, &display.device_name)
}

/// Walk `Enum\DISPLAY\<key>\<instance>` for keys matching the hardware id.
fn scan_display_tree(hw: &str, device_name: &str) -> Option<Vec<u8>> {
    let root = open_key(ENUM_DISPLAY_ROOT)?;
    let hw_upper = hw.to_ascii_uppercase();

    for model_key in enum_subkeys(root.0) {
        // Some systems format the key with a suffix, so prefix match too
        let upper = model_key.to_ascii_uppercase();
        if upper != hw_upper && !upper.starts_with(&hw_upper) {
            continue;
        }

        let model_path = format!("{}\\{}", ENUM_DISPLAY_ROOT, model_key);
        let model = match open_key(&model_path) {
            Some(k) => k,
            None => continue,
        };

        for instance in enum_subkeys(model.0) {
            let params_path = format!("{}\\{}\\Device Parameters", model_path, instance);
            if let Some(edid) = read_edid_value(&params_path) {
                debug!("{}: EDID via DISPLAY scan ({})", device_name, model_key);
                return Some(edid);
            }
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Raw registry access
// ---------------------------------------------------------------------------

/// Open key guard: RegCloseKey on drop, even on early return
struct KeyGuard(HKEY);

impl Drop for KeyGuard {
    fn drop(&mut self) {
        // SAFETY: self.0 was opened by RegOpenKeyExW
        unsafe {
            let _ = RegCloseKey(self.0);
        }
    }
}

fn open_key(subkey: &str) -> Option<KeyGuard> {
    let wide = to_wide(subkey);
    let mut key = HKEY::default();
    // SAFETY: out-parameter open; the guard owns the resulting handle
    let status = unsafe {
        RegOpenKeyExW(
            HKEY_LOCAL_MACHINE,
            PCWSTR(wide.as_ptr()),
            Some(0),
            KEY_READ,
            &mut key,
        )
    };
    if status.is_err() {
        return None;
    }
    Some(KeyGuard(key))
}

fn enum_subkeys(key: HKEY) -> Vec<String> {
    let mut names = Vec::new();

    for index in 0u32.. {
        let mut buf = [0u16; 256];
        let mut len = buf.len() as u32;
        // SAFETY: buf/len describe a caller-owned buffer; any error
        // (including ERROR_NO_MORE_ITEMS) ends the enumeration
        let status = unsafe {
            RegEnumKeyExW(
                key,
                index,
                PWSTR(buf.as_mut_ptr()),
                &mut len,
                None,
                None,
                None,
                None,
            )
        };
        if status.is_err() {
            break;
        }
        names.push(String::from_utf16_lossy(&buf[..len as usize]));
    }

    names
}

/// Read the `EDID` value under a `Device Parameters` key.
/// Two-phase read: size query, then data. Anything shorter than a base
/// EDID block is discarded.
fn read_edid_value(subkey: &str) -> Option<Vec<u8>> {
    let key = open_key(subkey)?;
    let value_name = to_wide("EDID");

    let mut len = 0u32;
    // SAFETY: size-only query
    let status = unsafe {
        RegQueryValueExW(
            key.0,
            PCWSTR(value_name.as_ptr()),
            None,
            None,
            None,
            Some(&mut len),
        )
    };
    if status.is_err() || len == 0 {
        return None;
    }

    let mut data = vec![0u8; len as usize];
    // SAFETY: data buffer sized by the previous query
    let status = unsafe {
        RegQueryValueExW(
            key.0,
            PCWSTR(value_name.as_ptr()),
            None,
            None,
            Some(data.as_mut_ptr()),
            Some(&mut len),
        )
    };
    if status.is_err() || data.len() < resolve::edid::EDID_MIN_LEN {
        return None;
    }

    Some(data)
}
