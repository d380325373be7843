// DDC/CI size query via VCP registers.
//
// Monitors that implement the MCCS image-size registers report their panel
// dimensions in whole millimeters, which makes this the most precise source
// available. Physical monitor handles obtained from an HMONITOR must be
// destroyed on every exit path; the set is wrapped in a Drop guard.

use log::debug;
use windows::Win32::Devices::Display::{
    DestroyPhysicalMonitors, GetNumberOfPhysicalMonitorsFromHMONITOR,
    GetPhysicalMonitorsFromHMONITOR, GetVCPFeatureAndVCPFeatureReply, MC_VCP_CODE_TYPE,
    PHYSICAL_MONITOR,
};
use windows::Win32::Foundation::HANDLE;

use super::{DisplayTarget, SizeQuery};
use crate::resolve::{SizeCandidate, SizeMethod};

/// Image size: horizontal, millimeters
const VCP_HORIZONTAL_SIZE: u8 = 0xE0;
/// Image size: vertical, millimeters
const VCP_VERTICAL_SIZE: u8 = 0xE1;

/// DDC/CI collaborator. Yields an exact candidate when the monitor answers
/// both size registers with positive values.
pub struct VcpQuery;

impl SizeQuery for VcpQuery {
    fn name(&self) -> &'static str {
        "VCP"
    }

    fn try_get_size(&self, display: &DisplayTarget) -> Option<SizeCandidate> {
        let physical = PhysicalMonitors::open(display)?;

        for pm in physical.handles() {
            let width = read_vcp(*pm, VCP_HORIZONTAL_SIZE);
            let height = read_vcp(*pm, VCP_VERTICAL_SIZE);
            if let (Some(w), Some(h)) = (width, height) {
                if w > 0 && h > 0 {
                    return Some(SizeCandidate::exact(w, h, SizeMethod::Vcp));
                }
            }
        }

        None
    }
}

/// The set of physical monitors behind one HMONITOR.
/// Destroys the handles on drop, even when a read bails out early.
struct PhysicalMonitors {
    monitors: Vec<PHYSICAL_MONITOR>,
}

impl PhysicalMonitors {
    fn open(display: &DisplayTarget) -> Option<Self> {
        let mut count = 0u32;
        // SAFETY: Win32 out-parameter calls; the monitor vector is sized
        // to the reported count before being filled.
        unsafe {
            if GetNumberOfPhysicalMonitorsFromHMONITOR(display.handle(), &mut count).is_err()
                || count == 0
            {
                debug!("{}: no physical monitors (DDC/CI unsupported?)", display.device_name);
                return None;
            }

            let mut monitors: Vec<PHYSICAL_MONITOR> =
                vec![std::mem::zeroed(); count as usize];
            if GetPhysicalMonitorsFromHMONITOR(display.handle(), &mut monitors).is_err() {
                debug!("{}: GetPhysicalMonitorsFromHMONITOR failed", display.device_name);
                return None;
            }

            Some(Self { monitors })
        }
    }

    fn handles(&self) -> impl Iterator<Item = &HANDLE> {
        self.monitors.iter().map(|pm| &pm.hPhysicalMonitor)
    }
}

impl Drop for PhysicalMonitors {
    fn drop(&mut self) {
        // SAFETY: the handles came from GetPhysicalMonitorsFromHMONITOR
        unsafe {
            let _ = DestroyPhysicalMonitors(&self.monitors);
        }
    }
}

/// Read one VCP register; `None` when the monitor does not answer.
fn read_vcp(monitor: HANDLE, code: u8) -> Option<i32> {
    let mut code_type = MC_VCP_CODE_TYPE(0);
    let mut current = 0u32;
    let mut maximum = 0u32;

    // SAFETY: out-parameter call on a valid physical monitor handle
    let ok = unsafe {
        GetVCPFeatureAndVCPFeatureReply(
            monitor,
            code,
            Some(&mut code_type),
            &mut current,
            Some(&mut maximum),
        )
    };
    if ok == 0 {
        return None;
    }

    Some(current as i32)
}
