// 显示器枚举与元数据采集 — 基于 GDI
//
// 通过 EnumDisplayMonitors 收集所有逻辑显示器，并用 EnumDisplayDevices
// 关联出 PnP 设备标识（后续 WMI 匹配与注册表 EDID 查找都依赖它）。
//
// ## 设计原则
// - 无全局句柄缓存，每次扫描都重新枚举
// - 所有 DC 句柄都通过 RAII guard 释放

use anyhow::{bail, Result};
use log::debug;
use windows::core::{BOOL, PCWSTR};
use windows::Win32::Foundation::{LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{
    CreateDCW, DeleteDC, EnumDisplayDevicesW, EnumDisplayMonitors, GetDC, GetDeviceCaps,
    GetMonitorInfoW, ReleaseDC, DISPLAY_DEVICEW, HDC, HMONITOR, HORZSIZE, LOGPIXELSX, LOGPIXELSY,
    MONITORINFO, MONITORINFOEXW, VERTSIZE,
};
use windows::Win32::UI::HiDpi::{
    GetDpiForMonitor, SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
    MDT_EFFECTIVE_DPI,
};

use super::to_wide;

/// 启用 Per-Monitor DPI 感知
///
/// 确保枚举到的是物理分辨率，而不是被缩放后的逻辑分辨率。
/// 重复调用是安全的（已设置时静默忽略）。
pub fn enable_dpi_awareness() {
    unsafe {
        // SAFETY: best-effort 调用，失败说明进程已经设置过
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }
}

/// 一个逻辑显示器及查询它所需的标识信息
#[derive(Debug, Clone)]
pub struct DisplayTarget {
    /// 显示器句柄（存储为 isize 以支持跨线程传递）
    handle_ptr: isize,
    /// GDI 设备名（如 `\\.\DISPLAY1`）
    pub device_name: String,
    /// 监视器描述字符串（EnumDisplayDevices DeviceString）
    pub friendly_name: String,
    /// PnP 设备标识（如 `MONITOR\DELA0C1\...`），可能为空
    pub device_id: String,
    /// 是否为主显示器
    pub is_primary: bool,
    /// 宽度（像素）
    pub width_px: u32,
    /// 高度（像素）
    pub height_px: u32,
}

impl DisplayTarget {
    /// 获取显示器句柄
    pub fn handle(&self) -> HMONITOR {
        HMONITOR(self.handle_ptr as *mut _)
    }

    /// Windows 报告的逻辑 DPI
    ///
    /// 优先使用 Per-Monitor API (GetDpiForMonitor)；在旧系统上回退到
    /// 屏幕 DC 的 LOGPIXELSX/Y（进程级，所有显示器相同）。
    pub fn windows_dpi(&self) -> (f64, f64) {
        unsafe {
            let mut dpi_x = 0u32;
            let mut dpi_y = 0u32;
            if GetDpiForMonitor(self.handle(), MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y).is_ok()
                && dpi_x > 0
            {
                return (dpi_x as f64, dpi_y as f64);
            }

            // SAFETY: 屏幕 DC 必须用 ReleaseDC 释放
            let hdc = GetDC(None);
            let dpi_x = GetDeviceCaps(Some(hdc), LOGPIXELSX);
            let dpi_y = GetDeviceCaps(Some(hdc), LOGPIXELSY);
            ReleaseDC(None, hdc);
            (dpi_x as f64, dpi_y as f64)
        }
    }

    /// GDI 设备能力报告的物理尺寸（毫米）
    ///
    /// 仅用于诊断输出：GDI 的 HORZSIZE/VERTSIZE 往往是驱动按默认 DPI
    /// 反推出来的值，不参与尺寸裁决。
    pub fn device_caps_size_mm(&self) -> Option<(i32, i32)> {
        let wide = to_wide(&self.device_name);
        unsafe {
            // SAFETY: CreateDCW 创建的 DC 必须用 DeleteDC 释放
            let hdc = CreateDCW(PCWSTR(wide.as_ptr()), None, None, None);
            if hdc.is_invalid() {
                return None;
            }
            struct DcGuard(HDC);
            impl Drop for DcGuard {
                fn drop(&mut self) {
                    // SAFETY: self.0 是 CreateDCW 返回的有效 DC
                    unsafe {
                        let _ = DeleteDC(self.0);
                    }
                }
            }
            let _guard = DcGuard(hdc);

            let width_mm = GetDeviceCaps(Some(hdc), HORZSIZE);
            let height_mm = GetDeviceCaps(Some(hdc), VERTSIZE);
            if width_mm > 0 && height_mm > 0 {
                Some((width_mm, height_mm))
            } else {
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// 枚举
// ---------------------------------------------------------------------------

/// EnumDisplayMonitors 收集的原始信息
struct RawMonitor {
    handle: HMONITOR,
    device_name: String,
    is_primary: bool,
    width_px: u32,
    height_px: u32,
}

/// 枚举所有显示器并补全设备标识
///
/// 返回顺序与系统枚举顺序一致，后续处理按此顺序进行。
pub fn enumerate_displays() -> Result<Vec<DisplayTarget>> {
    let raw = enum_gdi_monitors();
    if raw.is_empty() {
        bail!("No monitors detected via EnumDisplayMonitors");
    }

    let displays = raw
        .into_iter()
        .map(|mon| {
            let (friendly_name, device_id) = monitor_device_identity(&mon.device_name);
            debug!(
                "{}: \"{}\" ({})",
                mon.device_name,
                friendly_name,
                if device_id.is_empty() {
                    "no device id"
                } else {
                    device_id.as_str()
                }
            );
            DisplayTarget {
                handle_ptr: mon.handle.0 as isize,
                device_name: mon.device_name,
                friendly_name,
                device_id,
                is_primary: mon.is_primary,
                width_px: mon.width_px,
                height_px: mon.height_px,
            }
        })
        .collect();

    Ok(displays)
}

fn enum_gdi_monitors() -> Vec<RawMonitor> {
    let mut monitors: Vec<RawMonitor> = Vec::new();

    unsafe {
        // SAFETY: 回调在当前线程同步执行，monitors 的生命周期覆盖整个调用
        let _ = EnumDisplayMonitors(
            Some(HDC::default()),
            None,
            Some(enum_proc),
            LPARAM(&mut monitors as *mut Vec<RawMonitor> as isize),
        );
    }

    monitors
}

/// EnumDisplayMonitors 回调
unsafe extern "system" fn enum_proc(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _rect: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let monitors = &mut *(lparam.0 as *mut Vec<RawMonitor>);

    let mut info = MONITORINFOEXW {
        monitorInfo: MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFOEXW>() as u32,
            ..Default::default()
        },
        ..Default::default()
    };

    if GetMonitorInfoW(hmonitor, &mut info.monitorInfo).as_bool() {
        let device_name = String::from_utf16_lossy(&info.szDevice)
            .trim_end_matches('\0')
            .to_string();

        let is_primary = (info.monitorInfo.dwFlags & 1) != 0; // MONITORINFOF_PRIMARY

        let width_px = (info.monitorInfo.rcMonitor.right - info.monitorInfo.rcMonitor.left) as u32;
        let height_px = (info.monitorInfo.rcMonitor.bottom - info.monitorInfo.rcMonitor.top) as u32;

        monitors.push(RawMonitor {
            handle: hmonitor,
            device_name,
            is_primary,
            width_px,
            height_px,
        });
    }

    BOOL(1) // 继续枚举
}

/// 通过 EnumDisplayDevices 获取监视器描述与 PnP 标识
///
/// 适配器下可能挂多个设备，优先取 DeviceID 以 `MONITOR` 开头的那个；
/// 找不到时退回第一个设备的描述字符串。
fn monitor_device_identity(device_name: &str) -> (String, String) {
    let wide = to_wide(device_name);
    let mut friendly = String::new();
    let mut device_id = String::new();

    for index in 0.. {
        let mut dd = DISPLAY_DEVICEW {
            cb: std::mem::size_of::<DISPLAY_DEVICEW>() as u32,
            ..Default::default()
        };
        // SAFETY: dd.cb 已设置，EnumDisplayDevicesW 只写入该结构体
        let ok = unsafe { EnumDisplayDevicesW(PCWSTR(wide.as_ptr()), index, &mut dd, 0) };
        if !ok.as_bool() {
            break;
        }

        let desc = String::from_utf16_lossy(&dd.DeviceString)
            .trim_end_matches('\0')
            .to_string();
        let id = String::from_utf16_lossy(&dd.DeviceID)
            .trim_end_matches('\0')
            .to_string();

        if friendly.is_empty() && !desc.is_empty() {
            friendly = desc.clone();
        }

        if id.to_ascii_uppercase().starts_with("MONITOR") {
            if !desc.is_empty() {
                friendly = desc;
            }
            device_id = id;
            break;
        }
    }

    if friendly.is_empty() {
        friendly = "Unknown".to_string();
    }
    (friendly, device_id)
}

// ---------------------------------------------------------------------------
// 测试
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// 单元测试：验证显示器枚举功能（需要真实显示器）
    #[test]
    fn test_enumerate_displays() {
        enable_dpi_awareness();

        let displays = enumerate_displays().expect("enumerate_displays should succeed");
        assert!(!displays.is_empty(), "应该至少检测到一个显示器");

        let primary_count = displays.iter().filter(|d| d.is_primary).count();
        assert_eq!(primary_count, 1, "应该有且仅有一个主显示器");

        for (i, d) in displays.iter().enumerate() {
            let (dpi_x, dpi_y) = d.windows_dpi();
            println!(
                "  [{}] {} \"{}\" {}x{} DPI {}x{} {}",
                i,
                d.device_name,
                d.friendly_name,
                d.width_px,
                d.height_px,
                dpi_x,
                dpi_y,
                if d.is_primary { "⭐" } else { "" }
            );
            assert!(d.width_px > 0, "显示器宽度必须大于 0");
            assert!(d.height_px > 0, "显示器高度必须大于 0");
            assert!(dpi_x > 0.0, "Windows DPI 必须大于 0");
        }
    }
}
