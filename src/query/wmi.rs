// WMI 尺寸查询 — Win32_DesktopMonitor
//
// WMI 的 ScreenWidth/ScreenHeight 以毫米为单位（驱动从显示器上报的数据
// 换算而来），精度与 VCP 相同。每次扫描只执行一次 WBEM 查询，之后按
// 显示器逐个匹配。
//
// ## 匹配顺序（与查询结果逐级降级）
// 1. PnP 硬件标识一致
// 2. 名称互相包含
// 3. 第一条可用记录（单显示器环境下足够，多显示器时可能错配）

use anyhow::Result;
use log::{debug, warn};
use windows::core::{BSTR, HSTRING, VARIANT};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoUninitialize, CLSCTX_INPROC_SERVER, COINIT_MULTITHREADED,
};
use windows::Win32::System::Wmi::{
    IWbemClassObject, IWbemLocator, WbemLocator, WBEM_FLAG_FORWARD_ONLY,
    WBEM_FLAG_RETURN_IMMEDIATELY, WBEM_INFINITE,
};

use super::{hardware_id, DisplayTarget, SizeQuery};
use crate::resolve::{SizeCandidate, SizeMethod};

/// WMI 返回的一条显示器尺寸记录
#[derive(Debug, Clone)]
struct WmiMonitorSize {
    name: String,
    pnp_device_id: String,
    width_mm: i32,
    height_mm: i32,
}

/// WMI 查询器。构造时执行一次 WBEM 查询并缓存本次扫描的结果；
/// 查询失败时结果为空，后续匹配自然落空。
pub struct WmiQuery {
    monitors: Vec<WmiMonitorSize>,
}

impl WmiQuery {
    pub fn new() -> Self {
        let monitors = match fetch_desktop_monitors() {
            Ok(monitors) => {
                debug!("WMI: {} monitor size record(s)", monitors.len());
                monitors
            }
            Err(err) => {
                warn!("WMI query failed: {:#}", err);
                Vec::new()
            }
        };
        Self { monitors }
    }
}

impl Default for WmiQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl SizeQuery for WmiQuery {
    fn name(&self) -> &'static str {
        "WMI"
    }

    fn try_get_size(&self, display: &DisplayTarget) -> Option<SizeCandidate> {
        let entry = self.match_entry(display)?;
        Some(SizeCandidate::exact(
            entry.width_mm,
            entry.height_mm,
            SizeMethod::Wmi,
        ))
    }
}

impl WmiQuery {
    fn match_entry(&self, display: &DisplayTarget) -> Option<&WmiMonitorSize> {
        if self.monitors.is_empty() {
            return None;
        }

        // 1. PnP 硬件标识
        if let Some(hw) = hardware_id(&display.device_id) {
            for entry in &self.monitors {
                if hardware_id(&entry.pnp_device_id)
                    .is_some_and(|entry_hw| entry_hw.eq_ignore_ascii_case(hw))
                {
                    debug!("{}: WMI matched by hardware id {}", display.device_name, hw);
                    return Some(entry);
                }
            }
        }

        // 2. 名称互相包含
        for entry in &self.monitors {
            if !entry.name.is_empty()
                && (display.friendly_name.contains(&entry.name)
                    || entry.name.contains(&display.friendly_name))
            {
                debug!(
                    "{}: WMI matched by name \"{}\"",
                    display.device_name, entry.name
                );
                return Some(entry);
            }
        }

        // 3. 兜底：第一条记录
        debug!(
            "{}: WMI falling back to first record \"{}\"",
            display.device_name, self.monitors[0].name
        );
        Some(&self.monitors[0])
    }
}

// ---------------------------------------------------------------------------
// WBEM 查询
// ---------------------------------------------------------------------------

fn fetch_desktop_monitors() -> Result<Vec<WmiMonitorSize>> {
    unsafe {
        // 1. 初始化 COM
        CoInitializeEx(None, COINIT_MULTITHREADED).ok()?;

        // 确保退出时释放 COM（包括 ? 提前返回的路径）
        struct ComGuard;
        impl Drop for ComGuard {
            fn drop(&mut self) {
                // SAFETY: 与上面成功的 CoInitializeEx 配对
                unsafe { CoUninitialize() };
            }
        }
        let _guard = ComGuard;

        // 2. 连接到 WMI namespace
        let locator: IWbemLocator = CoCreateInstance(&WbemLocator, None, CLSCTX_INPROC_SERVER)?;
        let services = locator.ConnectServer(
            &BSTR::from("root\\cimv2"),
            None,
            None,
            None,
            0,
            None,
            None,
        )?;

        // 3. 查询 Win32_DesktopMonitor
        let enumerator = services.ExecQuery(
            &BSTR::from("WQL"),
            &BSTR::from(
                "SELECT Name, PNPDeviceID, ScreenWidth, ScreenHeight FROM Win32_DesktopMonitor",
            ),
            WBEM_FLAG_FORWARD_ONLY | WBEM_FLAG_RETURN_IMMEDIATELY,
            None,
        )?;

        // 4. 遍历结果，丢弃没有尺寸的记录
        let mut results = Vec::new();
        loop {
            let mut row: [Option<IWbemClassObject>; 1] = [None];
            let mut returned = 0u32;
            if enumerator
                .Next(WBEM_INFINITE, &mut row, &mut returned)
                .is_err()
                || returned == 0
            {
                break;
            }

            let Some(obj) = row[0].take() else { break };

            let width_mm = prop_u32(&obj, "ScreenWidth").unwrap_or(0) as i32;
            let height_mm = prop_u32(&obj, "ScreenHeight").unwrap_or(0) as i32;
            if width_mm <= 0 || height_mm <= 0 {
                // ScreenWidth/ScreenHeight 为 NULL 的显示器没有可用数据
                continue;
            }

            results.push(WmiMonitorSize {
                name: prop_string(&obj, "Name").unwrap_or_default(),
                pnp_device_id: prop_string(&obj, "PNPDeviceID").unwrap_or_default(),
                width_mm,
                height_mm,
            });
        }

        Ok(results)
    }
}

/// 读取一个字符串属性；NULL 或空串返回 None
unsafe fn prop_string(obj: &IWbemClassObject, name: &str) -> Option<String> {
    let mut value = VARIANT::default();
    obj.Get(&HSTRING::from(name), 0, &mut value, None, None)
        .ok()?;
    let text = value.to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// 读取一个数值属性；NULL 或非数值返回 None
unsafe fn prop_u32(obj: &IWbemClassObject, name: &str) -> Option<u32> {
    prop_string(obj, name)?.parse().ok()
}
