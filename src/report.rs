// Per-display report assembly and console formatting.
//
// This is the only place that ties the query collaborators to the
// resolution core. Formatting mirrors the diagnostic layout users expect
// from the tool: an Unavailable size is stated explicitly and no DPI or
// diagonal is ever derived from it.

use std::fmt;

use anyhow::Result;
use serde::Serialize;

use crate::query::{
    collect_candidates, edid_registry, enable_dpi_awareness, enumerate_displays, DisplayTarget,
    EdidRegistryQuery, SizeQuery, VcpQuery, WmiQuery,
};
use crate::resolve::{
    decode_model_name, derive_metrics, resolve, Confidence, DerivedMetrics, ResolvedSize,
    SizeCandidate,
};

/// Everything the tool knows about one display after a scan
#[derive(Debug, Clone, Serialize)]
pub struct DisplayReport {
    pub index: usize,
    pub device_name: String,
    pub friendly_name: String,
    /// Monitor name from the EDID 0xFC descriptor, when present
    pub model_name: Option<String>,
    pub is_primary: bool,
    pub width_px: u32,
    pub height_px: u32,
    /// Every candidate the collaborators produced, in query order
    pub candidates: Vec<SizeCandidate>,
    pub size: ResolvedSize,
    pub metrics: DerivedMetrics,
    /// GDI HORZSIZE/VERTSIZE, informational only (often synthesized by
    /// the driver rather than measured)
    pub device_caps_mm: Option<(i32, i32)>,
}

/// Scan all displays: enumerate, query every source in fixed priority
/// order (VCP, WMI, EDID), resolve, derive metrics.
pub fn scan_displays() -> Result<Vec<DisplayReport>> {
    enable_dpi_awareness();
    let displays = enumerate_displays()?;

    let vcp = VcpQuery;
    let wmi = WmiQuery::new();
    let edid = EdidRegistryQuery;
    // Order matters: the resolver breaks ties by first seen
    let sources: [&dyn SizeQuery; 3] = [&vcp, &wmi, &edid];

    Ok(displays
        .iter()
        .enumerate()
        .map(|(index, display)| build_report(index, display, &sources))
        .collect())
}

fn build_report(index: usize, display: &DisplayTarget, sources: &[&dyn SizeQuery]) -> DisplayReport {
    let candidates = collect_candidates(display, sources);
    let size = resolve(&candidates);

    let (windows_dpi_x, windows_dpi_y) = display.windows_dpi();
    let metrics = derive_metrics(
        &size,
        display.width_px,
        display.height_px,
        windows_dpi_x,
        windows_dpi_y,
    );

    let model_name =
        edid_registry::read_raw_edid(display).and_then(|raw| decode_model_name(&raw));

    DisplayReport {
        index,
        device_name: display.device_name.clone(),
        friendly_name: display.friendly_name.clone(),
        model_name,
        is_primary: display.is_primary,
        width_px: display.width_px,
        height_px: display.height_px,
        candidates,
        size,
        metrics,
        device_caps_mm: display.device_caps_size_mm(),
    }
}

impl fmt::Display for DisplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Monitor: {}{}",
            self.device_name,
            if self.is_primary { " (primary)" } else { "" }
        )?;
        match &self.model_name {
            Some(model) => writeln!(f, "Name: {} [{}]", model, self.friendly_name)?,
            None => writeln!(f, "Name: {}", self.friendly_name)?,
        }
        writeln!(f, "Resolution: {} x {} pixels", self.width_px, self.height_px)?;

        match self.size.confidence {
            Confidence::Exact => {
                writeln!(
                    f,
                    "Physical Size: {} x {} mm ✓ EXACT",
                    self.size.width_mm, self.size.height_mm
                )?;
                writeln!(f, "Source: {}", self.size.source)?;
            }
            Confidence::Approximate => {
                writeln!(
                    f,
                    "Physical Size: {} x {} mm ⚠ APPROXIMATE",
                    self.size.width_mm, self.size.height_mm
                )?;
                writeln!(f, "Source: {} (whole centimeters, ±10mm)", self.size.source)?;
            }
            Confidence::Unavailable => {
                writeln!(f, "Physical Size: UNAVAILABLE")?;
            }
        }

        if self.size.is_available() {
            writeln!(f, "Diagonal: {:.1} inches", self.metrics.diagonal_inches)?;
            writeln!(
                f,
                "True DPI: {:.1} x {:.1}",
                self.metrics.true_dpi_x, self.metrics.true_dpi_y
            )?;
            writeln!(
                f,
                "Windows DPI: {:.1} x {:.1}",
                self.metrics.windows_dpi_x, self.metrics.windows_dpi_y
            )?;
            writeln!(f, "Scale Factor: {:.2}x", self.metrics.scale_factor)?;
            writeln!(
                f,
                "DPI Difference: {:.1}",
                self.metrics.windows_dpi_x - self.metrics.true_dpi_x
            )?;
        } else {
            writeln!(f, "Cannot compute true DPI or diagonal without a physical size")?;
            writeln!(
                f,
                "Windows DPI: {:.1} x {:.1} (Scale Factor: {:.2}x)",
                self.metrics.windows_dpi_x, self.metrics.windows_dpi_y, self.metrics.scale_factor
            )?;
        }

        if let Some((w, h)) = self.device_caps_mm {
            writeln!(f, "GDI Device Caps: {} x {} mm (informational)", w, h)?;
        }

        writeln!(f, "----------------------------------------")
    }
}
