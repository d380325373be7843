// Common types for physical size resolution

use std::fmt;

use serde::Serialize;

/// How a physical-size measurement was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SizeMethod {
    /// DDC/CI VCP registers 0xE0/0xE1, native millimeters
    Vcp,
    /// WMI `Win32_DesktopMonitor`, native millimeters
    Wmi,
    /// EDID bytes 0x15/0x16, whole centimeters
    Edid,
    /// No source selected (Unavailable sentinel)
    Unknown,
}

impl SizeMethod {
    pub fn label(&self) -> &'static str {
        match self {
            SizeMethod::Vcp => "VCP (DDC/CI)",
            SizeMethod::Wmi => "WMI",
            SizeMethod::Edid => "EDID (registry)",
            SizeMethod::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for SizeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One physical-size measurement for a display, as reported by a query
/// collaborator. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeCandidate {
    /// Width in millimeters
    pub width_mm: i32,
    /// Height in millimeters
    pub height_mm: i32,
    /// Originating query method
    pub method: SizeMethod,
    /// Whether the source reports whole millimeters at full precision.
    /// EDID stores whole centimeters, so EDID candidates are never exact
    /// (±10mm at the boundary).
    pub exact: bool,
}

impl SizeCandidate {
    /// Candidate from a millimeter-precise source (VCP, WMI)
    pub fn exact(width_mm: i32, height_mm: i32, method: SizeMethod) -> Self {
        Self {
            width_mm,
            height_mm,
            method,
            exact: true,
        }
    }

    /// Candidate from a centimeter-resolution source (EDID)
    pub fn approximate(width_mm: i32, height_mm: i32, method: SizeMethod) -> Self {
        Self {
            width_mm,
            height_mm,
            method,
            exact: false,
        }
    }

    /// A candidate with a zero or negative dimension is treated as absent
    pub fn is_valid(&self) -> bool {
        self.width_mm > 0 && self.height_mm > 0
    }
}

/// Trust level of a resolved size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    /// Millimeter-precise source
    Exact,
    /// Centimeter-resolution source (EDID)
    Approximate,
    /// No usable candidate
    Unavailable,
}

/// Resolution outcome for one display.
///
/// Invariant: `width_mm` and `height_mm` are either both zero
/// (`Unavailable`) or both strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedSize {
    pub width_mm: i32,
    pub height_mm: i32,
    pub confidence: Confidence,
    pub source: SizeMethod,
}

impl ResolvedSize {
    /// Sentinel returned when no candidate survives selection
    pub const UNAVAILABLE: ResolvedSize = ResolvedSize {
        width_mm: 0,
        height_mm: 0,
        confidence: Confidence::Unavailable,
        source: SizeMethod::Unknown,
    };

    pub fn is_available(&self) -> bool {
        self.confidence != Confidence::Unavailable
    }
}
