// Derived display metrics: true DPI, diagonal, scale factor.
//
// "True DPI" is pixel count divided by physical size in inches, as opposed
// to the logical DPI Windows reports after scaling. Everything here is a
// pure function of an already-resolved size; nothing is cached.

use serde::Serialize;

use super::types::ResolvedSize;

/// The logical DPI Windows treats as 100% scaling
pub const BASELINE_DPI: f64 = 96.0;

const MM_PER_INCH: f64 = 25.4;

/// Metrics derived from a resolved physical size plus the pixel resolution
/// and the platform-reported logical DPI.
///
/// When the size is unavailable, `true_dpi_*` and `diagonal_inches` are 0
/// and only the Windows-reported values are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    /// Panel diagonal in inches, one decimal place. 0 when size unavailable.
    pub diagonal_inches: f64,
    /// Horizontal pixels per physical inch, one decimal place
    pub true_dpi_x: f64,
    /// Vertical pixels per physical inch, one decimal place
    pub true_dpi_y: f64,
    /// Logical DPI reported by Windows (X)
    pub windows_dpi_x: f64,
    /// Logical DPI reported by Windows (Y)
    pub windows_dpi_y: f64,
    /// windows_dpi_x / 96, two decimal places
    pub scale_factor: f64,
}

/// Compute derived metrics for one display.
///
/// Zero pixel dimensions or a zero Windows DPI produce zero results rather
/// than a panic; callers are expected to have guarded, but a broken input
/// must not crash a diagnostics pass.
pub fn derive_metrics(
    size: &ResolvedSize,
    width_px: u32,
    height_px: u32,
    windows_dpi_x: f64,
    windows_dpi_y: f64,
) -> DerivedMetrics {
    let scale_factor = if windows_dpi_x > 0.0 {
        round2(windows_dpi_x / BASELINE_DPI)
    } else {
        0.0
    };

    if !size.is_available() || size.width_mm <= 0 || size.height_mm <= 0 {
        return DerivedMetrics {
            diagonal_inches: 0.0,
            true_dpi_x: 0.0,
            true_dpi_y: 0.0,
            windows_dpi_x,
            windows_dpi_y,
            scale_factor,
        };
    }

    let width_mm = size.width_mm as f64;
    let height_mm = size.height_mm as f64;
    let width_in = width_mm / MM_PER_INCH;
    let height_in = height_mm / MM_PER_INCH;

    DerivedMetrics {
        diagonal_inches: round1((width_mm * width_mm + height_mm * height_mm).sqrt() / MM_PER_INCH),
        true_dpi_x: round1(width_px as f64 / width_in),
        true_dpi_y: round1(height_px as f64 / height_in),
        windows_dpi_x,
        windows_dpi_y,
        scale_factor,
    }
}

// f64::round is round-half-away-from-zero, matching the source semantics
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding_to_stated_decimals() {
        assert_eq!(round1(23.976), 24.0);
        assert_eq!(round1(122.68), 122.7);
        assert_eq!(round1(-121.92), -121.9);
        assert_eq!(round2(1.254), 1.25);
        assert_eq!(round2(120.0 / 96.0), 1.25);
    }

    #[test]
    fn test_zero_windows_dpi_does_not_panic() {
        let size = ResolvedSize::UNAVAILABLE;
        let m = derive_metrics(&size, 1920, 1080, 0.0, 0.0);
        assert_eq!(m.scale_factor, 0.0);
        assert_eq!(m.true_dpi_x, 0.0);
    }
}
