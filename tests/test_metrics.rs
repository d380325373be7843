// Integration tests: derived metrics contract

use truedpi::resolve::{derive_metrics, resolve, ResolvedSize, SizeCandidate, SizeMethod};

fn resolved(width_mm: i32, height_mm: i32) -> ResolvedSize {
    resolve(&[SizeCandidate::exact(width_mm, height_mm, SizeMethod::Wmi)])
}

#[test]
fn test_true_dpi_and_diagonal_for_27_class_panel() {
    // 530 x 300 mm panel at 2560 x 1440
    let size = resolved(530, 300);
    let m = derive_metrics(&size, 2560, 1440, 120.0, 120.0);

    // 2560 / (530 / 25.4) = 122.68...
    assert_eq!(m.true_dpi_x, 122.7);
    // 1440 / (300 / 25.4) = 121.92...
    assert_eq!(m.true_dpi_y, 121.9);
    // sqrt(530² + 300²) / 25.4 = 23.97..., one decimal place
    assert_eq!(m.diagonal_inches, 24.0);
}

#[test]
fn test_scale_factor_from_windows_dpi() {
    let size = resolved(530, 300);
    assert_eq!(derive_metrics(&size, 2560, 1440, 120.0, 120.0).scale_factor, 1.25);
    assert_eq!(derive_metrics(&size, 2560, 1440, 96.0, 96.0).scale_factor, 1.0);
    assert_eq!(derive_metrics(&size, 2560, 1440, 144.0, 144.0).scale_factor, 1.5);
}

#[test]
fn test_unavailable_size_yields_no_physical_metrics() {
    let size = resolve(&[]);
    let m = derive_metrics(&size, 1920, 1080, 96.0, 96.0);

    assert_eq!(m.true_dpi_x, 0.0);
    assert_eq!(m.true_dpi_y, 0.0);
    assert_eq!(m.diagonal_inches, 0.0);
    // Windows-reported values are still populated
    assert_eq!(m.windows_dpi_x, 96.0);
    assert_eq!(m.scale_factor, 1.0);
}

#[test]
fn test_zero_pixels_do_not_panic() {
    let size = resolved(530, 300);
    let m = derive_metrics(&size, 0, 0, 96.0, 96.0);
    assert_eq!(m.true_dpi_x, 0.0);
    assert_eq!(m.true_dpi_y, 0.0);
    // Diagonal depends only on the physical size
    assert_eq!(m.diagonal_inches, 24.0);
}

#[test]
fn test_zero_windows_dpi_does_not_panic() {
    let size = resolved(530, 300);
    let m = derive_metrics(&size, 2560, 1440, 0.0, 0.0);
    assert_eq!(m.scale_factor, 0.0);
    assert_eq!(m.true_dpi_x, 122.7);
}

#[test]
fn test_square_pixel_panel_has_matching_dpi() {
    // 16:9 panel with 16:9 resolution: X and Y DPI should agree closely
    let size = resolved(598, 336);
    let m = derive_metrics(&size, 1920, 1080, 96.0, 96.0);
    assert!(
        (m.true_dpi_x - m.true_dpi_y).abs() < 1.0,
        "expected near-square pixels, got {} x {}",
        m.true_dpi_x,
        m.true_dpi_y
    );
}
