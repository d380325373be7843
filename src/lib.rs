//! # truedpi
//!
//! Monitor physical size and true-DPI diagnostics for Windows.
//!
//! Windows reports a *logical* DPI that reflects the user's scaling choice,
//! not the panel itself. This library queries the physical size of each
//! monitor through several independent channels (DDC/CI VCP registers, WMI,
//! and the EDID block cached in the registry), resolves them into one size
//! with a confidence label, and derives the metrics that actually depend on
//! the glass: true DPI and diagonal.
//!
//! The resolution core is pure and platform-independent; only the query
//! collaborators and the report assembly touch the OS.
//!
//! ## Usage
//!
//! ```
//! use truedpi::resolve::{resolve, derive_metrics, SizeCandidate, SizeMethod};
//!
//! let candidates = [
//!     SizeCandidate::approximate(530, 300, SizeMethod::Edid),
//!     SizeCandidate::exact(531, 299, SizeMethod::Vcp),
//! ];
//! let size = resolve(&candidates);
//! let metrics = derive_metrics(&size, 2560, 1440, 120.0, 120.0);
//! println!("{}\" panel, {} x {} true DPI",
//!     metrics.diagonal_inches, metrics.true_dpi_x, metrics.true_dpi_y);
//! ```

pub mod resolve;

#[cfg(windows)]
pub mod query;
#[cfg(windows)]
pub mod report;
