// Physical-size query collaborators.
//
// Each source implements `SizeQuery` and converts every OS-level failure
// into "no candidate"; nothing below this layer is allowed to error out of
// a scan. The orchestrator queries sources in a fixed order (VCP, WMI,
// EDID) so that the resolver's first-seen tie-break stays deterministic
// across runs.

pub mod edid_registry;
pub mod monitor;
pub mod vcp;
pub mod wmi;

pub use edid_registry::EdidRegistryQuery;
pub use monitor::{enable_dpi_awareness, enumerate_displays, DisplayTarget};
pub use vcp::VcpQuery;
pub use wmi::WmiQuery;

use log::debug;

use crate::resolve::SizeCandidate;

/// A source that may know the physical size of a display.
///
/// Implementations take the display as an explicit argument and hold no
/// process-wide handles; any native handle they open is released before
/// they return.
pub trait SizeQuery {
    /// Short name for logging
    fn name(&self) -> &'static str;

    /// Query this source for the display's physical size.
    /// Absence of data is a normal outcome, never an error.
    fn try_get_size(&self, display: &DisplayTarget) -> Option<SizeCandidate>;
}

/// Run every source against one display, in the order given.
pub fn collect_candidates(
    display: &DisplayTarget,
    sources: &[&dyn SizeQuery],
) -> Vec<SizeCandidate> {
    sources
        .iter()
        .filter_map(|source| match source.try_get_size(display) {
            Some(candidate) => {
                debug!(
                    "{}: {} reports {}mm x {}mm (exact: {})",
                    display.device_name,
                    source.name(),
                    candidate.width_mm,
                    candidate.height_mm,
                    candidate.exact
                );
                Some(candidate)
            }
            None => {
                debug!("{}: {} has no data", display.device_name, source.name());
                None
            }
        })
        .collect()
}

/// UTF-16, NUL-terminated, for PCWSTR parameters
pub(crate) fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(Some(0)).collect()
}

/// The hardware-id component of a PnP device id, e.g.
/// `MONITOR\DELA0C1\4&...` → `DELA0C1`. Shared by the WMI matcher and the
/// registry EDID lookup.
pub(crate) fn hardware_id(device_id: &str) -> Option<&str> {
    let mut parts = device_id.split('\\').filter(|p| !p.is_empty());
    parts.next()?;
    parts.next()
}
