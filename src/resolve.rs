// Physical size resolution core.
//
// Pure logic, no OS dependency: the query collaborators in `query` feed
// candidates in, this module decides which one to trust and what the
// resulting size is worth.

pub mod edid;
pub mod metrics;
pub mod resolver;
pub mod types;

// Re-export the working set
pub use edid::{decode_model_name, decode_size};
pub use metrics::{derive_metrics, DerivedMetrics, BASELINE_DPI};
pub use resolver::resolve;
pub use types::{Confidence, ResolvedSize, SizeCandidate, SizeMethod};
