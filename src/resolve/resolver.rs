// Candidate selection: exact before approximate, first seen wins ties.
//
// The query collaborators feed candidates in a fixed order (VCP, WMI,
// EDID), so "first seen" keeps the output deterministic across runs.

use super::types::{Confidence, ResolvedSize, SizeCandidate};

/// Pick the most trustworthy size from a set of candidates.
///
/// Selection rule, highest priority first:
/// 1. first candidate with `exact == true` and both dimensions positive
/// 2. first candidate with both dimensions positive, regardless of exactness
/// 3. the `Unavailable` sentinel
///
/// Candidates with a zero or negative dimension are never selected.
/// Empty input is a normal, expected case, not an error.
pub fn resolve(candidates: &[SizeCandidate]) -> ResolvedSize {
    let selected = candidates
        .iter()
        .find(|c| c.exact && c.is_valid())
        .or_else(|| candidates.iter().find(|c| c.is_valid()));

    match selected {
        Some(c) => ResolvedSize {
            width_mm: c.width_mm,
            height_mm: c.height_mm,
            confidence: if c.exact {
                Confidence::Exact
            } else {
                Confidence::Approximate
            },
            source: c.method,
        },
        None => ResolvedSize::UNAVAILABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::types::SizeMethod;

    #[test]
    fn test_exact_beats_earlier_approximate() {
        let candidates = [
            SizeCandidate::approximate(530, 300, SizeMethod::Edid),
            SizeCandidate::exact(531, 299, SizeMethod::Wmi),
        ];
        let size = resolve(&candidates);
        assert_eq!(size.width_mm, 531);
        assert_eq!(size.height_mm, 299);
        assert_eq!(size.confidence, Confidence::Exact);
        assert_eq!(size.source, SizeMethod::Wmi);
    }

    #[test]
    fn test_invalid_exact_never_selected() {
        // exact flag does not rescue a zero/negative dimension
        let candidates = [
            SizeCandidate::exact(0, 300, SizeMethod::Vcp),
            SizeCandidate::exact(530, -1, SizeMethod::Wmi),
            SizeCandidate::approximate(520, 290, SizeMethod::Edid),
        ];
        let size = resolve(&candidates);
        assert_eq!(size.confidence, Confidence::Approximate);
        assert_eq!(size.source, SizeMethod::Edid);
    }

    #[test]
    fn test_empty_input_is_unavailable() {
        let size = resolve(&[]);
        assert_eq!(size, ResolvedSize::UNAVAILABLE);
        assert_eq!((size.width_mm, size.height_mm), (0, 0));
    }
}
