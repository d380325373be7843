// EDID block decoding (VESA EDID 1.x).
//
// Only the fields this crate needs: the physical image size stored at
// offsets 0x15/0x16 in whole centimeters, and the monitor name descriptor
// (tag 0xFC) used to label reports. The byte layout is the one bit-exact
// external contract here.

use log::{debug, warn};

use super::types::{SizeCandidate, SizeMethod};

/// Minimum length of a base EDID block
pub const EDID_MIN_LEN: usize = 128;

/// Fixed magic at the start of every EDID block
const HEADER_MAGIC: [u8; 4] = [0x00, 0xFF, 0xFF, 0xFF];

/// Horizontal screen size in centimeters
const OFFSET_WIDTH_CM: usize = 0x15;
/// Vertical screen size in centimeters
const OFFSET_HEIGHT_CM: usize = 0x16;

/// Monitor name descriptor blocks: 18 bytes each at these offsets
const DESCRIPTOR_OFFSETS: [usize; 4] = [54, 72, 90, 108];
const DESCRIPTOR_TAG_NAME: u8 = 0xFC;

/// Decode the physical image size from a raw EDID block.
///
/// Returns `None` for an undersized buffer, a bad header, a failing block
/// checksum, or a zero size byte (zero means "undefined" per the EDID
/// spec, not a zero-sized panel). The result is always an approximate
/// candidate: EDID stores whole centimeters, so the value is ±10mm at the
/// boundary.
///
/// Decoding is idempotent; the same bytes always yield the same candidate.
pub fn decode_size(edid: &[u8]) -> Option<SizeCandidate> {
    if !validate_block(edid) {
        return None;
    }

    let width_cm = edid[OFFSET_WIDTH_CM] as i32;
    let height_cm = edid[OFFSET_HEIGHT_CM] as i32;
    if width_cm == 0 || height_cm == 0 {
        // 0 = aspect ratio / undefined size, not a measurement
        debug!("EDID image size undefined ({}cm x {}cm)", width_cm, height_cm);
        return None;
    }

    Some(SizeCandidate::approximate(
        width_cm * 10,
        height_cm * 10,
        SizeMethod::Edid,
    ))
}

/// Decode the monitor name from the 0xFC descriptor, if present.
pub fn decode_model_name(edid: &[u8]) -> Option<String> {
    if !validate_block(edid) {
        return None;
    }

    for offset in DESCRIPTOR_OFFSETS {
        // Display descriptors start with 00 00 00 <tag>
        if edid[offset] == 0x00
            && edid[offset + 1] == 0x00
            && edid[offset + 2] == 0x00
            && edid[offset + 3] == DESCRIPTOR_TAG_NAME
        {
            // 13 name bytes, terminated by 0x0A
            let name: String = edid[offset + 5..offset + 18]
                .iter()
                .take_while(|&&b| b != 0x0A && b != 0x00)
                .map(|&b| b as char)
                .collect();
            let name = name.trim().to_string();
            if !name.is_empty() {
                return Some(name);
            }
        }
    }

    None
}

fn validate_block(edid: &[u8]) -> bool {
    if edid.len() < EDID_MIN_LEN {
        debug!("EDID buffer too short: {} bytes", edid.len());
        return false;
    }
    if edid[..4] != HEADER_MAGIC {
        warn!(
            "EDID header mismatch: {:02X} {:02X} {:02X} {:02X}",
            edid[0], edid[1], edid[2], edid[3]
        );
        return false;
    }
    // Byte 127 makes the 128-byte sum ≡ 0 mod 256
    let sum = edid[..EDID_MIN_LEN]
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_add(b));
    if sum != 0 {
        warn!("EDID checksum failed (sum = 0x{:02X})", sum);
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal well-formed block: magic + given size bytes + fixed checksum
    fn block(width_cm: u8, height_cm: u8) -> Vec<u8> {
        let mut edid = vec![0u8; 128];
        edid[..4].copy_from_slice(&HEADER_MAGIC);
        edid[OFFSET_WIDTH_CM] = width_cm;
        edid[OFFSET_HEIGHT_CM] = height_cm;
        let sum = edid[..127].iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
        edid[127] = 0u8.wrapping_sub(sum);
        edid
    }

    #[test]
    fn test_checksum_mismatch_rejected() {
        let mut edid = block(53, 30);
        edid[127] = edid[127].wrapping_add(1);
        assert!(decode_size(&edid).is_none());
    }

    #[test]
    fn test_zero_size_byte_means_undefined() {
        assert!(decode_size(&block(0, 30)).is_none());
        assert!(decode_size(&block(53, 0)).is_none());
    }

    #[test]
    fn test_model_name_descriptor() {
        let mut edid = block(60, 34);
        // name descriptor in the second slot
        edid[72..76].copy_from_slice(&[0x00, 0x00, 0x00, 0xFC]);
        edid[77..87].copy_from_slice(b"DELL U2723");
        edid[87] = 0x0A;
        // re-checksum after editing
        let sum = edid[..127].iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
        edid[127] = 0u8.wrapping_sub(sum);

        assert_eq!(decode_model_name(&edid).as_deref(), Some("DELL U2723"));
    }
}
