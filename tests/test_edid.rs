// Integration tests: EDID physical-size decoding

use truedpi::resolve::{decode_size, SizeMethod};

/// Build a minimal well-formed 128-byte EDID block: valid magic, the given
/// size bytes at 0x15/0x16, and a correct trailing checksum.
fn edid_block(width_cm: u8, height_cm: u8) -> Vec<u8> {
    let mut edid = vec![0u8; 128];
    edid[0] = 0x00;
    edid[1] = 0xFF;
    edid[2] = 0xFF;
    edid[3] = 0xFF;
    edid[0x15] = width_cm;
    edid[0x16] = height_cm;
    let sum = edid[..127].iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    edid[127] = 0u8.wrapping_sub(sum);
    edid
}

#[test]
fn test_decode_size_from_valid_block() {
    // 53cm x 30cm reports as 530mm x 300mm, approximate
    let candidate = decode_size(&edid_block(53, 30)).expect("valid block should decode");
    assert_eq!(candidate.width_mm, 530);
    assert_eq!(candidate.height_mm, 300);
    assert_eq!(candidate.method, SizeMethod::Edid);
    assert!(!candidate.exact, "EDID sizes are centimeter-resolution");
}

#[test]
fn test_decode_is_idempotent() {
    let edid = edid_block(60, 34);
    let first = decode_size(&edid);
    let second = decode_size(&edid);
    assert_eq!(first, second);
    assert_eq!(first.unwrap().width_mm, 600);
}

#[test]
fn test_bad_magic_always_fails() {
    // Wrong header fails regardless of the remaining content
    let mut edid = edid_block(53, 30);
    edid[0] = 0xFF;
    let sum = edid[..127].iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    edid[127] = 0u8.wrapping_sub(sum);
    assert!(decode_size(&edid).is_none());

    let mut zeroes = vec![0u8; 128];
    zeroes[0x15] = 53;
    zeroes[0x16] = 30;
    assert!(decode_size(&zeroes).is_none());
}

#[test]
fn test_undersized_buffer_fails() {
    let edid = edid_block(53, 30);
    assert!(decode_size(&edid[..127]).is_none());
    assert!(decode_size(&[]).is_none());
}

#[test]
fn test_zero_size_byte_means_no_candidate() {
    // 0 in either byte is "undefined size" per EDID, not a zero-sized panel
    assert!(decode_size(&edid_block(0, 30)).is_none());
    assert!(decode_size(&edid_block(53, 0)).is_none());
    assert!(decode_size(&edid_block(0, 0)).is_none());
}

#[test]
fn test_extension_blocks_are_tolerated() {
    // Real registry values often carry extension blocks past byte 127;
    // only the base block participates in decoding
    let mut edid = edid_block(53, 30);
    edid.extend_from_slice(&[0x02u8; 128]);
    let candidate = decode_size(&edid).expect("base block is still valid");
    assert_eq!(candidate.width_mm, 530);
}
