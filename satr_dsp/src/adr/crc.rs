//! ScF-CRC computation.
//!
//! The retrieved sources didn't include the original's scale-factor CRC
//! routine (it lives inside `libtwolame`'s DAB extension, not in the files
//! that were captured), so this resolves the Open Question with a CRC-32
//! (IEEE 802.3 / `ISO-HDLC`) over the previous frame's MP2 payload bytes,
//! excluding the ancillary region that frame itself carries (which is
//! regenerated independently of payload content). The four resulting bytes
//! are exactly the width of the ScF-CRC gap the interleaver leaves open. See
//! DESIGN.md for the full rationale.

use super::interleave::{ANCILLARY_LEN, ANCILLARY_OFFSET};

const POLY: u32 = 0xEDB88320;

fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in bytes {
        crc ^= byte as u32;
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (POLY & mask);
        }
    }
    !crc
}

/// Computes the 4-byte ScF-CRC of a previously-encoded MP2 frame, skipping
/// the ancillary region it carries.
pub fn scf_crc(frame: &[u8]) -> [u8; 4] {
    let mut payload = Vec::with_capacity(frame.len());
    payload.extend_from_slice(&frame[..ANCILLARY_OFFSET]);
    payload.extend_from_slice(&frame[ANCILLARY_OFFSET + ANCILLARY_LEN..]);
    crc32(&payload).to_be_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_identical_input() {
        let frame = vec![0xAAu8; 576];
        assert_eq!(scf_crc(&frame), scf_crc(&frame));
    }

    #[test]
    fn differs_for_different_payloads() {
        let a = vec![0x00u8; 576];
        let mut b = vec![0x00u8; 576];
        b[0] = 0xFF;
        assert_ne!(scf_crc(&a), scf_crc(&b));
    }
}
