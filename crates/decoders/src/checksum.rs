//! TIC group checksum.
//!
//! The checksum covers every byte from the start of the label through the end
//! of the data field, separators included. The low 6 bits of the byte sum are
//! offset by 0x20, so the result is always a printable ASCII byte in
//! `0x20..=0x5F`.

const MASK: u32 = 0x3F;
const OFFSET: u8 = 0x20;

pub fn compute(span: &[u8]) -> u8 {
    let sum = span
        .iter()
        .fold(0u32, |acc, &b| acc.wrapping_add(u32::from(b)));
    // Masked to 6 bits, fits in u8.
    (sum & MASK) as u8 + OFFSET
}

pub fn verify(span: &[u8], claimed: u8) -> bool {
    compute(span) == claimed
}
