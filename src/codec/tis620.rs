//! TIS-620 (Thai single-byte code page) transcoding.
//!
//! # Responsibilities
//! - Convert gateway text into the byte stream System I expects
//! - Convert System I bytes back into gateway text
//!
//! # Design Decisions
//! - Thai characters go through a fixed lookup table; the code page is not
//!   a uniform offset from the Unicode Thai block (0xDB-0xDE are unassigned)
//! - Bytes outside the Thai range pass through as the scalar of equal value
//! - Unmappable text degrades to `?` instead of failing the whole message

/// First byte of the Thai range.
const THAI_FIRST_BYTE: u8 = 0xA1;

/// Last byte of the Thai range.
const THAI_LAST_BYTE: u8 = 0xFB;

/// Replacement byte for characters that have no TIS-620 encoding.
pub const PLACEHOLDER: u8 = b'?';

/// Unicode scalar for every byte in 0xA1..=0xFB. Zero marks an unassigned slot.
const TO_UNICODE: [u16; 91] = [
    // 0xA1 - 0xB0
    0x0E01, 0x0E02, 0x0E03, 0x0E04, 0x0E05, 0x0E06, 0x0E07, 0x0E08,
    0x0E09, 0x0E0A, 0x0E0B, 0x0E0C, 0x0E0D, 0x0E0E, 0x0E0F, 0x0E10,
    // 0xB1 - 0xC0
    0x0E11, 0x0E12, 0x0E13, 0x0E14, 0x0E15, 0x0E16, 0x0E17, 0x0E18,
    0x0E19, 0x0E1A, 0x0E1B, 0x0E1C, 0x0E1D, 0x0E1E, 0x0E1F, 0x0E20,
    // 0xC1 - 0xD0
    0x0E21, 0x0E22, 0x0E23, 0x0E24, 0x0E25, 0x0E26, 0x0E27, 0x0E28,
    0x0E29, 0x0E2A, 0x0E2B, 0x0E2C, 0x0E2D, 0x0E2E, 0x0E2F, 0x0E30,
    // 0xD1 - 0xDA
    0x0E31, 0x0E32, 0x0E33, 0x0E34, 0x0E35, 0x0E36, 0x0E37, 0x0E38,
    0x0E39, 0x0E3A,
    // 0xDB - 0xDE (unassigned)
    0, 0, 0, 0,
    // 0xDF - 0xEE
    0x0E3F, 0x0E40, 0x0E41, 0x0E42, 0x0E43, 0x0E44, 0x0E45, 0x0E46,
    0x0E47, 0x0E48, 0x0E49, 0x0E4A, 0x0E4B, 0x0E4C, 0x0E4D, 0x0E4E,
    // 0xEF - 0xFB
    0x0E4F, 0x0E50, 0x0E51, 0x0E52, 0x0E53, 0x0E54, 0x0E55, 0x0E56,
    0x0E57, 0x0E58, 0x0E59, 0x0E5A, 0x0E5B,
];

/// First scalar of the Unicode Thai block covered by the table.
const THAI_FIRST_SCALAR: u32 = 0x0E01;

/// Reverse table: scalar offset from U+0E01 to TIS-620 byte (0 = unmapped).
const FROM_UNICODE: [u8; 91] = build_reverse_table();

const fn build_reverse_table() -> [u8; 91] {
    let mut reverse = [0u8; 91];
    let mut i = 0;
    while i < TO_UNICODE.len() {
        let scalar = TO_UNICODE[i] as u32;
        if scalar != 0 {
            reverse[(scalar - THAI_FIRST_SCALAR) as usize] = THAI_FIRST_BYTE + i as u8;
        }
        i += 1;
    }
    reverse
}

/// Returns true when `byte` falls in a slot with no Thai assignment.
fn is_passthrough_byte(byte: u8) -> bool {
    !(THAI_FIRST_BYTE..=THAI_LAST_BYTE).contains(&byte)
        || TO_UNICODE[(byte - THAI_FIRST_BYTE) as usize] == 0
}

/// Encode gateway text into TIS-620 bytes.
///
/// Output is always one byte per input character.
pub fn to_legacy(text: &str) -> Vec<u8> {
    text.chars().map(encode_char).collect()
}

fn encode_char(c: char) -> u8 {
    let scalar = c as u32;
    if scalar <= 0xFF {
        let byte = scalar as u8;
        return if is_passthrough_byte(byte) { byte } else { PLACEHOLDER };
    }

    match scalar.checked_sub(THAI_FIRST_SCALAR) {
        Some(offset) if (offset as usize) < FROM_UNICODE.len() => {
            match FROM_UNICODE[offset as usize] {
                0 => PLACEHOLDER,
                byte => byte,
            }
        }
        _ => PLACEHOLDER,
    }
}

/// Decode TIS-620 bytes into gateway text.
pub fn to_native(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| decode_byte(b)).collect()
}

fn decode_byte(byte: u8) -> char {
    if is_passthrough_byte(byte) {
        return char::from(byte);
    }
    let scalar = TO_UNICODE[(byte - THAI_FIRST_BYTE) as usize] as u32;
    char::from_u32(scalar).unwrap_or(char::from(PLACEHOLDER))
}
