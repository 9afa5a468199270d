//! EBU Latin character set used for station IDs and SI text fields.
//!
//! A 256-entry table maps a single byte to the UTF-8 string it represents.
//! Control codes (0x00-0x1F, 0x7F) have no printable representation and are
//! stored as the empty string. Encoding scans the table for the first byte
//! whose string starts with the input codepoint, substituting a space on a
//! miss; decoding is a direct table lookup, rendering an empty-string entry
//! as `"?"`.

const fn ctrl() -> &'static str {
    ""
}

#[rustfmt::skip]
const TABLE: [&str; 256] = [
    // 0x00-0x1F: control codes, no printable representation.
    ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(),
    ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(),
    ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(),
    ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(),
    // 0x20-0x7E: EBU Latin's basic repertoire mirrors ASCII.
    " ", "!", "\"", "#", "$", "%", "&", "'", "(", ")", "*", "+", ",", "-", ".", "/",
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", ":", ";", "<", "=", ">", "?",
    "@", "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O",
    "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z", "[", "\\", "]", "^", "_",
    "`", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o",
    "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z", "{", "|", "}", "~",
    // 0x7F: delete, no printable representation.
    ctrl(),
    // 0x80-0x9F: reserved in the EBU Latin set.
    ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(),
    ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(),
    ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(),
    ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(), ctrl(),
    // 0xA0-0xFF: accented Latin letters and symbols, drawn from EBU's
    // Latin-diacritic repertoire in the same byte order as Latin-1
    // Supplement for the characters both sets represent.
    " ", "\u{a1}", "\u{a2}", "\u{a3}", "$", "\u{a5}", "#", "\u{a7}",
    "\u{a4}", "\u{2018}", "\u{201c}", "\u{ab}", "\u{2190}", "\u{2191}", "\u{2192}", "\u{2193}",
    "\u{b0}", "\u{b1}", "\u{b2}", "\u{b3}", "\u{d7}", "\u{b5}", "\u{b6}", "\u{b7}",
    "\u{f7}", "\u{2019}", "\u{201d}", "\u{bb}", "\u{bc}", "\u{bd}", "\u{be}", "\u{bf}",
    "\u{c0}", "\u{c1}", "\u{c2}", "\u{c3}", "\u{c4}", "\u{c5}", "\u{c6}", "\u{c7}",
    "\u{c8}", "\u{c9}", "\u{ca}", "\u{cb}", "\u{cc}", "\u{cd}", "\u{ce}", "\u{cf}",
    "\u{d0}", "\u{d1}", "\u{d2}", "\u{d3}", "\u{d4}", "\u{d5}", "\u{d6}", "\u{153}",
    "\u{d8}", "\u{d9}", "\u{da}", "\u{db}", "\u{dc}", "\u{dd}", "\u{de}", "\u{df}",
    "\u{e0}", "\u{e1}", "\u{e2}", "\u{e3}", "\u{e4}", "\u{e5}", "\u{e6}", "\u{e7}",
    "\u{e8}", "\u{e9}", "\u{ea}", "\u{eb}", "\u{ec}", "\u{ed}", "\u{ee}", "\u{ef}",
    "\u{f0}", "\u{f1}", "\u{f2}", "\u{f3}", "\u{f4}", "\u{f5}", "\u{f6}", "\u{153}",
    "\u{f8}", "\u{f9}", "\u{fa}", "\u{fb}", "\u{fc}", "\u{fd}", "\u{fe}", "\u{ff}",
];

/// Encodes a UTF-8 string into EBU Latin bytes, substituting a space (0x20)
/// for any codepoint the table has no entry for. Never fails.
pub fn encode(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| {
            let mut buf = [0u8; 4];
            let needle = c.encode_utf8(&mut buf);
            TABLE
                .iter()
                .position(|entry| entry.chars().next().map(|e| e.to_string()) == Some(needle.to_string()))
                .map(|idx| idx as u8)
                .unwrap_or(b' ')
        })
        .collect()
}

/// Decodes EBU Latin bytes into a UTF-8 string, rendering any byte whose
/// table entry is empty (a control code) as `"?"`. Never fails.
pub fn decode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            let entry = TABLE[b as usize];
            if entry.is_empty() { "?" } else { entry }
        })
        .collect()
}
