//! Device Font Table
//!
//! The Expert panel uses a proprietary character set: the printable ASCII
//! region is shifted by 0x20 (0x21 -> 'A', 0x41 -> 'a') and a handful of
//! high bytes carry symbol glyphs. The table is reproduced verbatim from
//! the vendor protocol, duplicate entries included: `\` appears at both
//! 0x07 and 0x3C, and three codes share the infinity glyph.

/// Map one raw display byte to its glyph.
///
/// Bytes without a table entry render as a single space.
pub fn glyph(byte: u8) -> &'static str {
    match byte {
        0x00 => " ",
        0x01 => "!",
        0x02 => "\"",
        0x03 => "#",
        0x04 => "$",
        0x05 => "%",
        0x06 => "&",
        0x07 => "\\",
        0x08 => "(",
        0x09 => ")",
        0x0a => "*",
        0x0b => "+",
        0x0c => ",",
        0x0d => "-",
        0x0e => ".",
        0x0f => "/",
        0x10 => "0",
        0x11 => "1",
        0x12 => "2",
        0x13 => "3",
        0x14 => "4",
        0x15 => "5",
        0x16 => "6",
        0x17 => "7",
        0x18 => "8",
        0x19 => "9",
        0x1a => ":",
        0x1b => ";",
        0x1c => "<",
        0x1d => "=",
        0x1e => ">",
        0x1f => "?",
        0x20 => "@",
        0x21 => "A",
        0x22 => "B",
        0x23 => "C",
        0x24 => "D",
        0x25 => "E",
        0x26 => "F",
        0x27 => "G",
        0x28 => "H",
        0x29 => "I",
        0x2a => "J",
        0x2b => "K",
        0x2c => "L",
        0x2d => "M",
        0x2e => "N",
        0x2f => "O",
        0x30 => "P",
        0x31 => "Q",
        0x32 => "R",
        0x33 => "S",
        0x34 => "T",
        0x35 => "U",
        0x36 => "V",
        0x37 => "W",
        0x38 => "X",
        0x39 => "Y",
        0x3a => "Z",
        0x3b => "[",
        0x3c => "\\",
        0x3d => "]",
        0x3e => "^",
        0x3f => "_",
        0x40 => "`",
        0x41 => "a",
        0x42 => "b",
        0x43 => "c",
        0x44 => "d",
        0x45 => "e",
        0x46 => "f",
        0x47 => "g",
        0x48 => "h",
        0x49 => "i",
        0x4a => "j",
        0x4b => "k",
        0x4c => "l",
        0x4d => "m",
        0x4e => "n",
        0x4f => "o",
        0x50 => "p",
        0x51 => "q",
        0x52 => "r",
        0x53 => "s",
        0x54 => "t",
        0x55 => "u",
        0x56 => "v",
        0x57 => "w",
        0x58 => "x",
        0x59 => "y",
        0x5a => "z",
        0x5b => "{ ",
        0x5c => "|",
        0x5d => " ]",
        0x5e => "~",
        0x5f => "",
        0x80 => "μ",
        0x99 => "◄",
        0x9a => "▲",
        0x9b => "▼",
        0x9c => "►",
        0x9d => "←",
        0x9e => "→",
        0xa7 => "∞",
        0xa8 => "∞",
        0xa9 => "∞",
        0xaa => "°",
        0xae => "✔",
        _ => " ",
    }
}
