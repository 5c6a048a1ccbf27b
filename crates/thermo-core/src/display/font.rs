//! 5x8 bitmap font.
//!
//! Each glyph is five column bytes, least significant bit at the top, which is
//! the SSD1306 page byte layout. Only digits, upper case letters, space and
//! `! : - . %` exist; everything else renders as a space.

pub const GLYPH_WIDTH: usize = 5;

/// Horizontal advance per character: the glyph plus one spacer column.
pub const CHAR_ADVANCE: usize = GLYPH_WIDTH + 1;

const SPACE: usize = 36;

pub static GLYPHS: [[u8; GLYPH_WIDTH]; 42] = [
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x00, 0x00, 0x00, 0x00], // space
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x14, 0x14, 0x14, 0x14, 0x14], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x08, 0x1C, 0x2A, 0x08, 0x08], // %
];

/// Index into [`GLYPHS`] for a character.
pub const fn glyph_index(c: char) -> usize {
    match c {
        '0'..='9' => c as usize - '0' as usize,
        'A'..='Z' => c as usize - 'A' as usize + 10,
        '!' => 37,
        ':' => 38,
        '-' => 39,
        '.' => 40,
        '%' => 41,
        _ => SPACE,
    }
}

pub fn glyph(c: char) -> &'static [u8; GLYPH_WIDTH] {
    &GLYPHS[glyph_index(c)]
}

/// The six column bytes streamed for one character cell.
pub fn char_cell(c: char, invert: bool) -> [u8; CHAR_ADVANCE] {
    let mut cell = [0u8; CHAR_ADVANCE];
    for (dst, src) in cell.iter_mut().zip(glyph(c)) {
        *dst = if invert { !src } else { *src };
    }
    cell[GLYPH_WIDTH] = if invert { 0xFF } else { 0x00 };
    cell
}
