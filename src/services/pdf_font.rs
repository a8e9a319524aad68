//! PDF 内置字体 Helvetica（WinAnsiEncoding）的编码和字宽
//!
//! 字宽取自 Adobe Helvetica AFM，单位为 1/1000 字号

/// 无法编码的字符
const REPLACEMENT: u8 = b'?';

/// 把字符编码为 WinAnsi 字节，无法表示的字符返回 `?`
pub fn encode_char(c: char) -> u8 {
    match c {
        ' '..='~' | '\u{A0}'..='\u{FF}' => c as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => REPLACEMENT,
    }
}

pub fn encode(text: &str) -> Vec<u8> {
    text.chars().map(encode_char).collect()
}

/// 字符按编码后的字形计算宽度
pub fn char_width(c: char) -> u32 {
    glyph_width(encode_char(c))
}

pub fn text_width(text: &str) -> u32 {
    text.chars().map(char_width).sum()
}

fn glyph_width(byte: u8) -> u32 {
    match byte {
        b' ' | b'!' => 278,
        b'"' => 355,
        b'#' | b'$' => 556,
        b'%' => 889,
        b'&' => 667,
        b'\'' => 191,
        b'(' | b')' => 333,
        b'*' => 389,
        b'+' => 584,
        b',' => 278,
        b'-' => 333,
        b'.' | b'/' => 278,
        b'0'..=b'9' => 556,
        b':' | b';' => 278,
        b'<' | b'=' | b'>' => 584,
        b'?' => 556,
        b'@' => 1015,
        b'A' | b'B' => 667,
        b'C' | b'D' => 722,
        b'E' => 667,
        b'F' => 611,
        b'G' => 778,
        b'H' => 722,
        b'I' => 278,
        b'J' => 500,
        b'K' => 667,
        b'L' => 556,
        b'M' => 833,
        b'N' => 722,
        b'O' => 778,
        b'P' => 667,
        b'Q' => 778,
        b'R' => 722,
        b'S' => 667,
        b'T' => 611,
        b'U' => 722,
        b'V' => 667,
        b'W' => 944,
        b'X' | b'Y' => 667,
        b'Z' => 611,
        b'[' | b'\\' | b']' => 278,
        b'^' => 469,
        b'_' => 556,
        b'`' => 333,
        b'a' | b'b' => 556,
        b'c' => 500,
        b'd' | b'e' => 556,
        b'f' => 278,
        b'g' | b'h' => 556,
        b'i' | b'j' => 222,
        b'k' => 500,
        b'l' => 222,
        b'm' => 833,
        b'n' | b'o' | b'p' | b'q' => 556,
        b'r' => 333,
        b's' => 500,
        b't' => 278,
        b'u' => 556,
        b'v' => 500,
        b'w' => 722,
        b'x' | b'y' | b'z' => 500,
        b'{' | b'}' => 334,
        b'|' => 260,
        b'~' => 584,
        0x80 => 556,
        0x82 => 222,
        0x83 => 556,
        0x84 => 333,
        0x85 => 1000,
        0x86 | 0x87 => 556,
        0x88 => 333,
        0x89 => 1000,
        0x8A => 667,
        0x8B => 333,
        0x8C => 1000,
        0x8E => 611,
        0x91 | 0x92 => 222,
        0x93 | 0x94 => 333,
        0x95 => 350,
        0x96 => 556,
        0x97 => 1000,
        0x98 => 333,
        0x99 => 1000,
        0x9A => 500,
        0x9B => 333,
        0x9C => 944,
        0x9E => 500,
        0x9F => 667,
        0xA0 => 278,
        0xA1 => 333,
        0xA2..=0xA5 => 556,
        0xA6 => 260,
        0xA7 => 556,
        0xA8 => 333,
        0xA9 => 737,
        0xAA => 370,
        0xAB => 556,
        0xAC => 584,
        0xAD => 333,
        0xAE => 737,
        0xAF => 333,
        0xB0 => 400,
        0xB1 => 584,
        0xB2 | 0xB3 | 0xB4 => 333,
        0xB5 => 556,
        0xB6 => 537,
        0xB7 => 278,
        0xB8 | 0xB9 => 333,
        0xBA => 365,
        0xBB => 556,
        0xBC..=0xBE => 834,
        0xBF => 611,
        0xC0..=0xC5 => 667,
        0xC6 => 1000,
        0xC7 => 722,
        0xC8..=0xCB => 667,
        0xCC..=0xCF => 278,
        0xD0 | 0xD1 => 722,
        0xD2..=0xD6 => 778,
        0xD7 => 584,
        0xD8 => 778,
        0xD9..=0xDC => 722,
        0xDD | 0xDE => 667,
        0xDF => 611,
        0xE0..=0xE5 => 556,
        0xE6 => 889,
        0xE7 => 500,
        0xE8..=0xEB => 556,
        0xEC..=0xEF => 278,
        0xF0..=0xF6 => 556,
        0xF7 => 584,
        0xF8 => 611,
        0xF9..=0xFC => 556,
        0xFD => 500,
        0xFE => 556,
        0xFF => 500,
        // 未定义的码位不会被 encode_char 产生
        _ => 556,
    }
}
