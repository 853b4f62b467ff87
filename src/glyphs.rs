// Copyright (c) 2026 oxyzenq

use std::char;

fn push_range(out: &mut Vec<char>, start: u32, end: u32) {
    for v in start..=end {
        if let Some(ch) = char::from_u32(v) {
            out.push(ch);
        }
    }
}

/// Fixed rain alphabet: Latin uppercase, digits, and the 46 base kana as
/// halfwidth katakana. The writer draws one char per cell, so every glyph
/// here must occupy a single terminal column.
pub fn rain_alphabet() -> Vec<char> {
    let mut out = Vec::with_capacity(82);
    push_range(&mut out, 0x41, 0x5A);
    push_range(&mut out, 0x30, 0x39);
    // U+FF66 'ｦ' sits apart from the U+FF71..=U+FF9D 'ｱ'..'ﾝ' run.
    out.push('ｦ');
    push_range(&mut out, 0xFF71, 0xFF9D);
    out
}
