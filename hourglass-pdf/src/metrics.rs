//! Helvetica advance widths (AFM, 1/1000 em) for centring text.

/// Widths for WinAnsi codes 32..=126.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

const FALLBACK_WIDTH: u16 = 556;

pub fn glyph_width(code: u8) -> u16 {
    match code {
        32..=126 => HELVETICA_ASCII[(code - 32) as usize],
        _ => FALLBACK_WIDTH,
    }
}

/// Width of encoded text in points at `font_size`.
pub fn text_width_pt(encoded: &[u8], font_size: f64) -> f64 {
    let units: u32 = encoded.iter().map(|&b| u32::from(glyph_width(b))).sum();
    f64::from(units) / 1000.0 * font_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_glyphs() {
        assert_eq!(glyph_width(b' '), 278);
        assert_eq!(glyph_width(b'W'), 944);
        assert_eq!(glyph_width(b'i'), 222);
        assert_eq!(glyph_width(b'~'), 584);
        assert_eq!(glyph_width(0xE9), FALLBACK_WIDTH);
    }

    #[test]
    fn width_scales_with_size() {
        let w10 = text_width_pt(b"Hours", 10.0);
        let w20 = text_width_pt(b"Hours", 20.0);
        assert!((w20 - 2.0 * w10).abs() < 1e-9);
        // H=722 o=556 u=556 r=333 s=500
        assert!((w10 - 26.67).abs() < 1e-9);
    }
}
