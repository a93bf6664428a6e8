//! Advance widths of the standard Helvetica face (AFM units per 1000 em).

/// Widths for printable ASCII, starting at U+0020.
#[rustfmt::skip]
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // 'p'..'~'
];

const ELLIPSIS_WIDTH: u16 = 1000;
const DEFAULT_WIDTH: u16 = 556;

fn char_width(ch: char) -> u16 {
    let code = ch as u32;
    match code {
        0x20..=0x7E => HELVETICA_ASCII[(code - 0x20) as usize],
        0x2026 => ELLIPSIS_WIDTH,
        _ => DEFAULT_WIDTH,
    }
}

/// Width of `text` in points when set in Helvetica at `size_pt`.
pub fn helvetica_width_pt(text: &str, size_pt: f32) -> f32 {
    let units: u32 = text.chars().map(|c| char_width(c) as u32).sum();
    units as f32 * size_pt / 1000.0
}

pub fn pt_to_mm(pt: f32) -> f32 {
    pt * 25.4 / 72.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_widths() {
        assert_eq!(helvetica_width_pt("", 10.0), 0.0);
        assert_eq!(helvetica_width_pt("0", 1000.0), 556.0);
        assert_eq!(helvetica_width_pt("i", 1000.0), 222.0);
        assert_eq!(helvetica_width_pt("W", 1000.0), 944.0);
        assert_eq!(helvetica_width_pt("~", 1000.0), 584.0);
        assert_eq!(helvetica_width_pt("…", 1000.0), 1000.0);
    }

    #[test]
    fn width_scales_with_size() {
        let w6 = helvetica_width_pt("Rapidene 500mg", 6.0);
        let w12 = helvetica_width_pt("Rapidene 500mg", 12.0);
        assert!((w12 - 2.0 * w6).abs() < 1e-4);
    }

    #[test]
    fn points_to_millimetres() {
        assert!((pt_to_mm(72.0) - 25.4).abs() < 1e-4);
    }
}
