//! Chart colours, assigned by position so renders are reproducible.

use crate::layout::Rgb;

pub const TASK_COLORS: [Rgb; 12] = [
    Rgb(0x0d, 0x52, 0x56),
    Rgb(0x16, 0x8a, 0x8f),
    Rgb(0x1e, 0xc3, 0xca),
    Rgb(0x2d, 0xd4, 0xbf),
    Rgb(0x34, 0xd3, 0x99),
    Rgb(0x6e, 0xe7, 0xb7),
    Rgb(0xa7, 0xf3, 0xd0),
    Rgb(0xd1, 0xfa, 0xe5),
    Rgb(0xa5, 0xb4, 0xfc),
    Rgb(0x81, 0x8c, 0xf8),
    Rgb(0x63, 0x66, 0xf1),
    Rgb(0x4f, 0x46, 0xe5),
];

pub const UNALLOCATED: Rgb = Rgb(0xe5, 0xe7, 0xeb);

pub const OVERBOOKED: Rgb = Rgb(0xef, 0x44, 0x44);

pub fn task_color(index: usize) -> Rgb {
    TASK_COLORS[index % TASK_COLORS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_around_palette() {
        assert_eq!(task_color(0), TASK_COLORS[0]);
        assert_eq!(task_color(12), TASK_COLORS[0]);
        assert_eq!(task_color(13), task_color(1));
    }
}
