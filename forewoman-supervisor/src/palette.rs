//! Per-instance display colors.

use colored::Color;

/// The fixed palette instances cycle through, in spawn order.
pub const PALETTE: [Color; 5] = [
    Color::Yellow,
    Color::Cyan,
    Color::Magenta,
    Color::Green,
    Color::Blue,
];

/// Color for the instance spawned at `spawn_index` (0-based, across all types).
pub fn color_for(spawn_index: usize) -> Color {
    PALETTE[spawn_index % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_palette() {
        let colors: Vec<_> = (0..7).map(color_for).collect();
        assert_eq!(
            colors,
            [
                Color::Yellow,
                Color::Cyan,
                Color::Magenta,
                Color::Green,
                Color::Blue,
                Color::Yellow,
                Color::Cyan,
            ]
        );
    }
}
