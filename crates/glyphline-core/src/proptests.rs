use crate::layout::{glyph_placements, CanvasLayout};
use crate::types::{Direction, FontMetrics, ShapedGlyph, ShapingResult};
use crate::SizeSpec;
use proptest::prelude::*;

fn horizontal_line(advances: &[f32], size: f32) -> ShapingResult {
    ShapingResult {
        glyphs: advances
            .iter()
            .enumerate()
            .map(|(i, &x_advance)| ShapedGlyph {
                id: i as u32,
                cluster: i as u32,
                x_advance,
                y_advance: 0.0,
                x_offset: 0.0,
                y_offset: 0.0,
            })
            .collect(),
        direction: Direction::LeftToRight,
        size,
    }
}

fn metrics(size: f32) -> FontMetrics {
    FontMetrics {
        ascent: size * 0.8,
        descent: -size * 0.2,
        line_gap: 0.0,
    }
}

// Property: without offsets, glyph origins never move backwards
proptest! {
    #[test]
    fn prop_pen_is_monotonic(advances in prop::collection::vec(0.0f32..200.0, 0..64)) {
        let shaped = horizontal_line(&advances, 32.0);
        let placed = glyph_placements(&shaped);

        prop_assert_eq!(placed.len(), advances.len());
        for pair in placed.windows(2) {
            prop_assert!(pair[1].x >= pair[0].x);
        }
    }
}

// Property: the canvas always covers the whole advance plus both margins
proptest! {
    #[test]
    fn prop_canvas_contains_the_line(
        advances in prop::collection::vec(0.0f32..200.0, 0..64),
        size in 1.0f32..256.0,
        margin in 0.0f32..64.0,
    ) {
        let shaped = horizontal_line(&advances, size);
        let layout = CanvasLayout::compute(&shaped, &metrics(size), margin);
        let (sum_x, _) = shaped.total_advance();

        prop_assert!(layout.width as f32 >= 2.0 * margin + sum_x);
        prop_assert!(layout.height as f32 >= 2.0 * margin + size);
        prop_assert!(layout.origin_x == margin);
    }
}

// Property: adding a glyph never shrinks the canvas
proptest! {
    #[test]
    fn prop_longer_lines_are_never_narrower(
        advances in prop::collection::vec(0.0f32..200.0, 0..32),
        extra in 0.0f32..200.0,
    ) {
        let shorter = horizontal_line(&advances, 48.0);
        let mut longer_advances = advances.clone();
        longer_advances.push(extra);
        let longer = horizontal_line(&longer_advances, 48.0);

        let a = CanvasLayout::compute(&shorter, &metrics(48.0), 24.0);
        let b = CanvasLayout::compute(&longer, &metrics(48.0), 24.0);
        prop_assert!(b.width >= a.width);
        prop_assert_eq!(a.height, b.height);
    }
}

// Property: valid point sizes scale linearly with resolution
proptest! {
    #[test]
    fn prop_points_scale_with_dpi(points in 1.0f32..200.0, dpi in 36.0f32..600.0) {
        let single = SizeSpec::Points { points, dpi }.pixels_per_em();
        let double = SizeSpec::Points { points, dpi: dpi * 2.0 }.pixels_per_em();

        match (single, double) {
            (Ok(a), Ok(b)) => prop_assert!((b - 2.0 * a).abs() < 1e-2 * b.max(1.0)),
            _ => prop_assert!(false, "valid sizes were rejected"),
        }
    }
}
