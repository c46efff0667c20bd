//! Scan-line polygon fill and the output surface it draws onto

/// Index of an allocated (foreground colour, background) display pair.
/// Pair 0 is the surface default and is never handed out.
pub type ColorPair = u16;

/// A character grid that can receive filled spans.
///
/// The terminal host implements this over its cell buffer; tests implement it
/// over a plain grid.
pub trait Surface {
    /// Width and height in character cells
    fn size(&self) -> (u16, u16);

    /// Called once for every new pair before the pair is first used
    fn init_palette_entry(&mut self, pair: ColorPair, color_index: u8);

    /// Fill columns `x_start..=x_end` of row `y` (all already clipped)
    fn fill_span(&mut self, y: u16, x_start: u16, x_end: u16, pair: ColorPair, glyph: char);
}

/// Call `span(y, x_start, x_end)` for every horizontal run inside `points`,
/// clipped to a `width` by `height` grid.
///
/// Each row samples the polygon edges with the half-open rule
/// `y1 <= y < y2`, so horizontal edges contribute no crossings and shared
/// vertices are counted once. Crossings are sorted and filled pairwise.
pub fn scanline_fill<F>(points: &[(i32, i32)], width: u16, height: u16, mut span: F)
where
    F: FnMut(u16, u16, u16),
{
    if points.len() < 3 || width == 0 || height == 0 {
        return;
    }

    let max_x = width as i32 - 1;
    let max_y = height as i32 - 1;
    let min_y = points.iter().map(|p| p.1).min().unwrap_or(0).max(0);
    let top_y = points.iter().map(|p| p.1).max().unwrap_or(-1).min(max_y);

    let mut crossings = Vec::with_capacity(points.len());
    for y in min_y..=top_y {
        crossings.clear();
        for (i, &(x1, y1)) in points.iter().enumerate() {
            let (x2, y2) = points[(i + 1) % points.len()];
            if (y1 <= y && y2 > y) || (y2 <= y && y1 > y) {
                let t = (y - y1) as f32 / (y2 - y1) as f32;
                crossings.push((x1 as f32 + t * (x2 - x1) as f32) as i32);
            }
        }
        crossings.sort_unstable();

        for pair in crossings.chunks_exact(2) {
            let start = pair[0].max(0);
            let end = pair[1].min(max_x);
            if start <= end {
                span(y as u16, start as u16, end as u16);
            }
        }
    }
}

/// Fill a polygon onto a surface with a single pair and glyph
pub fn fill_polygon<S: Surface + ?Sized>(
    surface: &mut S,
    points: &[(i32, i32)],
    pair: ColorPair,
    glyph: char,
) {
    let (width, height) = surface.size();
    scanline_fill(points, width, height, |y, x_start, x_end| {
        surface.fill_span(y, x_start, x_end, pair, glyph);
    });
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// A plain character grid recording the pair of every cell
    pub(crate) struct GridSurface {
        pub width: u16,
        pub height: u16,
        pub cells: Vec<Option<(ColorPair, char)>>,
        pub palette: HashMap<ColorPair, u8>,
    }

    impl GridSurface {
        pub fn new(width: u16, height: u16) -> Self {
            Self {
                width,
                height,
                cells: vec![None; width as usize * height as usize],
                palette: HashMap::new(),
            }
        }

        pub fn cell(&self, x: u16, y: u16) -> Option<(ColorPair, char)> {
            self.cells[y as usize * self.width as usize + x as usize]
        }

        pub fn filled(&self) -> usize {
            self.cells.iter().filter(|c| c.is_some()).count()
        }
    }

    impl Surface for GridSurface {
        fn size(&self) -> (u16, u16) {
            (self.width, self.height)
        }

        fn init_palette_entry(&mut self, pair: ColorPair, color_index: u8) {
            assert!(
                self.palette.insert(pair, color_index).is_none(),
                "pair {pair} registered twice"
            );
        }

        fn fill_span(&mut self, y: u16, x_start: u16, x_end: u16, pair: ColorPair, glyph: char) {
            assert!(x_end < self.width && y < self.height);
            for x in x_start..=x_end {
                self.cells[y as usize * self.width as usize + x as usize] = Some((pair, glyph));
            }
        }
    }

    #[test]
    fn test_fill_square() {
        let mut grid = GridSurface::new(20, 10);
        fill_polygon(&mut grid, &[(2, 2), (6, 2), (6, 6), (2, 6)], 1, '#');
        // Rows 2..6 (bottom edge excluded by the half-open rule), columns 2..=6
        assert_eq!(grid.filled(), 4 * 5);
        assert_eq!(grid.cell(2, 2), Some((1, '#')));
        assert_eq!(grid.cell(6, 5), Some((1, '#')));
        assert_eq!(grid.cell(6, 6), None);
        assert_eq!(grid.cell(1, 3), None);
    }

    #[test]
    fn test_clipped_to_bounds() {
        let mut grid = GridSurface::new(10, 5);
        fill_polygon(&mut grid, &[(-50, -50), (50, -50), (50, 50), (-50, 50)], 3, 'x');
        assert_eq!(grid.filled(), 10 * 5);
    }

    #[test]
    fn test_offscreen_polygon_draws_nothing() {
        let mut grid = GridSurface::new(10, 5);
        fill_polygon(&mut grid, &[(20, 20), (30, 20), (30, 30)], 3, 'x');
        fill_polygon(&mut grid, &[(-20, 1), (-10, 1), (-10, 4)], 3, 'x');
        assert_eq!(grid.filled(), 0);
    }

    #[test]
    fn test_degenerate_polygons() {
        let mut spans = 0;
        scanline_fill(&[(0, 0), (5, 5)], 10, 10, |_, _, _| spans += 1);
        scanline_fill(&[(0, 3), (5, 3), (9, 3)], 10, 10, |_, _, _| spans += 1);
        assert_eq!(spans, 0);
    }

    #[test]
    fn test_triangle_narrows() {
        let mut widths = Vec::new();
        scanline_fill(&[(0, 0), (8, 0), (4, 4)], 20, 20, |_, a, b| widths.push(b - a));
        assert_eq!(widths.len(), 4);
        assert!(widths.windows(2).all(|w| w[0] >= w[1]));
    }
}
