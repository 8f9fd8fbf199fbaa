/// Pure layout arithmetic for the collage canvas
///
/// Everything here is a deterministic function of the image count and
/// the fixed constants below, so two renders of the same gallery size
/// always produce the same dimensions.

/// Fixed canvas width in pixels
pub const CANVAS_WIDTH: u32 = 1200;
/// Horizontal margin; also reused as the bottom padding
pub const MARGIN_X: f32 = 60.0;
/// Gap between grid cells, and between the header band and the grid
pub const CELL_GAP: f32 = 20.0;
/// Header region height (band + name line + breathing room)
pub const HEADER_HEIGHT: f32 = 280.0;
/// Footer region height
pub const FOOTER_HEIGHT: f32 = 100.0;

/// Column count as a step function of the image count
pub fn columns(count: u32) -> u32 {
    if count > 12 {
        4
    } else if count > 8 {
        3
    } else {
        2
    }
}

/// Row count for the image count under `columns(count)`
pub fn rows(count: u32) -> u32 {
    count.div_ceil(columns(count))
}

/// Derived geometry for one render; never stored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollageLayout {
    pub columns: u32,
    pub rows: u32,
    /// Cell side length; cells are square
    pub cell: f32,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl CollageLayout {
    /// Compute the layout for `count` images (1..=SLOT_COUNT)
    pub fn for_count(count: u32) -> Self {
        let cols = columns(count);
        let rows = rows(count);

        let cell =
            (CANVAS_WIDTH as f32 - 2.0 * MARGIN_X - (cols - 1) as f32 * CELL_GAP) / cols as f32;
        // rows is 0 for an empty count; the grid collapses to no content
        let content = rows as f32 * cell + rows.saturating_sub(1) as f32 * CELL_GAP;
        let canvas_height = (HEADER_HEIGHT + content + FOOTER_HEIGHT + MARGIN_X).round() as u32;

        CollageLayout {
            columns: cols,
            rows,
            cell,
            canvas_width: CANVAS_WIDTH,
            canvas_height,
        }
    }

    /// Top-left corner of the grid cell at `index`, row-major
    pub fn cell_origin(&self, index: u32) -> (f32, f32) {
        let col = index % self.columns;
        let row = index / self.columns;
        let x = MARGIN_X + col as f32 * (self.cell + CELL_GAP);
        let y = HEADER_HEIGHT + CELL_GAP + row as f32 * (self.cell + CELL_GAP);
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::SLOT_COUNT;

    #[test]
    fn column_step_function() {
        for k in 1..=SLOT_COUNT {
            let cols = columns(k);
            assert!(
                [2, 3, 4].contains(&cols),
                "columns({}) out of range: {}",
                k,
                cols
            );
            let expected = if k > 12 {
                4
            } else if k > 8 {
                3
            } else {
                2
            };
            assert_eq!(cols, expected, "columns({})", k);
            assert_eq!(rows(k), k.div_ceil(cols), "rows({})", k);
        }
    }

    #[test]
    fn concrete_scenarios() {
        // k=1: two columns, one row
        let small = CollageLayout::for_count(1);
        assert_eq!((small.columns, small.rows), (2, 1));
        // k=10: three columns, four rows
        let threshold = CollageLayout::for_count(10);
        assert_eq!((threshold.columns, threshold.rows), (3, 4));
        // k=20: four columns, five rows
        let full = CollageLayout::for_count(20);
        assert_eq!((full.columns, full.rows), (4, 5));
    }

    #[test]
    fn dimensions_are_deterministic() {
        for k in 1..=SLOT_COUNT {
            let a = CollageLayout::for_count(k);
            let b = CollageLayout::for_count(k);
            assert_eq!(a, b);
            assert_eq!(a.canvas_width, CANVAS_WIDTH);
            assert!(a.canvas_height > HEADER_HEIGHT as u32 + FOOTER_HEIGHT as u32);
        }
    }

    #[test]
    fn cell_width_formula() {
        // cols=2: (1200 - 120 - 20) / 2
        assert_eq!(CollageLayout::for_count(8).cell, 530.0);
        // cols=4: (1200 - 120 - 60) / 4
        assert_eq!(CollageLayout::for_count(20).cell, 255.0);
    }

    #[test]
    fn cells_are_placed_row_major() {
        let layout = CollageLayout::for_count(10); // 3 columns
        let (x0, y0) = layout.cell_origin(0);
        let (x1, y1) = layout.cell_origin(1);
        let (x3, y3) = layout.cell_origin(3);

        assert_eq!((x0, y0), (MARGIN_X, HEADER_HEIGHT + CELL_GAP));
        // Next cell in the same row moves right by cell + gap
        assert_eq!(x1, x0 + layout.cell + CELL_GAP);
        assert_eq!(y1, y0);
        // First cell of the second row wraps back to the margin
        assert_eq!(x3, MARGIN_X);
        assert_eq!(y3, y0 + layout.cell + CELL_GAP);
    }

    #[test]
    fn empty_count_collapses_without_panicking() {
        let layout = CollageLayout::for_count(0);
        assert_eq!(layout.rows, 0);
        assert_eq!(
            layout.canvas_height,
            (HEADER_HEIGHT + FOOTER_HEIGHT + MARGIN_X).round() as u32
        );
    }

    #[test]
    fn canvas_height_matches_formula() {
        let layout = CollageLayout::for_count(10);
        let content = layout.rows as f32 * layout.cell + (layout.rows - 1) as f32 * CELL_GAP;
        let expected = (HEADER_HEIGHT + content + FOOTER_HEIGHT + MARGIN_X).round() as u32;
        assert_eq!(layout.canvas_height, expected);
    }
}
