/// Pyramid geometry — the static triangular grid of cubes.
///
/// Row `r` contains `r + 1` cells, columns `0..=r`. All addressing in
/// the game goes through this type; an address outside the pyramid is
/// the "off-grid" signal that actors use to detect falls, so the query
/// methods return `bool`/`Option` rather than erroring.

/// Horizontal spacing between adjacent columns, in screen units.
pub const COL_SPACING: i32 = 60;
/// Vertical spacing between rows, in screen units.
pub const ROW_SPACING: i32 = 45;
/// Screen position of the apex cube's center.
pub const APEX_X: i32 = 400;
pub const APEX_Y: i32 = 100;

/// Number of rows in the standard pyramid.
pub const PYRAMID_ROWS: usize = 7;

#[derive(Clone, Copy, Debug)]
pub struct PyramidGeometry {
    rows: usize,
}

impl PyramidGeometry {
    pub fn new(rows: usize) -> Self {
        PyramidGeometry { rows }
    }

    pub fn standard() -> Self {
        Self::new(PYRAMID_ROWS)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Width of row `row` (valid rows only).
    #[inline]
    pub fn row_width(&self, row: usize) -> usize {
        row + 1
    }

    /// Total cube count: rows * (rows + 1) / 2.
    pub fn cell_count(&self) -> usize {
        self.rows * (self.rows + 1) / 2
    }

    /// Is (row, col) a cube of the pyramid?
    pub fn is_valid_cell(&self, row: i32, col: i32) -> bool {
        row >= 0 && (row as usize) < self.rows && col >= 0 && (col as usize) <= row as usize
    }

    /// Screen-space center of a cube's top face. `None` off-grid —
    /// consumers treat that as the fell-off signal.
    pub fn cell_center(&self, row: i32, col: i32) -> Option<(i32, i32)> {
        if !self.is_valid_cell(row, col) {
            return None;
        }
        let x = APEX_X + col * COL_SPACING - row * COL_SPACING / 2;
        let y = APEX_Y + row * ROW_SPACING;
        Some((x, y))
    }

    /// Row-major linear index into the cube array. Bijective with
    /// `0..cell_count()` over valid cells; `None` otherwise.
    pub fn linear_index(&self, row: i32, col: i32) -> Option<usize> {
        if !self.is_valid_cell(row, col) {
            return None;
        }
        let row = row as usize;
        // sum of widths of rows 0..row
        Some(row * (row + 1) / 2 + col as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_matches_row_widths() {
        let g = PyramidGeometry::standard();
        for row in 0..7i32 {
            for col in 0..7i32 {
                assert_eq!(g.is_valid_cell(row, col), col <= row, "({row},{col})");
            }
        }
        assert!(!g.is_valid_cell(-1, -1));
        assert!(!g.is_valid_cell(-1, 0));
        assert!(!g.is_valid_cell(7, 0));
        assert!(!g.is_valid_cell(3, -1));
        assert!(!g.is_valid_cell(3, 4));
    }

    #[test]
    fn linear_index_is_bijective() {
        let g = PyramidGeometry::standard();
        assert_eq!(g.cell_count(), 28);
        let mut seen = [false; 28];
        for row in 0..7i32 {
            for col in 0..=row {
                let i = g.linear_index(row, col).unwrap();
                assert!(i < 28);
                assert!(!seen[i], "duplicate index {i}");
                seen[i] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn linear_index_none_off_grid() {
        let g = PyramidGeometry::standard();
        assert_eq!(g.linear_index(-1, 0), None);
        assert_eq!(g.linear_index(2, 3), None);
        assert_eq!(g.linear_index(7, 0), None);
    }

    #[test]
    fn cell_center_projection() {
        let g = PyramidGeometry::standard();
        assert_eq!(g.cell_center(0, 0), Some((APEX_X, APEX_Y)));
        // row 2, col 0: shifted one full column left of apex
        assert_eq!(g.cell_center(2, 0), Some((APEX_X - COL_SPACING, APEX_Y + 2 * ROW_SPACING)));
        assert_eq!(g.cell_center(0, 1), None);
        assert_eq!(g.cell_center(-1, -1), None);
    }
}
