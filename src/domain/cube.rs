/// Cubes — the per-cell color toggles the player flips by landing.

use super::grid::PyramidGeometry;

/// One pyramid cell. Color flips initial → target exactly once per
/// level; it never reverts except through `reset_color`.
#[derive(Clone, Copy, Debug)]
pub struct Cube {
    pub row: i32,
    pub col: i32,
    target_color: bool,
}

impl Cube {
    pub fn new(row: i32, col: i32) -> Self {
        Cube { row, col, target_color: false }
    }

    /// Flip to the target color. Returns whether a flip actually
    /// happened — the orchestrator awards points only on `true`.
    pub fn try_advance_color(&mut self) -> bool {
        if self.target_color {
            return false;
        }
        self.target_color = true;
        true
    }

    /// Back to the initial color. Level/life boundaries only.
    pub fn reset_color(&mut self) {
        self.target_color = false;
    }

    #[inline]
    pub fn is_target_color(&self) -> bool {
        self.target_color
    }
}

/// All cubes of a pyramid, row-major, indexed via the geometry.
#[derive(Clone, Debug)]
pub struct CubeField {
    cubes: Vec<Cube>,
    geom: PyramidGeometry,
}

impl CubeField {
    pub fn new(geom: PyramidGeometry) -> Self {
        let mut cubes = Vec::with_capacity(geom.cell_count());
        for row in 0..geom.rows() as i32 {
            for col in 0..=row {
                cubes.push(Cube::new(row, col));
            }
        }
        CubeField { cubes, geom }
    }

    pub fn cube_at(&self, row: i32, col: i32) -> Option<&Cube> {
        self.geom.linear_index(row, col).map(|i| &self.cubes[i])
    }

    pub fn cube_at_mut(&mut self, row: i32, col: i32) -> Option<&mut Cube> {
        self.geom.linear_index(row, col).map(move |i| &mut self.cubes[i])
    }

    /// Level is complete when every cube shows the target color.
    pub fn all_target(&self) -> bool {
        self.cubes.iter().all(|c| c.is_target_color())
    }

    pub fn reset_all(&mut self) {
        for cube in &mut self.cubes {
            cube.reset_color();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cube> {
        self.cubes.iter()
    }
}
