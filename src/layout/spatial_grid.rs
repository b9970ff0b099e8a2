// Spatial hash grid for the collision pass.
//
// Instead of checking every pair of nodes, points are bucketed into square
// cells. With cell size equal to the collision diameter, any pair closer than
// that diameter lives in the same or an adjacent cell.

use std::collections::HashMap;

use super::PointF;

/// A spatial hash grid of node indices.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    /// Size of each cell in the grid.
    cell_size: f64,
    /// Map from cell coordinates to the node indices inside that cell.
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl SpatialGrid {
    /// Cell size should be the largest distance a query cares about.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: if cell_size > 0.0 { cell_size } else { 1.0 }, // Avoid division by zero
            cells: HashMap::new(),
        }
    }

    fn cell_of(&self, p: PointF) -> (i64, i64) {
        ((p.x / self.cell_size).floor() as i64, (p.y / self.cell_size).floor() as i64)
    }

    pub fn insert(&mut self, index: usize, p: PointF) {
        let cell = self.cell_of(p);
        self.cells.entry(cell).or_default().push(index);
    }

    /// Indices in the 3x3 block of cells around `p`.
    /// May include points farther than `cell_size`; caller does the exact check.
    pub fn near(&self, p: PointF) -> impl Iterator<Item = usize> + '_ {
        let (cx, cy) = self.cell_of(p);
        (cx - 1..=cx + 1)
            .flat_map(move |x| (cy - 1..=cy + 1).map(move |y| (x, y)))
            .filter_map(move |cell| self.cells.get(&cell))
            .flat_map(|v| v.iter().copied())
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
