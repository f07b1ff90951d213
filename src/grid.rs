use ndarray::{Array3, Zip};

use crate::{
    field::ScalarField,
    utils::{Cell, case_index, corner_samples, is_trivial},
};

/// A dense `D × D × D` lattice of case indices, one per cell.
///
/// Cases are stored contiguously in row-major order, so cell `(i, j, k)` lives
/// at `(i * D + j) * D + k`. Only the case index is kept; the extractor
/// re-samples the field when it needs corner values.
///
/// A grid is produced by one classification pass and never modified. Any
/// change to the field means classifying a new grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelGrid {
    cases: Array3<u8>,
}

impl VoxelGrid {
    /// Classifies every cell of a `dimension³` grid, in parallel over cells.
    pub fn classify<F: ScalarField + ?Sized>(field: &F, dimension: usize) -> Self {
        let _span = tracing::info_span!("classify", dimension).entered();

        let mut cases = Array3::zeros((dimension, dimension, dimension));
        Zip::indexed(&mut cases).par_for_each(|(i, j, k), case| {
            *case = case_index(&corner_samples(field, [i, j, k]));
        });

        let grid = Self { cases };
        log::debug!(
            "classified {dimension}³ grid, {} surface cells",
            grid.surface_cell_count()
        );
        grid
    }

    /// Classifies every cell on the calling thread.
    pub fn classify_sequential<F: ScalarField + ?Sized>(field: &F, dimension: usize) -> Self {
        let _span = tracing::info_span!("classify_sequential", dimension).entered();

        let cases = Array3::from_shape_fn((dimension, dimension, dimension), |(i, j, k)| {
            case_index(&corner_samples(field, [i, j, k]))
        });
        Self { cases }
    }

    /// Wraps precomputed case indices laid out as `(i * D + j) * D + k`.
    ///
    /// Returns `None` if `cases.len()` is not `dimension³`.
    pub fn from_cases(dimension: usize, cases: Vec<u8>) -> Option<Self> {
        Array3::from_shape_vec((dimension, dimension, dimension), cases)
            .ok()
            .map(|cases| Self { cases })
    }

    /// Number of cells along each axis.
    pub fn dimension(&self) -> usize {
        self.cases.dim().0
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Returns the case index of `cell`.
    ///
    /// # Panics
    /// Panics if `cell` lies outside the grid.
    #[inline]
    pub fn case_at(&self, cell: Cell) -> u8 {
        self.cases[cell]
    }

    /// Offset of `cell` in [`as_slice`](VoxelGrid::as_slice).
    #[inline]
    pub fn flat_index(&self, [i, j, k]: Cell) -> usize {
        let d = self.dimension();
        (i * d + j) * d + k
    }

    /// The case buffer in row-major order.
    pub fn as_slice(&self) -> &[u8] {
        self.cases
            .as_slice()
            .expect("grid cases are always in standard layout")
    }

    /// Iterates `(cell, case)` pairs in row-major `i, j, k` order.
    pub fn cells(&self) -> impl Iterator<Item = (Cell, u8)> + '_ {
        self.cases
            .indexed_iter()
            .map(|((i, j, k), &case)| ([i, j, k], case))
    }

    /// Iterates the `(cell, case)` pairs of the `i`-th slab in `j, k` order.
    pub fn slab(&self, i: usize) -> impl Iterator<Item = (Cell, u8)> + '_ {
        let d = self.dimension();
        (0..d).flat_map(move |j| (0..d).map(move |k| ([i, j, k], self.cases[[i, j, k]])))
    }

    /// Number of cells that contain part of the surface.
    pub fn surface_cell_count(&self) -> usize {
        self.cases.iter().filter(|&&case| !is_trivial(case)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    #[test]
    fn constant_negative_field_is_all_inside() {
        let grid = VoxelGrid::classify(&|_: Point| -1f32, 8);
        assert_eq!(grid.len(), 512);
        assert!(grid.as_slice().iter().all(|&case| case == 0));
        assert_eq!(grid.surface_cell_count(), 0);
    }

    #[test]
    fn constant_positive_field_is_all_outside() {
        let grid = VoxelGrid::classify(&|_: Point| 1f32, 4);
        assert!(grid.as_slice().iter().all(|&case| case == 255));
    }

    #[test]
    fn parallel_matches_sequential() {
        let field = |p: Point| (p.x * 0.7).sin() + (p.y * 0.3).cos() - p.z * 0.1;
        let parallel = VoxelGrid::classify(&field, 12);
        let sequential = VoxelGrid::classify_sequential(&field, 12);
        assert_eq!(parallel, sequential);
        assert!(parallel.surface_cell_count() > 0);
    }

    #[test]
    fn flat_index_is_row_major() {
        let field = |p: Point| p.x + 2. * p.y - 3. * p.z;
        let grid = VoxelGrid::classify(&field, 5);
        assert_eq!(grid.flat_index([1, 2, 3]), (5 + 2) * 5 + 3);
        for (cell, case) in grid.cells() {
            assert_eq!(grid.as_slice()[grid.flat_index(cell)], case);
            assert_eq!(grid.case_at(cell), case);
        }
    }

    #[test]
    fn cells_walk_k_fastest() {
        let grid = VoxelGrid::from_cases(2, vec![0; 8]).unwrap();
        let order: Vec<Cell> = grid.cells().map(|(cell, _)| cell).collect();
        assert_eq!(order[0], [0, 0, 0]);
        assert_eq!(order[1], [0, 0, 1]);
        assert_eq!(order[2], [0, 1, 0]);
        assert_eq!(order[4], [1, 0, 0]);
    }

    #[test]
    fn slab_matches_cells() {
        let cases: Vec<u8> = (0..27).collect();
        let grid = VoxelGrid::from_cases(3, cases).unwrap();
        let from_slabs: Vec<_> = (0..3).flat_map(|i| grid.slab(i)).collect();
        let from_cells: Vec<_> = grid.cells().collect();
        assert_eq!(from_slabs, from_cells);
    }

    #[test]
    fn from_cases_checks_length() {
        assert!(VoxelGrid::from_cases(2, vec![0; 7]).is_none());
        assert_eq!(VoxelGrid::from_cases(0, vec![]).map(|g| g.len()), Some(0));
    }

    #[test]
    fn single_outside_corner() {
        // Only corner 0, at offset (1, 1, 0), samples above zero.
        let field = |p: Point| if p == Point::new(1., 1., 0.) { 1f32 } else { -1. };
        let grid = VoxelGrid::classify(&field, 1);
        assert_eq!(grid.case_at([0, 0, 0]), 1);
    }
}
