//! Surface extraction over a classified [`VoxelGrid`].
//!
//! ```text
//! Per surface cell:
//! 1. grid.case_at(cell)          →  case index (0 and 255 are skipped)
//! 2. triangulation(case)         →  edge triplets from TRI_TABLE
//! 3. EDGE_CORNERS[edge]          →  the two corners of each edge
//! 4. field.sample (×2)           →  corner values, re-sampled on demand
//! 5. interpolate                 →  vertex position on the edge
//! ```
//!
//! Cells are visited in row-major `i, j, k` order. The parallel walk hands
//! each `i`-slab to a rayon worker and concatenates the slabs in order, so
//! both walks produce identical soups.

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    config::{EdgeInterpolation, SurfaceMode, Winding},
    field::ScalarField,
    grid::VoxelGrid,
    interp::{interpolate, zero_crossing},
    mesh::{SoupVertex, TriangleSoup},
    tables::{BOX_TRIANGLES, EDGE_CORNERS, MAX_ROW_LEN, edge_index, triangulation},
    types::{Point, Tint, Value},
    utils::{Cell, corner_position, is_trivial},
};

/// Vertices emitted for one cell in [`SurfaceMode::VoxelBoxes`].
pub const BOX_VERTEX_COUNT: usize = BOX_TRIANGLES.len();

/// Walks a grid and appends triangles for every cell that contains surface.
pub struct SurfaceExtractor<'a, F: ScalarField + ?Sized> {
    field: &'a F,
    pub mode: SurfaceMode,
    pub interpolation: EdgeInterpolation,
    pub winding: Winding,
}

impl<'a, F: ScalarField + ?Sized> SurfaceExtractor<'a, F> {
    /// Creates an extractor sampling `field`, with default settings.
    pub fn new(field: &'a F) -> Self {
        Self {
            field,
            mode: SurfaceMode::default(),
            interpolation: EdgeInterpolation::default(),
            winding: Winding::default(),
        }
    }

    pub fn with_mode(mut self, mode: SurfaceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_interpolation(mut self, interpolation: EdgeInterpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_winding(mut self, winding: Winding) -> Self {
        self.winding = winding;
        self
    }

    /// Upper bound on the vertices a single cell can emit in the current mode.
    pub fn max_vertices_per_cell(&self) -> usize {
        match self.mode {
            SurfaceMode::Interpolated => MAX_ROW_LEN,
            SurfaceMode::VoxelBoxes => BOX_VERTEX_COUNT,
        }
    }

    /// Extracts the whole grid on the calling thread.
    pub fn extract(&self, grid: &VoxelGrid) -> TriangleSoup {
        let _span = tracing::info_span!("extract", dimension = grid.dimension()).entered();

        let mut soup =
            TriangleSoup::with_capacity(grid.surface_cell_count() * self.max_vertices_per_cell());
        for (cell, case) in grid.cells() {
            self.emit_cell(cell, case, &mut soup);
        }

        self.report(&soup);
        soup
    }

    /// Extracts the whole grid, one rayon task per `i`-slab.
    pub fn extract_parallel(&self, grid: &VoxelGrid) -> TriangleSoup {
        let _span =
            tracing::info_span!("extract_parallel", dimension = grid.dimension()).entered();

        let per_slab: Vec<TriangleSoup> = (0..grid.dimension())
            .into_par_iter()
            .map(|i| {
                let surface_cells = grid.slab(i).filter(|&(_, case)| !is_trivial(case)).count();
                let mut local =
                    TriangleSoup::with_capacity(surface_cells * self.max_vertices_per_cell());
                for (cell, case) in grid.slab(i) {
                    self.emit_cell(cell, case, &mut local);
                }
                local
            })
            .collect();

        // Merge per-slab soups into a single vertex buffer
        let total: usize = per_slab.iter().map(TriangleSoup::len).sum();
        let mut soup = TriangleSoup::with_capacity(total);
        for mut slab in per_slab {
            soup.append(&mut slab);
        }

        self.report(&soup);
        soup
    }

    /// Appends the triangles of one cell. Cases 0 and 255 emit nothing.
    #[inline]
    pub fn emit_cell(&self, cell: Cell, case: u8, out: &mut TriangleSoup) {
        if is_trivial(case) {
            return;
        }
        match self.mode {
            SurfaceMode::Interpolated => self.emit_surface(cell, case, out),
            SurfaceMode::VoxelBoxes => emit_box(cell, out),
        }
    }

    /// Triangulates `cell` from the topology row of `case`.
    ///
    /// `TRI_TABLE[case]` contains edge indices in groups of three, terminated by `-1`:
    /// ```text
    /// TRI_TABLE[case] = [e0, e1, e2,  e3, e4, e5,  -1, ...]
    ///                    \___tri0__/   \___tri1__/
    /// ```
    fn emit_surface(&self, cell: Cell, case: u8, out: &mut TriangleSoup) {
        for triplet in triangulation(case).chunks_exact(3) {
            let edges = match self.winding {
                Winding::TableOrder => [triplet[0], triplet[1], triplet[2]],
                Winding::Reversed => [triplet[2], triplet[1], triplet[0]],
            };
            out.push_triangle(std::array::from_fn(|slot| {
                let position = self.edge_vertex(cell, edge_index(edges[slot]));
                SoupVertex::new(position, Tint::TRIANGLE_CYCLE[slot])
            }));
        }
    }

    /// Places the surface vertex on `edge` of `cell`, re-sampling both corners.
    pub fn edge_vertex(&self, cell: Cell, edge: usize) -> Point {
        let [a, b] = EDGE_CORNERS[edge];
        let pos_a = corner_position(cell, a);
        let pos_b = corner_position(cell, b);
        let value_a = self.field.sample(pos_a);
        let value_b = self.field.sample(pos_b);

        match self.interpolation {
            EdgeInterpolation::SignWeighted => interpolate(value_a, value_b, pos_a, pos_b),
            EdgeInterpolation::ZeroCrossing => zero_crossing(value_a, value_b, pos_a, pos_b),
        }
    }

    fn report(&self, soup: &TriangleSoup) {
        log::debug!(
            "extracted {} triangles ({:?}, {:?})",
            soup.triangle_count(),
            self.mode,
            self.interpolation
        );
        let nan = soup.nan_count();
        if nan > 0 {
            log::warn!("{nan} vertices landed on edges where both corners sample exactly zero");
        }
    }
}

/// Appends the 12-triangle unit box of `cell`, with its fixed per-corner tints.
pub fn emit_box(cell: Cell, out: &mut TriangleSoup) {
    let [i, j, k] = cell;
    out.vertices
        .extend(BOX_TRIANGLES.iter().map(|&([ox, oy, oz], tint)| {
            SoupVertex::new(
                Point::new(
                    (i + ox as usize) as Value,
                    (j + oy as usize) as Value,
                    (k + oz as usize) as Value,
                ),
                tint,
            )
        }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::corner_positions;

    /// Corner 0 of cell (0, 0, 0) samples `+1`, every other lattice point `-1`.
    fn corner_zero_field(p: Point) -> Value {
        if p == Point::new(1., 1., 0.) { 1. } else { -1. }
    }

    #[test]
    fn case_one_emits_edges_0_8_3() {
        let field = corner_zero_field;
        let extractor = SurfaceExtractor::new(&field);
        let mut soup = TriangleSoup::new_empty();
        extractor.emit_cell([0, 0, 0], 1, &mut soup);

        assert_eq!(soup.triangle_count(), 1);
        // Each edge leaves corner 0 at (1, 1, 0); equal magnitudes put the vertex mid-edge.
        let expected = [
            Point::new(1., 0.5, 0.), // edge 0: corners 0 → 1
            Point::new(1., 1., 0.5), // edge 8: corners 0 → 4
            Point::new(0.5, 1., 0.), // edge 3: corners 0 → 3
        ];
        let tri = soup.triangle(0);
        for (slot, vertex) in tri.iter().enumerate() {
            assert_eq!(vertex.position, expected[slot]);
            assert_eq!(vertex.tint, Tint::TRIANGLE_CYCLE[slot]);
        }
    }

    #[test]
    fn reversed_winding_flips_the_triplet() {
        let field = corner_zero_field;
        let forward = SurfaceExtractor::new(&field);
        let reversed = SurfaceExtractor::new(&field).with_winding(Winding::Reversed);

        let mut a = TriangleSoup::new_empty();
        let mut b = TriangleSoup::new_empty();
        forward.emit_cell([0, 0, 0], 1, &mut a);
        reversed.emit_cell([0, 0, 0], 1, &mut b);

        let (a, b) = (a.triangle(0), b.triangle(0));
        assert_eq!(a[0].position, b[2].position);
        assert_eq!(a[1].position, b[1].position);
        assert_eq!(a[2].position, b[0].position);
        // Tints follow the slot, not the edge.
        assert_eq!(b[0].tint, Tint::Red);
    }

    #[test]
    fn trivial_cases_emit_nothing() {
        let field = |_: Point| 0f32;
        let extractor = SurfaceExtractor::new(&field);
        let mut soup = TriangleSoup::new_empty();
        extractor.emit_cell([0, 0, 0], 0, &mut soup);
        extractor.emit_cell([0, 0, 0], 255, &mut soup);
        assert!(soup.is_empty());

        let boxes = SurfaceExtractor::new(&field).with_mode(SurfaceMode::VoxelBoxes);
        boxes.emit_cell([0, 0, 0], 0, &mut soup);
        boxes.emit_cell([0, 0, 0], 255, &mut soup);
        assert!(soup.is_empty());
    }

    #[test]
    fn vertex_count_follows_the_table() {
        let field = |p: Point| (p.x * 1.3).sin() - (p.y * 0.6).cos() + p.z * 0.2 - 0.1;
        let extractor = SurfaceExtractor::new(&field);
        for case in 0..=255u8 {
            let mut soup = TriangleSoup::new_empty();
            extractor.emit_cell([2, 1, 3], case, &mut soup);
            let expected = if is_trivial(case) {
                0
            } else {
                triangulation(case).len()
            };
            assert_eq!(soup.len(), expected, "case {case}");
        }
    }

    #[test]
    fn box_is_the_unit_cube_at_the_cell() {
        let mut soup = TriangleSoup::new_empty();
        emit_box([4, 5, 6], &mut soup);

        assert_eq!(soup.len(), 36);
        for v in &soup.vertices {
            assert!((4. ..=5.).contains(&v.position.x));
            assert!((5. ..=6.).contains(&v.position.y));
            assert!((6. ..=7.).contains(&v.position.z));
        }
        for corner in corner_positions([4, 5, 6]) {
            assert!(soup.vertices.iter().any(|v| v.position == corner));
        }
    }

    #[test]
    fn box_mode_ignores_the_case() {
        let field = |_: Point| 1f32;
        let extractor = SurfaceExtractor::new(&field).with_mode(SurfaceMode::VoxelBoxes);
        for case in [1u8, 77, 254] {
            let mut soup = TriangleSoup::new_empty();
            extractor.emit_cell([1, 1, 1], case, &mut soup);
            let mut expected = TriangleSoup::new_empty();
            emit_box([1, 1, 1], &mut expected);
            assert_eq!(soup, expected);
        }
    }

    #[test]
    fn zero_crossing_mode_uses_the_textbook_rule() {
        // Corner 0 at (1, 1, 0) samples 1, corner 1 at (1, 0, 0) samples 3.
        let field = |p: Point| 1. + 2. * (1. - p.y) + p.z + (1. - p.x) * 10.;
        let weighted = SurfaceExtractor::new(&field);
        let textbook =
            SurfaceExtractor::new(&field).with_interpolation(EdgeInterpolation::ZeroCrossing);

        assert_eq!(weighted.edge_vertex([0, 0, 0], 0), Point::new(1., 0.75, 0.));
        assert_eq!(textbook.edge_vertex([0, 0, 0], 0), Point::new(1., 1.5, 0.));
    }

    #[test]
    fn parallel_matches_sequential() {
        let field = |p: Point| (p.x * 0.45).sin() * 3. + (p.y * 0.8).cos() * 2. - (p.z - 4.);
        let grid = VoxelGrid::classify(&field, 9);
        for mode in [SurfaceMode::Interpolated, SurfaceMode::VoxelBoxes] {
            let extractor = SurfaceExtractor::new(&field).with_mode(mode);
            let sequential = extractor.extract(&grid);
            assert!(!sequential.is_empty());
            assert_eq!(extractor.extract_parallel(&grid), sequential);
        }
    }
}
