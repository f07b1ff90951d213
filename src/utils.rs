use crate::{
    field::ScalarField,
    tables::CORNER_OFFSETS,
    types::{Point, Value},
};

/// Lattice coordinate `(i, j, k)` of a cell's minimum corner.
pub type Cell = [usize; 3];

/// Returns the grid-space position of corner `corner` of `cell`.
#[inline]
pub fn corner_position(cell: Cell, corner: usize) -> Point {
    let [i, j, k] = cell;
    let [ox, oy, oz] = CORNER_OFFSETS[corner];
    Point::new(
        (i + ox as usize) as Value,
        (j + oy as usize) as Value,
        (k + oz as usize) as Value,
    )
}

/// Returns the 8 grid-space corner positions of `cell`, in the corner order of
/// [`CORNER_OFFSETS`].
#[inline]
pub fn corner_positions(cell: Cell) -> [Point; 8] {
    std::array::from_fn(|corner| corner_position(cell, corner))
}

/// Samples `field` at the 8 corners of `cell`.
#[inline]
pub fn corner_samples<F: ScalarField + ?Sized>(field: &F, cell: Cell) -> [Value; 8] {
    corner_positions(cell).map(|p| field.sample(p))
}

/// Computes the case index for a set of corner samples.
///
/// A bit is set when the corner's sample is strictly above zero ("outside"):
///
/// ```text
/// corner index:  7  6  5  4  3  2  1  0
/// case bits:    [_][_][_][_][_][_][_][_]
///                                     ^-- corner 0 outside?
/// ```
#[inline]
pub fn case_index(samples: &[Value; 8]) -> u8 {
    samples
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v > 0.)
        .fold(0, |case, (i, _)| case | 1 << i)
}

/// Whether `case` produces no surface: every corner on the same side.
#[inline]
pub fn is_trivial(case: u8) -> bool {
    case == 0 || case == u8::MAX
}
