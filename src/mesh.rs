use crate::types::{Point, Tint};

/// One emitted vertex: a grid-space position and its decorative tint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoupVertex {
    pub position: Point,
    pub tint: Tint,
}

impl SoupVertex {
    pub fn new(position: Point, tint: Tint) -> Self {
        Self { position, tint }
    }
}

/// Triangle soup produced by the extractor.
///
/// Vertices are stored flat — every group of three consecutive vertices forms one triangle.
/// Vertices are never shared between triangles and no normals are computed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleSoup {
    pub vertices: Vec<SoupVertex>,
}

impl TriangleSoup {
    /// Creates an empty soup with no vertices.
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Creates an empty soup with room for `vertices` vertices.
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
        }
    }

    /// Number of vertices, always a multiple of 3.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Appends one triangle.
    #[inline]
    pub fn push_triangle(&mut self, triangle: [SoupVertex; 3]) {
        self.vertices.extend(triangle);
    }

    /// Moves every vertex of `other` to the end of this soup.
    pub fn append(&mut self, other: &mut TriangleSoup) {
        self.vertices.append(&mut other.vertices);
    }

    /// Returns the three vertices of triangle `tri`.
    pub fn triangle(&self, tri: usize) -> [SoupVertex; 3] {
        let v = &self.vertices[tri * 3..tri * 3 + 3];
        [v[0], v[1], v[2]]
    }

    /// Iterates the triangles in emission order.
    pub fn triangles(&self) -> impl Iterator<Item = [SoupVertex; 3]> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|v| [v[0], v[1], v[2]])
    }

    /// Flat position buffer: `[[x, y, z], ...]`.
    pub fn positions(&self) -> Vec<[f32; 3]> {
        self.vertices
            .iter()
            .map(|v| [v.position.x, v.position.y, v.position.z])
            .collect()
    }

    /// Flat RGBA colour buffer, one entry per vertex.
    pub fn colors(&self) -> Vec<[f32; 4]> {
        self.vertices.iter().map(|v| v.tint.rgba()).collect()
    }

    /// Number of vertices whose position has a NaN component.
    pub fn nan_count(&self) -> usize {
        self.vertices
            .iter()
            .filter(|v| v.position.iter().any(|c| c.is_nan()))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(offset: f32) -> [SoupVertex; 3] {
        Tint::TRIANGLE_CYCLE.map(|tint| SoupVertex::new(Point::new(offset, 0., 0.), tint))
    }

    #[test]
    fn triangles_group_consecutive_vertices() {
        let mut soup = TriangleSoup::new_empty();
        soup.push_triangle(tri(0.));
        soup.push_triangle(tri(1.));

        assert_eq!(soup.len(), 6);
        assert_eq!(soup.triangle_count(), 2);
        assert_eq!(soup.triangle(1), tri(1.));
        assert_eq!(soup.triangles().collect::<Vec<_>>(), vec![tri(0.), tri(1.)]);
    }

    #[test]
    fn flat_buffers() {
        let mut soup = TriangleSoup::with_capacity(3);
        soup.push_triangle(tri(2.));

        assert_eq!(soup.positions(), vec![[2., 0., 0.]; 3]);
        assert_eq!(
            soup.colors(),
            vec![Tint::Red.rgba(), Tint::Green.rgba(), Tint::Blue.rgba()]
        );
    }

    #[test]
    fn append_keeps_order() {
        let mut a = TriangleSoup::new_empty();
        a.push_triangle(tri(0.));
        let mut b = TriangleSoup::new_empty();
        b.push_triangle(tri(1.));

        a.append(&mut b);
        assert!(b.is_empty());
        assert_eq!(a.triangle(0), tri(0.));
        assert_eq!(a.triangle(1), tri(1.));
    }

    #[test]
    fn counts_nan_vertices() {
        let mut soup = TriangleSoup::new_empty();
        soup.push_triangle(tri(f32::NAN));
        soup.push_triangle(tri(0.));
        assert_eq!(soup.nan_count(), 3);
    }
}
