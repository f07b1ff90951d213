use nalgebra::{Point3, Vector3};

/// Scalar field value at a point in space.
pub type Value = f32;

/// A 3D point with [`Value`] components.
pub type Point = Point3<Value>;

/// A 3D vector with [`Value`] components.
pub type Vector = Vector3<Value>;

/// Decorative per-vertex attribute carried alongside each emitted position.
///
/// Interpolated triangles cycle `Red → Green → Blue` per vertex. Voxel boxes
/// use a fixed tint per corner that also includes `Yellow`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tint {
    Red,
    Green,
    Blue,
    Yellow,
}

impl Tint {
    /// Tints assigned to the three vertex slots of an interpolated triangle.
    pub const TRIANGLE_CYCLE: [Tint; 3] = [Tint::Red, Tint::Green, Tint::Blue];

    /// Linear RGBA components, as a vertex colour attribute expects them.
    pub fn rgba(self) -> [f32; 4] {
        match self {
            Tint::Red => [1., 0., 0., 1.],
            Tint::Green => [0., 1., 0., 1.],
            Tint::Blue => [0., 0., 1., 1.],
            Tint::Yellow => [1., 1., 0., 1.],
        }
    }
}
