//! Scalar fields sampled by the grid and the extractor.
//!
//! A field is anything that maps a [`Point`] in grid space to a [`Value`].
//! Positive values are "outside", zero and below are "inside".

use crate::{
    error::{FieldCubesError, Result},
    types::{Point, Value, Vector},
};

/// A pure, deterministic scalar function over grid space.
///
/// Implementations must be safe to call from several rayon workers at once.
pub trait ScalarField: Sync {
    fn sample(&self, p: Point) -> Value;
}

impl<F> ScalarField for F
where
    F: Fn(Point) -> Value + Sync,
{
    #[inline]
    fn sample(&self, p: Point) -> Value {
        self(p)
    }
}

/// The analytic height functions that can be selected at runtime.
///
/// Each preset describes a surface `z = f(x, y, z)`; the sampled field is
/// `f(c) - c.z` where `c` is the recentred point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FieldPreset {
    #[default]
    SineWaves,
    Saddle,
    Ripple,
    Chirp,
}

impl FieldPreset {
    pub const ALL: [FieldPreset; 4] = [
        FieldPreset::SineWaves,
        FieldPreset::Saddle,
        FieldPreset::Ripple,
        FieldPreset::Chirp,
    ];

    /// The small integer id used by the input layer.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Human-readable formula, suitable for an on-screen legend.
    pub fn label(self) -> &'static str {
        match self {
            FieldPreset::SineWaves => "z = 2 sin(x) + 2 sin(y)",
            FieldPreset::Saddle => "z = 0.1(x^2) * 0.1(y^2)",
            FieldPreset::Ripple => "z = 0.5(x-y) * sin(z)",
            FieldPreset::Chirp => "z = x*cos(y*x)",
        }
    }

    /// Evaluates the preset at an already recentred point.
    ///
    /// The body is computed in `f64` and narrowed before `c.z` is subtracted.
    pub fn evaluate(self, c: Point) -> Value {
        let (x, y, z) = (c.x as f64, c.y as f64, c.z as f64);
        let height = match self {
            FieldPreset::SineWaves => 2. * x.sin() + 2. * y.sin(),
            FieldPreset::Saddle => 0.1 * x.powi(2) * 0.1 * y.powi(2),
            FieldPreset::Ripple => 0.5 * (c.x - c.y) as f64 * z.sin(),
            FieldPreset::Chirp => x * ((c.x * c.y) as f64).cos(),
        };
        height as Value - c.z
    }
}

impl TryFrom<u8> for FieldPreset {
    type Error = FieldCubesError;

    fn try_from(id: u8) -> Result<Self> {
        FieldPreset::ALL
            .get(id as usize)
            .copied()
            .ok_or(FieldCubesError::UnknownPreset(id))
    }
}

/// A [`FieldPreset`] bound to a grid, so that grid coordinate `(D/2, D/2, D/2)`
/// lands on the preset's origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PresetField {
    pub preset: FieldPreset,
    /// Offset subtracted from every sample point.
    pub center: Vector,
}

impl PresetField {
    /// Binds `preset` to a grid of `dimension` cells per axis.
    pub fn new(preset: FieldPreset, dimension: usize) -> Self {
        let half = (dimension / 2) as Value;
        Self {
            preset,
            center: Vector::new(half, half, half),
        }
    }
}

impl ScalarField for PresetField {
    #[inline]
    fn sample(&self, p: Point) -> Value {
        self.preset.evaluate(p - self.center)
    }
}
