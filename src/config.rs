use bevy::prelude::Resource;

use crate::{
    error::{FieldCubesError, Result},
    field::FieldPreset,
};

/// Default number of cells per grid axis.
pub const DEFAULT_DIMENSION: usize = 32;

/// What the extractor emits for each surface cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SurfaceMode {
    /// Triangulate the cell from the topology table.
    #[default]
    Interpolated,
    /// Emit a unit box at the cell instead, ignoring its case.
    VoxelBoxes,
}

/// How a surface vertex is placed along a cube edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgeInterpolation {
    /// See [`interp::interpolate`](crate::interp::interpolate).
    #[default]
    SignWeighted,
    /// See [`interp::zero_crossing`](crate::interp::zero_crossing).
    ZeroCrossing,
}

/// Order in which the three edges of a table triplet are emitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Winding {
    /// `row[i], row[i + 1], row[i + 2]`
    #[default]
    TableOrder,
    /// `row[i + 2], row[i + 1], row[i]`, flipping every triangle.
    Reversed,
}

/// Everything one extraction run depends on.
///
/// Inserted as a resource by [`FieldCubesPlugin`](crate::FieldCubesPlugin). Any change to it
/// triggers a full re-extraction:
///
/// ```rust,ignore
/// fn toggle_boxes(mut config: ResMut<ExtractionConfig>) {
///     config.mode = SurfaceMode::VoxelBoxes;
/// }
/// ```
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct ExtractionConfig {
    pub preset: FieldPreset,
    pub mode: SurfaceMode,
    /// Cells per axis. Default: `32`.
    pub dimension: usize,
    pub interpolation: EdgeInterpolation,
    pub winding: Winding,
    /// Run classification and extraction on the rayon pool. Output is identical either way.
    pub parallel: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            preset: FieldPreset::default(),
            mode: SurfaceMode::default(),
            dimension: DEFAULT_DIMENSION,
            interpolation: EdgeInterpolation::default(),
            winding: Winding::default(),
            parallel: true,
        }
    }
}

impl ExtractionConfig {
    pub fn with_preset(mut self, preset: FieldPreset) -> Self {
        self.preset = preset;
        self
    }

    pub fn with_mode(mut self, mode: SurfaceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
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

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Flips between [`SurfaceMode::Interpolated`] and [`SurfaceMode::VoxelBoxes`].
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            SurfaceMode::Interpolated => SurfaceMode::VoxelBoxes,
            SurfaceMode::VoxelBoxes => SurfaceMode::Interpolated,
        };
    }

    /// Selects a preset by its input-layer id.
    pub fn select_preset(&mut self, id: u8) -> Result<()> {
        self.preset = FieldPreset::try_from(id)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(FieldCubesError::InvalidDimension(self.dimension));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.dimension, 32);
        assert_eq!(config.preset, FieldPreset::SineWaves);
        assert_eq!(config.mode, SurfaceMode::Interpolated);
        assert_eq!(config.interpolation, EdgeInterpolation::SignWeighted);
        assert_eq!(config.winding, Winding::TableOrder);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let config = ExtractionConfig::default().with_dimension(0);
        assert_eq!(config.validate(), Err(FieldCubesError::InvalidDimension(0)));
    }

    #[test]
    fn toggling_mode_twice_restores_it() {
        let mut config = ExtractionConfig::default();
        config.toggle_mode();
        assert_eq!(config.mode, SurfaceMode::VoxelBoxes);
        config.toggle_mode();
        assert_eq!(config.mode, SurfaceMode::Interpolated);
    }

    #[test]
    fn unknown_preset_leaves_selection_unchanged() {
        let mut config = ExtractionConfig::default().with_preset(FieldPreset::Ripple);
        assert_eq!(config.select_preset(7), Err(FieldCubesError::UnknownPreset(7)));
        assert_eq!(config.preset, FieldPreset::Ripple);
        config.select_preset(3).unwrap();
        assert_eq!(config.preset, FieldPreset::Chirp);
    }
}
