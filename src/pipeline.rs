use crate::{
    config::ExtractionConfig,
    error::Result,
    extract::SurfaceExtractor,
    field::{PresetField, ScalarField},
    grid::VoxelGrid,
    mesh::TriangleSoup,
};

/// The products of one full run: the classified grid and the emitted soup.
///
/// Both are owned by the run that produced them. A configuration change means
/// a new run, never an in-place update.
#[derive(Clone, Debug)]
pub struct Extraction {
    pub config: ExtractionConfig,
    pub grid: VoxelGrid,
    pub soup: TriangleSoup,
}

impl Extraction {
    /// Classifies and extracts the preset field selected by `config`.
    pub fn run(config: &ExtractionConfig) -> Result<Self> {
        let field = PresetField::new(config.preset, config.dimension);
        Self::run_with_field(config, &field)
    }

    /// Like [`run`](Extraction::run), but samples `field` instead of `config.preset`.
    pub fn run_with_field<F: ScalarField + ?Sized>(
        config: &ExtractionConfig,
        field: &F,
    ) -> Result<Self> {
        config.validate()?;
        let _span = tracing::info_span!("extraction", preset = ?config.preset).entered();

        let extractor = SurfaceExtractor::new(field)
            .with_mode(config.mode)
            .with_interpolation(config.interpolation)
            .with_winding(config.winding);

        let (grid, soup) = if config.parallel {
            let grid = VoxelGrid::classify(field, config.dimension);
            let soup = extractor.extract_parallel(&grid);
            (grid, soup)
        } else {
            let grid = VoxelGrid::classify_sequential(field, config.dimension);
            let soup = extractor.extract(&grid);
            (grid, soup)
        };

        log::trace!(
            "{:?}: {} surface cells, {} vertices",
            config.preset,
            grid.surface_cell_count(),
            soup.len()
        );

        Ok(Self {
            config: *config,
            grid,
            soup,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SurfaceMode, field::FieldPreset};

    #[test]
    fn rejects_empty_grids() {
        let config = ExtractionConfig::default().with_dimension(0);
        assert!(Extraction::run(&config).is_err());
    }

    #[test]
    fn every_preset_produces_a_surface() {
        for preset in FieldPreset::ALL {
            let config = ExtractionConfig::default()
                .with_preset(preset)
                .with_dimension(16);
            let run = Extraction::run(&config).unwrap();
            assert_eq!(run.grid.dimension(), 16);
            assert!(run.soup.triangle_count() > 0, "{preset:?}");
            assert_eq!(run.soup.len() % 3, 0);
        }
    }

    #[test]
    fn box_mode_emits_36_vertices_per_surface_cell() {
        let config = ExtractionConfig::default()
            .with_dimension(12)
            .with_mode(SurfaceMode::VoxelBoxes);
        let run = Extraction::run(&config).unwrap();
        assert_eq!(run.soup.len(), 36 * run.grid.surface_cell_count());
    }
}
