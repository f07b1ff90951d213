//! Marching Cubes over analytic scalar fields.
//!
//! ```text
//! ScalarField → VoxelGrid::classify → SurfaceExtractor (TRI_TABLE + interpolate) → TriangleSoup
//! ```
//!
//! [`Extraction::run`] performs a whole pass for an [`ExtractionConfig`]; the
//! [`FieldCubesPlugin`] re-runs it whenever that config changes and hands the
//! soup to Bevy as a mesh.

pub mod config;
pub mod error;
pub mod extract;
pub mod field;
pub mod grid;
pub mod interp;
pub mod mesh;
pub mod pipeline;
pub mod plugin;
pub mod tables;
pub mod types;
pub mod utils;

pub use config::ExtractionConfig;
pub use pipeline::Extraction;
pub use plugin::FieldCubesPlugin;
