use bevy::{
    asset::RenderAssetUsages,
    mesh::PrimitiveTopology,
    prelude::*,
    tasks::{AsyncComputeTaskPool, Task, block_on, futures_lite::future},
};

use crate::{config::ExtractionConfig, error::Result, mesh::TriangleSoup, pipeline::Extraction};

/// System sets for the extraction pipeline.
///
/// Use these to order your own systems relative to mesh generation:
///
/// ```rust,ignore
/// // Inspect or post-process the soup before it becomes a mesh:
/// app.add_systems(Update, weld_vertices.after(FieldCubesSet::Generate)
///                                      .before(FieldCubesSet::Upload));
/// ```
///
/// ```text
/// FieldCubesSet::Spawn   →  [async compute]  →  FieldCubesSet::Generate  →  [your systems]  →  FieldCubesSet::Upload
/// ```
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldCubesSet {
    /// Spawns an async extraction task for surfaces that need one.
    Spawn,
    /// Polls async tasks and inserts [`GeneratedSoup`] on completion.
    Generate,
    /// Uploads [`GeneratedSoup`] into a Bevy [`Mesh3d`] and removes [`GeneratedSoup`].
    Upload,
}

/// Marks an entity whose mesh is the extracted surface of the current [`ExtractionConfig`].
///
/// The mesh is rebuilt when the entity is added and whenever the config resource changes.
#[derive(Component, Default)]
#[require(Transform)]
pub struct FieldSurface;

/// Holds the in-flight extraction for a [`FieldSurface`].
///
/// Replacing it with a newer task drops, and so cancels, the older one.
#[derive(Component)]
pub struct ExtractionTask(Task<Result<Extraction>>);

/// Finished triangle soup waiting to be uploaded.
#[derive(Component)]
pub struct GeneratedSoup(pub TriangleSoup);

/// Bevy plugin that keeps [`FieldSurface`] meshes in sync with [`ExtractionConfig`].
///
/// When the `auto_rebuild` feature is enabled, every change to the config resource re-runs
/// the whole extraction on Bevy's `AsyncComputeTaskPool`:
///
/// ```text
/// ExtractionConfig changed (or FieldSurface added)
///   → ExtractionTask spawned        (FieldCubesSet::Spawn)
///   → [async compute runs]
///   → GeneratedSoup inserted        (FieldCubesSet::Generate, once task completes)
///   → Mesh3d inserted               (FieldCubesSet::Upload)
///   → GeneratedSoup removed
/// ```
#[derive(Default)]
pub struct FieldCubesPlugin {
    /// Initial value of the [`ExtractionConfig`] resource.
    pub config: ExtractionConfig,
}

impl Plugin for FieldCubesPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config);

        #[cfg(feature = "auto_rebuild")]
        app.configure_sets(
            Update,
            (
                FieldCubesSet::Spawn,
                FieldCubesSet::Generate,
                FieldCubesSet::Upload,
            )
                .chain(),
        )
        .add_systems(
            Update,
            (
                spawn_extraction_tasks.in_set(FieldCubesSet::Spawn),
                poll_extraction_tasks.in_set(FieldCubesSet::Generate),
                upload_soup.in_set(FieldCubesSet::Upload),
            ),
        );
    }
}

/// Spawns an extraction task for each new [`FieldSurface`], or for all of them when the config changed.
fn spawn_extraction_tasks(
    mut commands: Commands,
    config: Res<ExtractionConfig>,
    query: Query<(Entity, Ref<FieldSurface>)>,
) {
    let task_pool = AsyncComputeTaskPool::get();
    let config_changed = config.is_changed();

    for (entity, surface) in query.iter() {
        if !config_changed && !surface.is_added() {
            continue;
        }

        let config = *config;
        let task = task_pool.spawn(async move { Extraction::run(&config) });
        commands.entity(entity).insert(ExtractionTask(task));
    }
}

/// Polls in-flight [`ExtractionTask`]s each frame and inserts [`GeneratedSoup`] on completion.
///
/// Non-blocking: tasks that haven't finished are skipped and retried next frame.
fn poll_extraction_tasks(mut commands: Commands, mut query: Query<(Entity, &mut ExtractionTask)>) {
    for (entity, mut task) in query.iter_mut() {
        let Some(result) = block_on(future::poll_once(&mut task.0)) else {
            continue;
        };

        let mut entity = commands.entity(entity);
        entity.remove::<ExtractionTask>();
        match result {
            Ok(run) => {
                entity.insert(GeneratedSoup(run.soup));
            }
            Err(err) => log::error!("surface extraction failed: {err}"),
        }
    }
}

/// Builds a `TriangleList` [`Mesh`] from each [`GeneratedSoup`] and inserts it as [`Mesh3d`].
fn upload_soup(
    mut commands: Commands,
    query: Query<(Entity, &GeneratedSoup)>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    for (entity, generated) in query.iter() {
        let mut bevy_mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::RENDER_WORLD,
        );

        bevy_mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, generated.0.positions());
        bevy_mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, generated.0.colors());
        // Lighting needs normals; the soup carries none, so shade each triangle flat.
        bevy_mesh.compute_flat_normals();

        commands
            .entity(entity)
            .insert(Mesh3d(meshes.add(bevy_mesh)))
            .remove::<GeneratedSoup>();
    }
}
