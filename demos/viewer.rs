use bevy::prelude::*;
use bevy_field_cubes::{
    ExtractionConfig, FieldCubesPlugin,
    config::SurfaceMode,
    field::FieldPreset,
    plugin::FieldSurface,
};
use bevy_infinite_grid::{InfiniteGridBundle, InfiniteGridPlugin, InfiniteGridSettings};
use bevy_panorbit_camera::{PanOrbitCamera, PanOrbitCameraPlugin};

const PRESET_KEYS: [KeyCode; 4] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
];

#[derive(Component)]
struct HelpText;

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            FieldCubesPlugin::default(),
            PanOrbitCameraPlugin,
            InfiniteGridPlugin,
        ))
        .add_systems(Startup, setup)
        .add_systems(Update, (select_preset, toggle_voxels, update_help).chain())
        .run();
}

fn setup(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<ExtractionConfig>,
) {
    let center = Vec3::splat((config.dimension / 2) as f32);

    commands.spawn(InfiniteGridBundle {
        settings: InfiniteGridSettings {
            fadeout_distance: 1000.0,
            ..Default::default()
        },
        ..Default::default()
    });

    commands.spawn((
        Camera3d::default(),
        PanOrbitCamera {
            focus: center,
            radius: Some(40.),
            ..default()
        },
        Transform::from_translation(center + Vec3::new(0., 0., 40.)).looking_at(center, Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: light_consts::lux::FULL_DAYLIGHT,
            ..Default::default()
        },
        Transform::default().with_rotation(Quat::from_rotation_x(-45.0_f32.to_radians())),
    ));

    commands.spawn((
        FieldSurface,
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            cull_mode: None,
            double_sided: true,
            ..default()
        })),
    ));

    commands.spawn((
        HelpText,
        Text::new(""),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.),
            left: Val::Px(10.),
            ..default()
        },
    ));
}

fn select_preset(keyboard: Res<ButtonInput<KeyCode>>, mut config: ResMut<ExtractionConfig>) {
    for (preset, key) in FieldPreset::ALL.into_iter().zip(PRESET_KEYS) {
        if keyboard.just_pressed(key) && config.preset != preset {
            config.preset = preset;
        }
    }
}

fn toggle_voxels(keyboard: Res<ButtonInput<KeyCode>>, mut config: ResMut<ExtractionConfig>) {
    if keyboard.just_pressed(KeyCode::KeyV) {
        config.toggle_mode();
    }
}

fn update_help(config: Res<ExtractionConfig>, mut query: Query<&mut Text, With<HelpText>>) {
    if !config.is_changed() {
        return;
    }
    let mode = match config.mode {
        SurfaceMode::Interpolated => "surface",
        SurfaceMode::VoxelBoxes => "voxels",
    };
    for mut text in query.iter_mut() {
        text.0 = format!(
            "Rotate: left mouse | Zoom: scroll\n\
             Function previews: 1, 2, 3, 4\n\
             Toggle voxel visibility: V ({mode})\n\n\
             Current function: {}",
            config.preset.label()
        );
    }
}
