use crate::model_viewer::camera::OrbitCameraState;
use crate::model_viewer::loader::{GltfSceneLoader, ModelLoader};
use crate::model_viewer::session::{LoadOutcome, ViewerSession};
use crate::model_viewer::{GRID_EXTENT, GRID_MAJOR_STEP, GRID_MINOR_STEP};
use bevy::camera::ClearColorConfig;
use bevy::camera::visibility::RenderLayers;
use bevy::prelude::*;
use bevy_egui::PrimaryEguiContext;
use tracing::error;

pub const STAGE_HEIGHT: f32 = -45.0;

#[derive(Resource, Deref, DerefMut)]
pub struct SceneSession(pub ViewerSession<Handle<Scene>>);

/// The model requested at startup.
#[derive(Resource, Debug, Clone)]
pub struct InitialModel(pub String);

/// The scene entity currently holding the displayed model, if any.
#[derive(Resource, Default)]
pub struct ModelSlot {
    entity: Option<Entity>,
}

#[derive(Resource)]
pub struct StageSettings {
    pub show_grid: bool,
}

impl Default for StageSettings {
    fn default() -> Self {
        Self { show_grid: true }
    }
}

#[derive(Component)]
pub struct ViewerCamera;

#[derive(Component)]
pub struct DisplayedModelRoot;

pub fn setup_stage(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    orbit: Res<OrbitCameraState>,
) {
    commands.spawn((Camera3d::default(), orbit.camera_transform(), ViewerCamera));
    commands.spawn((
        Camera2d,
        Camera {
            order: 1,
            clear_color: ClearColorConfig::None,
            ..default()
        },
        RenderLayers::layer(31),
        PrimaryEguiContext,
    ));

    commands.spawn((
        DirectionalLight {
            color: Color::srgb(1.0, 0.96, 0.9),
            shadows_enabled: true,
            illuminance: 12_000.0,
            ..default()
        },
        Transform::from_xyz(60.0, 120.0, 80.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            color: Color::srgb(0.75, 0.82, 1.0),
            illuminance: 3_000.0,
            ..default()
        },
        Transform::from_xyz(-80.0, 40.0, -60.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let stage_mesh = meshes.add(Cylinder::new(90.0, 2.0));
    let stage_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.22, 0.23, 0.26),
        perceptual_roughness: 0.9,
        ..default()
    });
    commands.spawn((
        Mesh3d(stage_mesh),
        MeshMaterial3d(stage_mat),
        Transform::from_xyz(0.0, STAGE_HEIGHT - 1.0, 0.0),
    ));
}

pub fn request_initial_model(
    initial: Res<InitialModel>,
    mut session: ResMut<SceneSession>,
    mut loader: ResMut<GltfSceneLoader>,
) {
    if let Err(err) = session.select_model(&initial.0, &mut *loader) {
        error!("initial model request rejected: {err}");
    }
}

/// Hands finished loads to the session and swaps the scene entity when a new
/// model takes over. The old entity is despawned in the same command flush the
/// new one is spawned in, so no frame renders without a model.
pub fn poll_model_loads<L>(
    mut commands: Commands,
    mut session: ResMut<SceneSession>,
    mut loader: ResMut<L>,
    mut slot: ResMut<ModelSlot>,
) where
    L: ModelLoader<Asset = Handle<Scene>> + Resource,
{
    let outcomes = session.poll_loads(&mut *loader);
    for outcome in outcomes {
        let LoadOutcome::Displayed { model, replaced } = outcome else {
            continue;
        };
        let Some(displayed) = session.displayed() else {
            continue;
        };

        let entity = commands
            .spawn((
                SceneRoot(displayed.asset().clone()),
                displayed.transform().to_bevy(),
                DisplayedModelRoot,
                Name::new(model),
            ))
            .id();
        if let Some(previous) = slot.entity.replace(entity) {
            commands.entity(previous).despawn();
        }
        drop(replaced);
    }
}

pub fn sync_model_transform(
    session: Res<SceneSession>,
    slot: Res<ModelSlot>,
    mut transforms: Query<&mut Transform, With<DisplayedModelRoot>>,
) {
    let (Some(entity), Some(model)) = (slot.entity, session.displayed()) else {
        return;
    };
    let Ok(mut transform) = transforms.get_mut(entity) else {
        return;
    };

    let next = model.transform().to_bevy();
    if *transform != next {
        *transform = next;
    }
}

pub fn draw_grid_system(mut gizmos: Gizmos, settings: Res<StageSettings>) {
    if !settings.show_grid {
        return;
    }

    let extent = GRID_EXTENT as f32;
    let y = STAGE_HEIGHT + 0.01;

    for i in (-GRID_EXTENT..=GRID_EXTENT).step_by(GRID_MINOR_STEP as usize) {
        let f = i as f32;
        let color = if i % GRID_MAJOR_STEP == 0 {
            Color::srgba(0.6, 0.6, 0.6, 0.55)
        } else {
            Color::srgba(0.35, 0.35, 0.35, 0.35)
        };

        gizmos.line(Vec3::new(-extent, y, f), Vec3::new(extent, y, f), color);
        gizmos.line(Vec3::new(f, y, -extent), Vec3::new(f, y, extent), color);
    }
}

pub fn grid_info_text() -> String {
    format!(
        "Grid: {}-unit cells, major line every {} units, {}x{} units.",
        GRID_MINOR_STEP,
        GRID_MAJOR_STEP,
        GRID_EXTENT * 2,
        GRID_EXTENT * 2
    )
}
