use crate::model_viewer::CATALOG_CONFIG_PATH;
use crate::model_viewer::camera::{
    OrbitCameraState, UiInteractionState, orbit_camera_system, update_camera_viewport,
};
use crate::model_viewer::catalog::{ViewerCatalog, load_catalog};
use crate::model_viewer::loader::GltfSceneLoader;
use crate::model_viewer::scene::{
    InitialModel, ModelSlot, SceneSession, StageSettings, draw_grid_system, poll_model_loads,
    request_initial_model, setup_stage, sync_model_transform,
};
use crate::model_viewer::session::ViewerSession;
use crate::model_viewer::ui::ui_system;
use anyhow::{Context, bail};
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};
use std::env;
use std::path::PathBuf;

const HELP: &str = "Usage:\n  handview [options]\n\nOptions:\n  -c, --config <path>   Model catalog (RON), default config/model_viewer.ron\n  -m, --model <name>    Model to show first, default the first catalog entry\n  -h, --help            Show this help";

#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub config_path: PathBuf,
    pub model: Option<String>,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(CATALOG_CONFIG_PATH),
            model: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    Run(CliOptions),
    Help,
}

pub fn parse_cli_args(args: impl IntoIterator<Item = String>) -> Result<CliCommand, String> {
    let mut options = CliOptions::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let Some(value) = args.next() else {
                    return Err(format!("{arg} expects a path"));
                };
                options.config_path = PathBuf::from(value);
            }
            "--model" | "-m" => {
                let Some(value) = args.next() else {
                    return Err(format!("{arg} expects a model name"));
                };
                options.model = Some(value);
            }
            "--help" | "-h" => return Ok(CliCommand::Help),
            _ => return Err(format!("unknown option: {arg}")),
        }
    }

    Ok(CliCommand::Run(options))
}

/// Picks the startup model; an explicit name must exist in the catalog.
pub fn resolve_initial_model(catalog: &ViewerCatalog, requested: Option<&str>) -> anyhow::Result<String> {
    match requested {
        Some(name) if catalog.assets().contains(name) => Ok(name.to_string()),
        Some(name) => {
            let known: Vec<&str> = catalog.assets().names().collect();
            bail!("unknown model '{name}', expected one of: {}", known.join(", "))
        }
        None => catalog
            .assets()
            .first()
            .map(str::to_string)
            .context("catalog has no models"),
    }
}

pub fn run() -> anyhow::Result<()> {
    let options = match parse_cli_args(env::args().skip(1)) {
        Ok(CliCommand::Run(options)) => options,
        Ok(CliCommand::Help) => {
            println!("{HELP}");
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}\n\n{HELP}");
            std::process::exit(2);
        }
    };

    let catalog = load_catalog(&options.config_path)
        .with_context(|| format!("invalid model catalog ({})", options.config_path.display()))?;
    let initial = resolve_initial_model(&catalog, options.model.as_deref())?;

    let exit = App::new()
        .insert_resource(SceneSession(ViewerSession::new(catalog)))
        .insert_resource(InitialModel(initial))
        .insert_resource(OrbitCameraState::default())
        .insert_resource(UiInteractionState::default())
        .insert_resource(StageSettings::default())
        .insert_resource(ModelSlot::default())
        .insert_resource(ClearColor(Color::srgb(0.08, 0.09, 0.11)))
        .insert_resource(GlobalAmbientLight {
            color: Color::srgb(0.85, 0.88, 0.95),
            brightness: 300.0,
            affects_lightmapped_meshes: true,
        })
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Hand Viewer".to_string(),
                resolution: (1400, 900).into(),
                present_mode: PresentMode::AutoVsync,
                ..Default::default()
            }),
            ..Default::default()
        }))
        .add_plugins(EguiPlugin::default())
        .init_resource::<GltfSceneLoader>()
        .add_systems(Startup, (setup_stage, request_initial_model))
        .add_systems(
            Update,
            (poll_model_loads::<GltfSceneLoader>, sync_model_transform).chain(),
        )
        .add_systems(Update, update_camera_viewport)
        .add_systems(Update, orbit_camera_system)
        .add_systems(Update, draw_grid_system)
        .add_systems(EguiPrimaryContextPass, ui_system)
        .run();

    if let AppExit::Error(code) = exit {
        bail!("viewer exited with code {code}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_viewer::catalog::default_catalog_config;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn catalog() -> ViewerCatalog {
        ViewerCatalog::from_config(default_catalog_config()).expect("built-in catalog")
    }

    #[rstest]
    fn no_args_uses_defaults() {
        assert_eq!(
            parse_cli_args(args(&[])),
            Ok(CliCommand::Run(CliOptions::default()))
        );
    }

    #[rstest]
    #[case(&["--model", "Skeleton Hand", "--config", "alt.ron"])]
    #[case(&["-c", "alt.ron", "-m", "Skeleton Hand"])]
    fn model_and_config_are_parsed(#[case] raw: &[&str]) {
        assert_eq!(
            parse_cli_args(args(raw)),
            Ok(CliCommand::Run(CliOptions {
                config_path: PathBuf::from("alt.ron"),
                model: Some("Skeleton Hand".to_string()),
            }))
        );
    }

    #[rstest]
    #[case(&["--help"])]
    #[case(&["-m", "Robot Hand", "-h"])]
    fn help_wins(#[case] raw: &[&str]) {
        assert_eq!(parse_cli_args(args(raw)), Ok(CliCommand::Help));
    }

    #[rstest]
    #[case(&["--model"], "--model expects a model name")]
    #[case(&["--config"], "--config expects a path")]
    #[case(&["--fullscreen"], "unknown option: --fullscreen")]
    fn bad_args_are_reported(#[case] raw: &[&str], #[case] message: &str) {
        assert_eq!(parse_cli_args(args(raw)), Err(message.to_string()));
    }

    #[rstest]
    fn initial_model_defaults_to_first_entry() {
        assert_eq!(
            resolve_initial_model(&catalog(), None).expect("model"),
            "Regular Hand"
        );
    }

    #[rstest]
    fn explicit_initial_model_must_exist() {
        assert_eq!(
            resolve_initial_model(&catalog(), Some("Robot Hand")).expect("model"),
            "Robot Hand"
        );
        let err = resolve_initial_model(&catalog(), Some("Ghost Hand")).unwrap_err();
        assert!(err.to_string().contains("Ghost Hand"));
    }
}
