pub mod camera;
pub mod catalog;
pub mod error;
pub mod loader;
pub mod panel;
pub mod scene;
pub mod session;
pub mod ui;
pub mod viewer;

pub const CATALOG_CONFIG_PATH: &str = "config/model_viewer.ron";
pub const DEFAULT_PRESET: &str = "Default";

pub const POSITION_LIMIT: f32 = 1000.0;
pub const POSITION_STEP: f32 = 1.0;
pub const ROTATION_LIMIT_RAD: f32 = 10.0;
pub const ROTATION_STEP_RAD: f32 = 0.1;
pub const SCALE_MIN: f32 = 0.1;
pub const SCALE_MAX: f32 = 5.0;
pub const SCALE_STEP: f32 = 0.1;

pub const GRID_EXTENT: i32 = 100;
pub const GRID_MAJOR_STEP: i32 = 50;
pub const GRID_MINOR_STEP: i32 = 10;

pub const DEFAULT_CAMERA_YAW_DEG: f32 = 0.0;
pub const DEFAULT_CAMERA_PITCH_DEG: f32 = 20.0;
pub const DEFAULT_CAMERA_DISTANCE: f32 = 140.0;
