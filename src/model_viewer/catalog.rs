use crate::model_viewer::DEFAULT_PRESET;
use crate::model_viewer::error::ConfigurationError;
use bevy::math::{EulerRot, Quat, Vec3};
use bevy::prelude::Transform;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

/// Placement of a model in world space. Rotation is XYZ Euler angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl ModelTransform {
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }

    pub fn to_bevy(&self) -> Transform {
        Transform {
            translation: self.position,
            rotation: Quat::from_euler(
                EulerRot::XYZ,
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            ),
            scale: self.scale,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub assets: Vec<AssetDefinition>,
    pub presets: Vec<PresetTable>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssetDefinition {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PresetTable {
    pub model: String,
    pub presets: Vec<PresetDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PresetDefinition {
    pub name: String,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl PresetDefinition {
    fn transform(&self) -> ModelTransform {
        ModelTransform::new(
            Vec3::from_array(self.position),
            Vec3::from_array(self.rotation),
            Vec3::from_array(self.scale),
        )
    }
}

/// Ordered model name -> asset path table.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetCatalog {
    entries: Vec<AssetDefinition>,
}

impl AssetCatalog {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn path(&self, model: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.name == model)
            .map(|entry| entry.path.as_str())
    }

    pub fn contains(&self, model: &str) -> bool {
        self.path(model).is_some()
    }

    pub fn first(&self) -> Option<&str> {
        self.entries.first().map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedPreset {
    pub name: String,
    pub transform: ModelTransform,
}

/// Model name -> ordered preset table.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetCatalog {
    models: Vec<(String, Vec<NamedPreset>)>,
}

impl PresetCatalog {
    pub fn presets_for(&self, model: &str) -> Option<&[NamedPreset]> {
        self.models
            .iter()
            .find(|(name, _)| name == model)
            .map(|(_, presets)| presets.as_slice())
    }

    pub fn preset(&self, model: &str, preset: &str) -> Option<ModelTransform> {
        self.presets_for(model)?
            .iter()
            .find(|candidate| candidate.name == preset)
            .map(|candidate| candidate.transform)
    }

    pub fn default_for(&self, model: &str) -> Option<ModelTransform> {
        self.preset(model, DEFAULT_PRESET)
    }
}

/// Both tables, checked against each other. Only constructible through validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerCatalog {
    assets: AssetCatalog,
    presets: PresetCatalog,
}

impl ViewerCatalog {
    pub fn from_config(config: CatalogConfig) -> Result<Self, ConfigurationError> {
        if config.assets.is_empty() {
            return Err(ConfigurationError::EmptyCatalog);
        }

        let mut seen_models = HashSet::new();
        for asset in &config.assets {
            if !seen_models.insert(asset.name.as_str()) {
                return Err(ConfigurationError::DuplicateModel(asset.name.clone()));
            }
        }

        let mut models = Vec::with_capacity(config.presets.len());
        let mut seen_tables = HashSet::new();
        for table in &config.presets {
            if !seen_models.contains(table.model.as_str()) {
                return Err(ConfigurationError::UnknownPresetModel(table.model.clone()));
            }
            if !seen_tables.insert(table.model.as_str()) {
                return Err(ConfigurationError::DuplicateModel(table.model.clone()));
            }

            let mut seen_presets = HashSet::new();
            let mut presets = Vec::with_capacity(table.presets.len());
            for preset in &table.presets {
                if !seen_presets.insert(preset.name.as_str()) {
                    return Err(ConfigurationError::DuplicatePreset {
                        model: table.model.clone(),
                        preset: preset.name.clone(),
                    });
                }
                let transform = preset.transform();
                if !transform.is_finite() {
                    return Err(ConfigurationError::NonFiniteTransform {
                        model: table.model.clone(),
                        preset: preset.name.clone(),
                    });
                }
                presets.push(NamedPreset {
                    name: preset.name.clone(),
                    transform,
                });
            }
            models.push((table.model.clone(), presets));
        }

        let presets = PresetCatalog { models };
        for asset in &config.assets {
            if presets.default_for(&asset.name).is_none() {
                return Err(ConfigurationError::MissingDefaultPreset(asset.name.clone()));
            }
        }

        Ok(Self {
            assets: AssetCatalog {
                entries: config.assets,
            },
            presets,
        })
    }

    pub fn assets(&self) -> &AssetCatalog {
        &self.assets
    }

    pub fn presets(&self) -> &PresetCatalog {
        &self.presets
    }
}

pub fn parse_catalog(text: &str, source: &Path) -> Result<ViewerCatalog, ConfigurationError> {
    let config =
        ron::de::from_str::<CatalogConfig>(text).map_err(|err| ConfigurationError::Malformed {
            path: source.to_path_buf(),
            reason: err.to_string(),
        })?;
    ViewerCatalog::from_config(config)
}

/// Reads the catalog override at `path`, or falls back to the built-in tables when
/// there is none. A file that exists but does not parse is an error, not a fallback.
pub fn load_catalog(path: &Path) -> Result<ViewerCatalog, ConfigurationError> {
    if !path.exists() {
        info!(path = %path.display(), "no catalog override, using built-in models");
        return ViewerCatalog::from_config(default_catalog_config());
    }

    let text = fs::read_to_string(path).map_err(|source| ConfigurationError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = parse_catalog(&text, path)?;
    info!(
        path = %path.display(),
        models = catalog.assets().len(),
        "loaded model catalog"
    );
    Ok(catalog)
}

fn preset(name: &str, position: [f32; 3], rotation: [f32; 3], scale: f32) -> PresetDefinition {
    PresetDefinition {
        name: name.to_string(),
        position,
        rotation,
        scale: [scale; 3],
    }
}

pub fn default_catalog_config() -> CatalogConfig {
    CatalogConfig {
        assets: vec![
            AssetDefinition {
                name: "Regular Hand".to_string(),
                path: "models/regular_hand.glb".to_string(),
            },
            AssetDefinition {
                name: "Skeleton Hand".to_string(),
                path: "models/skeleton_hand.glb".to_string(),
            },
            AssetDefinition {
                name: "Robot Hand".to_string(),
                path: "models/robot_hand.glb".to_string(),
            },
        ],
        presets: vec![
            PresetTable {
                model: "Regular Hand".to_string(),
                presets: vec![
                    preset("Default", [-10.0, -20.0, -7.0], [-1.02, -1.06, 0.07], 1.0),
                    preset("Palm View", [1.0, 39.0, -6.0], [4.41, 1.72, 0.07], 1.2),
                    preset("Back View", [0.0, 35.0, 4.0], [1.27, 1.72, 0.07], 1.2),
                    preset("Side View", [-4.0, 10.0, 0.0], [0.0, 1.57, 0.0], 1.0),
                ],
            },
            PresetTable {
                model: "Skeleton Hand".to_string(),
                presets: vec![
                    preset("Default", [10.0, 30.0, 8.0], [-0.7, -6.2, -3.2], 1.1),
                    preset("Palm View", [6.0, 42.0, -2.0], [1.5, 0.0, 3.14], 1.3),
                    preset("Finger Bones", [0.0, 20.0, 30.0], [-0.3, 0.2, 0.0], 2.0),
                ],
            },
            PresetTable {
                model: "Robot Hand".to_string(),
                presets: vec![
                    preset("Default", [0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0),
                    preset("Top View", [0.0, 20.0, 0.0], [-1.57, 0.0, 0.0], 1.0),
                    preset("Close Up", [0.0, 10.0, 40.0], [0.0, 0.6, 0.0], 2.5),
                ],
            },
        ],
    }
}
