use crate::model_viewer::catalog::{ModelTransform, ViewerCatalog};
use crate::model_viewer::{
    DEFAULT_PRESET, POSITION_LIMIT, POSITION_STEP, ROTATION_LIMIT_RAD, ROTATION_STEP_RAD,
    SCALE_MAX, SCALE_MIN, SCALE_STEP,
};
use std::ops::RangeInclusive;

/// One editable component of a model transform: a getter/setter pair against
/// the live [`ModelTransform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformField {
    PositionX,
    PositionY,
    PositionZ,
    RotationX,
    RotationY,
    RotationZ,
    /// Reads the x scale, writes all three axes.
    UniformScale,
}

impl TransformField {
    pub fn get(self, transform: &ModelTransform) -> f32 {
        match self {
            Self::PositionX => transform.position.x,
            Self::PositionY => transform.position.y,
            Self::PositionZ => transform.position.z,
            Self::RotationX => transform.rotation.x,
            Self::RotationY => transform.rotation.y,
            Self::RotationZ => transform.rotation.z,
            Self::UniformScale => transform.scale.x,
        }
    }

    pub fn set(self, transform: &mut ModelTransform, value: f32) {
        match self {
            Self::PositionX => transform.position.x = value,
            Self::PositionY => transform.position.y = value,
            Self::PositionZ => transform.position.z = value,
            Self::RotationX => transform.rotation.x = value,
            Self::RotationY => transform.rotation.y = value,
            Self::RotationZ => transform.rotation.z = value,
            Self::UniformScale => transform.scale = bevy::math::Vec3::splat(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldBinding {
    pub label: &'static str,
    pub target: TransformField,
    pub range: RangeInclusive<f32>,
    pub step: f32,
}

impl FieldBinding {
    fn new(label: &'static str, target: TransformField, range: RangeInclusive<f32>, step: f32) -> Self {
        Self {
            label,
            target,
            range,
            step,
        }
    }

    pub fn read(&self, transform: &ModelTransform) -> f32 {
        self.target.get(transform)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldFolder {
    pub title: &'static str,
    pub fields: Vec<FieldBinding>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub label: &'static str,
    pub options: Vec<String>,
    pub initial: String,
}

impl Selector {
    /// Every catalog model, in catalog order, with `current` shown as selected.
    pub fn models(catalog: &ViewerCatalog, current: &str) -> Self {
        Self {
            label: "Model",
            options: catalog.assets().names().map(str::to_string).collect(),
            initial: current.to_string(),
        }
    }
}

/// Change events emitted by the panel, dispatched by the session.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    SelectModel(String),
    SelectPreset(String),
    EditField(TransformField, f32),
}

/// Everything the control panel shows for one displayed model.
///
/// Built wholesale by [`ControlPanelBinding::build`] whenever the displayed model
/// changes and never patched afterwards. `generation` scopes toolkit widget state,
/// so a rebuilt panel starts clean.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPanelBinding {
    generation: u64,
    model_name: String,
    model_selector: Selector,
    preset_selector: Selector,
    folders: Vec<FieldFolder>,
}

impl ControlPanelBinding {
    pub fn build(generation: u64, model_name: &str, catalog: &ViewerCatalog) -> Self {
        let preset_names: Vec<String> = catalog
            .presets()
            .presets_for(model_name)
            .map(|presets| presets.iter().map(|p| p.name.clone()).collect())
            .unwrap_or_default();

        let position_range = -POSITION_LIMIT..=POSITION_LIMIT;
        let rotation_range = -ROTATION_LIMIT_RAD..=ROTATION_LIMIT_RAD;

        Self {
            generation,
            model_name: model_name.to_string(),
            model_selector: Selector::models(catalog, model_name),
            preset_selector: Selector {
                label: "Preset",
                options: preset_names,
                initial: DEFAULT_PRESET.to_string(),
            },
            folders: vec![
                FieldFolder {
                    title: "Position",
                    fields: vec![
                        FieldBinding::new("x", TransformField::PositionX, position_range.clone(), POSITION_STEP),
                        FieldBinding::new("y", TransformField::PositionY, position_range.clone(), POSITION_STEP),
                        FieldBinding::new("z", TransformField::PositionZ, position_range, POSITION_STEP),
                    ],
                },
                FieldFolder {
                    title: "Rotation",
                    fields: vec![
                        FieldBinding::new("x", TransformField::RotationX, rotation_range.clone(), ROTATION_STEP_RAD),
                        FieldBinding::new("y", TransformField::RotationY, rotation_range.clone(), ROTATION_STEP_RAD),
                        FieldBinding::new("z", TransformField::RotationZ, rotation_range, ROTATION_STEP_RAD),
                    ],
                },
                FieldFolder {
                    title: "Scale",
                    fields: vec![FieldBinding::new(
                        "uniform",
                        TransformField::UniformScale,
                        SCALE_MIN..=SCALE_MAX,
                        SCALE_STEP,
                    )],
                },
            ],
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn model_selector(&self) -> &Selector {
        &self.model_selector
    }

    pub fn preset_selector(&self) -> &Selector {
        &self.preset_selector
    }

    pub fn folders(&self) -> &[FieldFolder] {
        &self.folders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_viewer::catalog::default_catalog_config;
    use bevy::math::Vec3;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn catalog() -> ViewerCatalog {
        ViewerCatalog::from_config(default_catalog_config()).expect("built-in catalog")
    }

    #[rstest]
    fn binding_lists_catalog_models_and_presets() {
        let binding = ControlPanelBinding::build(3, "Skeleton Hand", &catalog());

        assert_eq!(binding.generation(), 3);
        assert_eq!(binding.model_name(), "Skeleton Hand");
        assert_eq!(
            binding.model_selector().options,
            vec!["Regular Hand", "Skeleton Hand", "Robot Hand"]
        );
        assert_eq!(binding.model_selector().initial, "Skeleton Hand");
        assert_eq!(
            binding.preset_selector().options,
            vec!["Default", "Palm View", "Finger Bones"]
        );
        assert_eq!(binding.preset_selector().initial, "Default");
    }

    #[rstest]
    fn binding_exposes_seven_fields_with_bounded_ranges() {
        let binding = ControlPanelBinding::build(0, "Regular Hand", &catalog());
        let titles: Vec<_> = binding.folders().iter().map(|f| f.title).collect();
        assert_eq!(titles, vec!["Position", "Rotation", "Scale"]);

        let fields: Vec<&FieldBinding> =
            binding.folders().iter().flat_map(|f| f.fields.iter()).collect();
        assert_eq!(fields.len(), 7);
        assert_eq!(fields[0].range, -1000.0..=1000.0);
        assert_eq!(fields[0].step, 1.0);
        assert_eq!(fields[3].range, -10.0..=10.0);
        assert_eq!(fields[3].step, 0.1);
        assert_eq!(fields[6].target, TransformField::UniformScale);
        assert_eq!(fields[6].range, 0.1..=5.0);
    }

    #[rstest]
    fn building_twice_yields_the_same_panel() {
        let catalog = catalog();
        assert_eq!(
            ControlPanelBinding::build(1, "Robot Hand", &catalog),
            ControlPanelBinding::build(1, "Robot Hand", &catalog)
        );
    }

    #[rstest]
    #[case(TransformField::PositionX, Vec3::new(5.0, 2.0, 3.0), Vec3::new(0.0, 0.0, 0.0))]
    #[case(TransformField::PositionY, Vec3::new(1.0, 5.0, 3.0), Vec3::new(0.0, 0.0, 0.0))]
    #[case(TransformField::PositionZ, Vec3::new(1.0, 2.0, 5.0), Vec3::new(0.0, 0.0, 0.0))]
    #[case(TransformField::RotationX, Vec3::new(1.0, 2.0, 3.0), Vec3::new(5.0, 0.0, 0.0))]
    #[case(TransformField::RotationY, Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 5.0, 0.0))]
    #[case(TransformField::RotationZ, Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, 5.0))]
    fn setter_writes_exactly_one_component(
        #[case] field: TransformField,
        #[case] position: Vec3,
        #[case] rotation: Vec3,
    ) {
        let mut transform = ModelTransform::new(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::ONE);
        field.set(&mut transform, 5.0);

        assert_eq!(transform.position, position);
        assert_eq!(transform.rotation, rotation);
        assert_eq!(transform.scale, Vec3::ONE);
        assert_eq!(field.get(&transform), 5.0);
    }

    proptest! {
        #[test]
        fn uniform_scale_writes_all_three_axes(
            value in 0.1f32..=5.0,
            x in -10.0f32..10.0,
            y in -10.0f32..10.0,
            z in -10.0f32..10.0,
        ) {
            let mut transform = ModelTransform::new(Vec3::ZERO, Vec3::ZERO, Vec3::new(x, y, z));
            TransformField::UniformScale.set(&mut transform, value);
            prop_assert_eq!(transform.scale, Vec3::splat(value));
            prop_assert_eq!(TransformField::UniformScale.get(&transform), value);
        }
    }
}
