use crate::model_viewer::camera::{OrbitCameraState, UiInteractionState};
use crate::model_viewer::catalog::ModelTransform;
use crate::model_viewer::loader::GltfSceneLoader;
use crate::model_viewer::panel::{ControlPanelBinding, FieldBinding, PanelEvent, Selector};
use crate::model_viewer::scene::{SceneSession, StageSettings, grid_info_text};
use crate::model_viewer::session::ViewerSession;
use bevy::prelude::ResMut;
use bevy_egui::{EguiContexts, egui};
use tracing::warn;

pub fn ui_system(
    mut contexts: EguiContexts,
    mut session: ResMut<SceneSession>,
    mut loader: ResMut<GltfSceneLoader>,
    mut ui_state: ResMut<UiInteractionState>,
    mut orbit: ResMut<OrbitCameraState>,
    mut stage: ResMut<StageSettings>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::TopBottomPanel::top("model_viewer_top_bar").show(ctx, |ui| {
        ui.horizontal_wrapped(|ui| {
            ui.heading("Hand Viewer");
            ui.separator();
            ui.label(status_text(&session.0));
            ui.separator();
            ui.small("LMB orbit, RMB/MMB pan, wheel zoom.");
        });
    });

    let mut events = Vec::new();
    let side_panel_response = egui::SidePanel::left("model_viewer_controls")
        .resizable(true)
        .default_width(320.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Center View").clicked() {
                    orbit.recenter();
                }
                ui.checkbox(&mut stage.show_grid, "Show grid");
            });
            ui.small(grid_info_text());
            ui.separator();

            match (session.panel(), session.displayed()) {
                (Some(panel), Some(model)) => draw_binding(
                    ui,
                    panel,
                    model.transform(),
                    session.active_preset(),
                    &mut events,
                ),
                _ => draw_empty_panel(ui, &session.0, &mut events),
            }
        });

    for event in events {
        if let Err(err) = session.handle_panel_event(event, &mut *loader) {
            warn!("panel event rejected: {err}");
        }
    }

    ui_state.wants_pointer_input = ctx.wants_pointer_input();
    ui_state.side_panel_width = side_panel_response.response.rect.width();
}

fn status_text<A>(session: &ViewerSession<A>) -> String {
    if let Some(ticket) = session.pending() {
        return format!("Loading {}...", ticket.model);
    }
    if let Some(err) = session.last_error() {
        return format!("Load failed: {err}");
    }
    match session.displayed_name() {
        Some(name) => format!("Showing {name}"),
        None => "No model loaded".to_string(),
    }
}

/// What the side panel reports while no model is displayed.
#[derive(Debug, Clone, PartialEq)]
enum EmptyPanelStatus {
    Loading(String),
    Failed(String),
    Idle,
}

fn empty_panel_status<A>(session: &ViewerSession<A>) -> EmptyPanelStatus {
    if let Some(ticket) = session.pending() {
        return EmptyPanelStatus::Loading(ticket.model.clone());
    }
    match session.last_error() {
        Some(err) => EmptyPanelStatus::Failed(err.to_string()),
        None => EmptyPanelStatus::Idle,
    }
}

/// The model picker offered before anything is displayed. Shows the pending
/// model, if any.
fn empty_model_selector<A>(session: &ViewerSession<A>) -> Selector {
    let current = session.pending().map(|ticket| ticket.model.as_str()).unwrap_or("Pick a model");
    Selector::models(session.catalog(), current)
}

fn draw_empty_panel<A>(ui: &mut egui::Ui, session: &ViewerSession<A>, events: &mut Vec<PanelEvent>) {
    match empty_panel_status(session) {
        EmptyPanelStatus::Loading(model) => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(format!("Loading {model}..."));
            });
        }
        EmptyPanelStatus::Failed(reason) => {
            ui.colored_label(egui::Color32::LIGHT_RED, reason);
        }
        EmptyPanelStatus::Idle => {
            ui.label("No model loaded.");
        }
    }

    let models = empty_model_selector(session);
    if let Some(model) = draw_selector(ui, &models, &models.initial) {
        events.push(PanelEvent::SelectModel(model));
    }
}

/// Renders one binding. Widget ids are salted with the binding's generation so
/// nothing survives a rebuild.
fn draw_binding(
    ui: &mut egui::Ui,
    binding: &ControlPanelBinding,
    transform: &ModelTransform,
    active_preset: &str,
    events: &mut Vec<PanelEvent>,
) {
    ui.push_id(binding.generation(), |ui| {
        ui.heading(binding.model_name());
        let models = binding.model_selector();
        if let Some(model) = draw_selector(ui, models, &models.initial) {
            events.push(PanelEvent::SelectModel(model));
        }

        ui.horizontal(|ui| {
            if let Some(preset) = draw_selector(ui, binding.preset_selector(), active_preset) {
                events.push(PanelEvent::SelectPreset(preset));
            }
            if ui.button("Reset").clicked() {
                events.push(PanelEvent::SelectPreset(active_preset.to_string()));
            }
        });

        ui.separator();
        for folder in binding.folders() {
            egui::CollapsingHeader::new(folder.title)
                .default_open(true)
                .show(ui, |ui| {
                    for field in &folder.fields {
                        if let Some(value) = draw_field(ui, field, transform) {
                            events.push(PanelEvent::EditField(field.target, value));
                        }
                    }
                });
        }
    });
}

/// Returns the newly picked option, if the user picked a different one.
fn draw_selector(ui: &mut egui::Ui, selector: &Selector, current: &str) -> Option<String> {
    let mut picked = None;
    egui::ComboBox::from_label(selector.label)
        .selected_text(current)
        .show_ui(ui, |ui| {
            for option in &selector.options {
                let is_current = option == current;
                if ui.selectable_label(is_current, option.as_str()).clicked() && !is_current {
                    picked = Some(option.clone());
                }
            }
        });
    picked
}

fn draw_field(ui: &mut egui::Ui, field: &FieldBinding, transform: &ModelTransform) -> Option<f32> {
    let mut value = field.read(transform);
    let response = ui.add(
        egui::Slider::new(&mut value, field.range.clone())
            .text(field.label)
            .step_by(field.step as f64),
    );
    response.changed().then_some(value)
}
