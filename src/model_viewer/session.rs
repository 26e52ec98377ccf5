use crate::model_viewer::DEFAULT_PRESET;
use crate::model_viewer::catalog::{ModelTransform, ViewerCatalog};
use crate::model_viewer::error::{AssetLoadError, SessionError};
use crate::model_viewer::loader::{LoadCompletion, LoadTicket, ModelLoader};
use crate::model_viewer::panel::{ControlPanelBinding, PanelEvent, TransformField};
use tracing::{debug, error, info, warn};

/// The one model on screen, with its live transform and loaded asset.
#[derive(Debug)]
pub struct DisplayedModel<A> {
    name: String,
    transform: ModelTransform,
    asset: A,
}

impl<A> DisplayedModel<A> {
    fn new(name: String, asset: A) -> Self {
        Self {
            name,
            transform: ModelTransform::default(),
            asset,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> &ModelTransform {
        &self.transform
    }

    pub fn asset(&self) -> &A {
        &self.asset
    }
}

/// Overwrites the whole live transform with `preset` in a single write.
pub fn apply_preset<A>(model: &mut DisplayedModel<A>, preset: &ModelTransform) {
    model.transform = *preset;
}

#[derive(Debug)]
enum SessionState<A> {
    Empty,
    Displaying(DisplayedModel<A>),
}

#[derive(Debug)]
pub enum LoadOutcome<A> {
    /// The request was current and its model is now displayed. `replaced` is the
    /// previous model; its scene resources must be released by the caller.
    Displayed {
        model: String,
        replaced: Option<DisplayedModel<A>>,
    },
    /// A newer request was issued before this one finished. Its asset was dropped.
    Superseded(LoadTicket),
    /// The current request failed. Whatever was displayed stays displayed.
    Failed(AssetLoadError),
}

/// Owns "what is displayed now" and sequences loader, applier and panel rebuild.
///
/// Loads complete out of band, so every request is tagged with a sequence number
/// and only the result of the latest request is ever accepted.
#[derive(Debug)]
pub struct ViewerSession<A> {
    catalog: ViewerCatalog,
    state: SessionState<A>,
    panel: Option<ControlPanelBinding>,
    panel_generation: u64,
    latest_seq: u64,
    pending: Option<LoadTicket>,
    active_preset: String,
    last_error: Option<AssetLoadError>,
}

impl<A> ViewerSession<A> {
    pub fn new(catalog: ViewerCatalog) -> Self {
        Self {
            catalog,
            state: SessionState::Empty,
            panel: None,
            panel_generation: 0,
            latest_seq: 0,
            pending: None,
            active_preset: DEFAULT_PRESET.to_string(),
            last_error: None,
        }
    }

    pub fn catalog(&self) -> &ViewerCatalog {
        &self.catalog
    }

    pub fn displayed(&self) -> Option<&DisplayedModel<A>> {
        match &self.state {
            SessionState::Empty => None,
            SessionState::Displaying(model) => Some(model),
        }
    }

    pub fn displayed_name(&self) -> Option<&str> {
        self.displayed().map(DisplayedModel::name)
    }

    pub fn panel(&self) -> Option<&ControlPanelBinding> {
        self.panel.as_ref()
    }

    /// The latest request, while it has not completed.
    pub fn pending(&self) -> Option<&LoadTicket> {
        self.pending.as_ref()
    }

    pub fn active_preset(&self) -> &str {
        &self.active_preset
    }

    pub fn last_error(&self) -> Option<&AssetLoadError> {
        self.last_error.as_ref()
    }

    /// Asks `loader` for `model`. Any request still in flight is superseded.
    pub fn select_model<L>(&mut self, model: &str, loader: &mut L) -> Result<LoadTicket, SessionError>
    where
        L: ModelLoader<Asset = A>,
    {
        let Some(path) = self.catalog.assets().path(model) else {
            return Err(SessionError::UnknownModel(model.to_string()));
        };

        self.latest_seq += 1;
        let ticket = LoadTicket {
            seq: self.latest_seq,
            model: model.to_string(),
            path: path.to_string(),
        };
        if let Some(stale) = self.pending.replace(ticket.clone()) {
            debug!(seq = stale.seq, model = %stale.model, "load superseded before completion");
        }
        info!(seq = ticket.seq, model = %ticket.model, path = %ticket.path, "model load requested");
        loader.start(ticket.clone());
        Ok(ticket)
    }

    pub fn poll_loads<L>(&mut self, loader: &mut L) -> Vec<LoadOutcome<A>>
    where
        L: ModelLoader<Asset = A>,
    {
        loader
            .poll_completed()
            .into_iter()
            .map(|completion| self.finish_load(completion))
            .collect()
    }

    pub fn finish_load(&mut self, completion: LoadCompletion<A>) -> LoadOutcome<A> {
        let LoadCompletion { ticket, result } = completion;

        if ticket.seq != self.latest_seq {
            debug!(seq = ticket.seq, latest = self.latest_seq, model = %ticket.model, "discarding stale load");
            drop(result);
            return LoadOutcome::Superseded(ticket);
        }
        self.pending = None;

        let asset = match result {
            Ok(asset) => asset,
            Err(err) => return self.reject_load(&ticket, err),
        };

        let Some(default) = self.catalog.presets().default_for(&ticket.model) else {
            // Unreachable with a validated catalog.
            let err = AssetLoadError {
                path: ticket.path.clone(),
                cause: format!("model '{}' has no {DEFAULT_PRESET} preset", ticket.model),
            };
            return self.reject_load(&ticket, err);
        };

        let mut model = DisplayedModel::new(ticket.model.clone(), asset);
        apply_preset(&mut model, &default);

        let replaced = match std::mem::replace(&mut self.state, SessionState::Displaying(model)) {
            SessionState::Empty => None,
            SessionState::Displaying(previous) => Some(previous),
        };
        self.active_preset = DEFAULT_PRESET.to_string();
        self.last_error = None;
        self.rebuild_panel(&ticket.model);

        info!(
            seq = ticket.seq,
            model = %ticket.model,
            replaced = replaced.as_ref().map(DisplayedModel::name).unwrap_or("none"),
            "model displayed"
        );
        LoadOutcome::Displayed {
            model: ticket.model,
            replaced,
        }
    }

    /// Applies a named preset of the displayed model. Returns `Ok(false)` when
    /// nothing is displayed.
    pub fn select_preset(&mut self, preset: &str) -> Result<bool, SessionError> {
        let SessionState::Displaying(model) = &mut self.state else {
            return Ok(false);
        };
        let Some(transform) = self.catalog.presets().preset(&model.name, preset) else {
            return Err(SessionError::UnknownPreset {
                model: model.name.clone(),
                preset: preset.to_string(),
            });
        };

        apply_preset(model, &transform);
        self.active_preset = preset.to_string();
        info!(model = %model.name, preset, "preset applied");
        Ok(true)
    }

    /// Writes one bound field of the live transform. Returns whether anything changed.
    pub fn edit_field(&mut self, field: TransformField, value: f32) -> bool {
        let SessionState::Displaying(model) = &mut self.state else {
            return false;
        };
        if !value.is_finite() {
            warn!(?field, value, "ignoring non-finite field value");
            return false;
        }
        field.set(&mut model.transform, value);
        true
    }

    pub fn handle_panel_event<L>(&mut self, event: PanelEvent, loader: &mut L) -> Result<(), SessionError>
    where
        L: ModelLoader<Asset = A>,
    {
        match event {
            PanelEvent::SelectModel(model) => self.select_model(&model, loader).map(|_| ()),
            PanelEvent::SelectPreset(preset) => self.select_preset(&preset).map(|_| ()),
            PanelEvent::EditField(field, value) => {
                self.edit_field(field, value);
                Ok(())
            }
        }
    }

    /// Records a failed current load. Whatever is displayed stays displayed.
    fn reject_load(&mut self, ticket: &LoadTicket, err: AssetLoadError) -> LoadOutcome<A> {
        error!(seq = ticket.seq, model = %ticket.model, path = %err.path, "model load failed: {}", err.cause);
        self.last_error = Some(err.clone());
        LoadOutcome::Failed(err)
    }

    fn rebuild_panel(&mut self, model_name: &str) {
        // Drop the old binding before the new one exists.
        self.panel = None;
        self.panel_generation += 1;
        self.panel = Some(ControlPanelBinding::build(
            self.panel_generation,
            model_name,
            &self.catalog,
        ));
    }
}
