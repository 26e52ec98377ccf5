use std::path::PathBuf;
use thiserror::Error;

/// A model asset could not be fetched or instantiated.
///
/// Recovered locally: the session keeps whatever it was displaying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load '{path}': {cause}")]
pub struct AssetLoadError {
    pub path: String,
    pub cause: String,
}

/// Startup invariant violations in the model/preset tables. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("failed to read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
    #[error("catalog has no models")]
    EmptyCatalog,
    #[error("model '{0}' is listed more than once")]
    DuplicateModel(String),
    #[error("model '{model}' defines preset '{preset}' more than once")]
    DuplicatePreset { model: String, preset: String },
    #[error("presets are defined for '{0}', which has no asset entry")]
    UnknownPresetModel(String),
    #[error("model '{0}' has no \"Default\" preset")]
    MissingDefaultPreset(String),
    #[error("preset '{preset}' of model '{model}' has a non-finite component")]
    NonFiniteTransform { model: String, preset: String },
}

/// Requests the session refuses because they name something outside the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("unknown model '{0}'")]
    UnknownModel(String),
    #[error("model '{model}' has no preset '{preset}'")]
    UnknownPreset { model: String, preset: String },
}
