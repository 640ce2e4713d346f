use thiserror::Error;
use triplet_core::CoreError;

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("config error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("screen {index} scores responses but has no trial definition")]
    MissingDefinition { index: usize },

    #[error("screen {index} moves the timeline back from {from:?} to {to:?}")]
    PhaseOrder {
        index: usize,
        from: triplet_core::StandardPhase,
        to: triplet_core::StandardPhase,
    },

    #[error("invalid experiment layout: {0}")]
    Layout(String),

    #[error("presenter failed: {0}")]
    Presenter(String),

    #[error("no scripted response left for screen {index}")]
    ScriptExhausted { index: usize },
}

impl From<figment::Error> for ExperimentError {
    fn from(err: figment::Error) -> Self {
        ExperimentError::Config(Box::new(err))
    }
}
