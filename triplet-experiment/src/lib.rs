pub mod config;
pub mod error;
pub mod presenter;
pub mod presets;
pub mod recorder;
pub mod sink;
pub mod state;
pub mod timeline;
pub mod trial;

pub use config::{ExperimentConfig, ExperimentKind};
pub use error::ExperimentError;
pub use presenter::{Presenter, ScriptedPresenter};
pub use presets::{Experiment, ExportTarget};
pub use sink::{MemorySink, RecordSink};
pub use state::ExperimentStateMachine;
pub use timeline::Timeline;
pub use trial::{FinishHook, Screen};
