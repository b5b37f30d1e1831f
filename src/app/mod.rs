//! Application-Layer: Controller, State, Events, Features und Edit-Session.

pub mod command_log;
pub mod controller;
pub mod document;
pub mod editing;
pub mod engine;
pub mod events;
pub mod feature_commands;
pub mod features;
pub mod handlers;
mod intent_mapping;
/// Application State
///
/// Dieses Modul verwaltet den Zustand der Anwendung (Dokument, Session, Szene).
pub mod state;

pub use command_log::CommandLog;
pub use controller::AppController;
pub use document::{Document, FeatureEntry, FeatureId};
pub use editing::{DragSession, SceneRecorder, Viewport};
pub use engine::{CurveConstructionEngine, OutputMode};
pub use events::{AppCommand, AppIntent};
pub use feature_commands::{CommandRegistry, FeatureCommand, PickedElement};
pub use features::{Feature, FeatureEdit, FeatureError, ParametricFeature};
pub use state::AppState;
