//! Parametric Curve Editor Library.
//! Blend-Kurven und Constrained Profiles als Library exportiert für Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{
    AppCommand, AppController, AppIntent, AppState, CurveConstructionEngine, Document,
    DragSession, Feature, FeatureEdit, FeatureError, FeatureId, OutputMode, ParametricFeature,
    PickedElement, SceneRecorder, Viewport,
};
pub use core::{
    CurveReference, Edge, Face, GeometryResolver, ResolveError, Shape, ShapeStore,
    SubElementKind, SubElementLink, SubElementRef,
};
pub use shared::EditorOptions;
