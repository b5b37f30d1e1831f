use super::*;
use crate::app::engine::{CurveConstructionEngine, OutputMode};
use crate::app::features::{FeatureError, ParametricFeature, RecomputeContext};
use crate::core::{Edge, GeometryResolver, Shape, ShapeStore, SubElementLink, SubElementRef};
use crate::shared::{EditorOptions, SCALE_EPSILON};
use glam::DVec3;

fn store() -> ShapeStore {
    let mut store = ShapeStore::new();
    store.insert(
        "Line",
        Shape::from_edge(Edge::line(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0))),
    );
    store.insert(
        "Line001",
        Shape::from_edge(Edge::line(
            DVec3::new(20.0, 10.0, 0.0),
            DVec3::new(20.0, 0.0, 0.0),
        )),
    );
    store
}

fn feature() -> BlendFeature {
    BlendFeature::new(
        SubElementLink::new("Line", SubElementRef::edge(1)),
        SubElementLink::new("Line001", SubElementRef::edge(1)),
        &EditorOptions::default(),
    )
}

#[test]
fn test_scale_zero_becomes_epsilon() {
    let mut f = feature();
    f.set(BlendEdit::Scale1(0.0));
    f.set(BlendEdit::Scale2(-0.0));
    assert_eq!(f.scale(EdgeSlot::First), SCALE_EPSILON);
    assert_eq!(f.scale(EdgeSlot::Second), SCALE_EPSILON);
}

#[test]
fn test_scale_zero_uses_configured_epsilon() {
    let options = EditorOptions {
        scale_epsilon: 0.02,
        ..EditorOptions::default()
    };
    let mut f = BlendFeature::new(
        SubElementLink::new("Line", SubElementRef::edge(1)),
        SubElementLink::new("Line001", SubElementRef::edge(1)),
        &options,
    );
    f.set(BlendEdit::Scale1(0.0));
    assert_eq!(f.scale(EdgeSlot::First), 0.02);

    // Nach dem Laden greift wieder der Wert der Optionen
    let json = serde_json::to_string(&f).expect("serialisierbar");
    let mut restored: BlendFeature = serde_json::from_str(&json).expect("lesbar");
    restored.on_restored(&options);
    restored.set(BlendEdit::Scale2(0.0));
    assert_eq!(restored.scale(EdgeSlot::Second), 0.02);
}

#[test]
fn test_degree_and_parameter_clamps() {
    let mut f = feature();
    f.set(BlendEdit::DegreeMax(15));
    assert_eq!(f.degree_max(), 9);
    f.set(BlendEdit::DegreeMax(0));
    assert_eq!(f.degree_max(), 1);
    f.set(BlendEdit::Parameter1(1.5));
    f.set(BlendEdit::Parameter2(-0.5));
    assert_eq!(f.parameter(EdgeSlot::First), 1.0);
    assert_eq!(f.parameter(EdgeSlot::Second), 0.0);
    f.set(BlendEdit::Scale1(12.0));
    assert_eq!(f.scale(EdgeSlot::First), 5.0);
}

#[test]
fn test_validate_is_pure() {
    let f = feature();
    assert_eq!(f.validate(BlendEdit::Scale1(0.0)), BlendEdit::Scale1(SCALE_EPSILON));
    assert_eq!(f.scale(EdgeSlot::First), 1.0);
}

#[test]
fn test_recompute_is_idempotent() {
    let store = store();
    let engine = CurveConstructionEngine::default();
    let ctx = RecomputeContext::new(GeometryResolver::new(&store), &engine);
    let mut f = feature();
    f.set(BlendEdit::Continuity1(Continuity::G2));
    f.set(BlendEdit::Continuity2(Continuity::G1));
    f.execute(&ctx).expect("erste Berechnung");
    let first = f.curve_pts().to_vec();
    f.execute(&ctx).expect("zweite Berechnung");
    assert_eq!(first.len(), 5);
    assert_eq!(
        first.iter().map(|p| p.to_array()).collect::<Vec<_>>(),
        f.curve_pts().iter().map(|p| p.to_array()).collect::<Vec<_>>()
    );
}

#[test]
fn test_failed_recompute_keeps_cache() {
    let mut store = store();
    let engine = CurveConstructionEngine::default();
    let mut f = feature();
    {
        let ctx = RecomputeContext::new(GeometryResolver::new(&store), &engine);
        f.execute(&ctx).expect("Berechnung");
    }
    let cached = f.curve_pts().to_vec();
    store.remove("Line001");
    let ctx = RecomputeContext::new(GeometryResolver::new(&store), &engine);
    let result = f.apply(BlendEdit::Parameter1(0.5), &ctx);
    assert!(matches!(result, Err(FeatureError::ReferenceResolution(_))));
    assert_eq!(f.curve_pts(), cached.as_slice());
    assert!(f.shape().is_some());
}

#[test]
fn test_degree_too_low_is_construction_failure() {
    let store = store();
    let engine = CurveConstructionEngine::default();
    let ctx = RecomputeContext::new(GeometryResolver::new(&store), &engine);
    let mut f = feature();
    f.set(BlendEdit::Continuity1(Continuity::G2));
    f.set(BlendEdit::Continuity2(Continuity::G2));
    let result = f.apply(BlendEdit::DegreeMax(4), &ctx);
    assert!(matches!(result, Err(FeatureError::Construction(_))));
    assert!(f.curve_pts().is_empty());
}

#[test]
fn test_output_mode_shapes() {
    let store = store();
    let engine = CurveConstructionEngine::default();
    let ctx = RecomputeContext::new(GeometryResolver::new(&store), &engine);
    let mut f = feature();
    f.apply(BlendEdit::Output(OutputMode::Wire), &ctx).expect("Wire");
    assert_eq!(f.shape().map(|s| s.edges.len()), Some(3));
    f.apply(BlendEdit::Output(OutputMode::Joined), &ctx).expect("Joined");
    assert_eq!(f.shape().map(|s| s.edges.len()), Some(1));
    f.apply(BlendEdit::Output(OutputMode::Single), &ctx).expect("Single");
    let single = f.shape().expect("Shape vorhanden");
    assert_eq!(single.edges.len(), 1);
    assert_eq!(single.edges[0].curve.poles(), f.curve_pts());
}

#[test]
fn test_restore_reattaches_ranges_and_keeps_values() {
    let mut f = feature();
    f.set(BlendEdit::Scale1(-2.5));
    f.set(BlendEdit::Parameter2(0.3));
    let json = serde_json::to_string(&f).expect("serialisierbar");
    assert!(json.contains("\"Scale1\":-2.5"));
    assert!(json.contains("\"Edge1\":\"Line:Edge1\""));

    let mut restored: BlendFeature = serde_json::from_str(&json).expect("ladbar");
    assert!(!restored.scale_field(EdgeSlot::First).is_bounded());
    restored.on_restored(&EditorOptions::default());
    let field = restored.scale_field(EdgeSlot::First);
    assert_eq!(field.value(), -2.5);
    assert_eq!((field.min(), field.max(), field.step()), (-5.0, 5.0, 0.05));
    assert_eq!(restored.parameter(EdgeSlot::Second), 0.3);
    restored.set(BlendEdit::Scale1(-9.0));
    assert_eq!(restored.scale(EdgeSlot::First), -5.0);
}
