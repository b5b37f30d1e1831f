use super::*;
use crate::app::engine::CurveConstructionEngine;
use crate::app::features::{FeatureError, ParametricFeature, RecomputeContext};
use crate::core::{Edge, GeometryResolver, Shape, ShapeStore, SubElementLink, SubElementRef};
use crate::shared::EditorOptions;
use approx::assert_relative_eq;
use glam::DVec3;

fn store() -> ShapeStore {
    let mut store = ShapeStore::new();
    store.insert(
        "Rail",
        Shape::from_edge(Edge::line(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0))),
    );
    store.insert(
        "Post",
        Shape::from_edge(Edge::line(
            DVec3::new(0.0, 5.0, 0.0),
            DVec3::new(0.0, 5.0, 10.0),
        )),
    );
    store
}

fn free_profile(points: Vec<DVec3>) -> ProfileFeature {
    let count = points.len();
    ProfileFeature::new(
        Vec::new(),
        points,
        vec![DataType::Free; count],
        &EditorOptions::default(),
    )
}

#[test]
fn test_interpolation_through_free_points() {
    let store = store();
    let engine = CurveConstructionEngine::default();
    let ctx = RecomputeContext::new(GeometryResolver::new(&store), &engine);
    let points = vec![DVec3::ZERO, DVec3::new(1.0, 1.0, 0.0), DVec3::new(2.0, 0.0, 0.0)];
    let mut profile = free_profile(points.clone());
    profile.execute(&ctx).expect("Interpolation sollte gelingen");

    let shape = profile.shape().expect("Shape vorhanden");
    let curve = &shape.edges[0].curve;
    for p in &points {
        assert!(curve.closest_point(*p, curve.domain()).distance < 1e-5);
    }
    assert!(!curve.is_closed());
    let poles = curve.poles();
    assert!(poles[0].distance(poles[poles.len() - 1]) > 1e-6);
}

#[test]
fn test_length_mismatch_keeps_previous_shape() {
    let store = store();
    let engine = CurveConstructionEngine::default();
    let ctx = RecomputeContext::new(GeometryResolver::new(&store), &engine);
    let mut profile = free_profile(vec![DVec3::ZERO, DVec3::X]);
    profile.execute(&ctx).expect("Startzustand");
    let before = profile.shape().cloned();

    profile.set(ProfileEdit::Data(vec![DVec3::ZERO, DVec3::X, DVec3::Y]));
    let result = profile.apply(
        ProfileEdit::DataType(vec![DataType::Free, DataType::Free]),
        &ctx,
    );
    assert_eq!(
        result.err(),
        Some(FeatureError::DataShapeMismatch { data: 3, types: 2 })
    );
    assert_eq!(profile.shape().cloned(), before);
}

#[test]
fn test_more_constrained_points_than_supports() {
    let mut profile = free_profile(vec![DVec3::ZERO, DVec3::X]);
    profile.set(ProfileEdit::DataType(vec![DataType::OnSupport, DataType::Free]));
    assert_eq!(
        profile.check_shape().err(),
        Some(FeatureError::SupportOverflow {
            constrained: 1,
            supports: 0
        })
    );
}

#[test]
fn test_support_change_reprojects_constrained_points() {
    let store = store();
    let engine = CurveConstructionEngine::default();
    let ctx = RecomputeContext::new(GeometryResolver::new(&store), &engine);
    let rail = SubElementLink::new("Rail", SubElementRef::edge(1));
    let post = SubElementLink::new("Post", SubElementRef::edge(1));
    let mut profile = ProfileFeature::from_selection(
        vec![rail],
        vec![DVec3::new(4.0, 0.0, 0.0)],
        &EditorOptions::default(),
    );
    profile.set(ProfileEdit::Data(vec![
        DVec3::new(4.0, 0.0, 0.0),
        DVec3::new(8.0, 3.0, 0.0),
    ]));
    profile.set(ProfileEdit::DataType(vec![DataType::OnSupport, DataType::Free]));

    profile
        .apply(ProfileEdit::Support(vec![post]), &ctx)
        .expect("Stützwechsel sollte gelingen");

    // Gebundener Punkt liegt jetzt auf dem Pfosten, freier Punkt unverändert
    assert_relative_eq!(profile.data()[0].x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(profile.data()[0].y, 5.0, epsilon = 1e-9);
    assert_eq!(profile.data()[1], DVec3::new(8.0, 3.0, 0.0));
    assert_eq!(profile.data().len(), 2);
    assert!(profile.shape().is_some());
}

#[test]
fn test_invalid_tolerance_keeps_previous() {
    let mut profile = free_profile(vec![DVec3::ZERO, DVec3::X]);
    let before = profile.tolerance();
    profile.set(ProfileEdit::Tolerance(0.0));
    assert_eq!(profile.tolerance(), before);
    profile.set(ProfileEdit::Tolerance(-1.0));
    assert_eq!(profile.tolerance(), before);
    profile.set(ProfileEdit::Tolerance(1e-3));
    assert_eq!(profile.tolerance(), 1e-3);
}

#[test]
fn test_default_profile_without_picks() {
    let profile = ProfileFeature::from_selection(Vec::new(), Vec::new(), &EditorOptions::default());
    assert_eq!(profile.data(), &[DVec3::ZERO, DVec3::X]);
    assert_eq!(profile.data_type(), &[DataType::Free, DataType::Free]);
    assert!(profile.support().is_empty());
}

#[test]
fn test_record_uses_numeric_data_types() {
    let profile = ProfileFeature::from_selection(
        vec![SubElementLink::new("Rail", SubElementRef::edge(1))],
        vec![DVec3::new(2.0, 0.0, 0.0)],
        &EditorOptions::default(),
    );
    let json = serde_json::to_string(&profile).expect("serialisierbar");
    assert!(json.contains("\"DataType\":[1]"));
    assert!(json.contains("\"Support\":[\"Rail:Edge1\"]"));
    assert!(serde_json::from_str::<ProfileFeature>(&json.replace("[1]", "[7]")).is_err());
}

#[test]
fn test_periodic_needs_three_points() {
    let store = store();
    let engine = CurveConstructionEngine::default();
    let ctx = RecomputeContext::new(GeometryResolver::new(&store), &engine);
    let mut profile = free_profile(vec![DVec3::ZERO, DVec3::X]);
    assert!(matches!(
        profile.apply(ProfileEdit::Periodic(true), &ctx),
        Err(FeatureError::Construction(_))
    ));
    assert!(profile.shape().is_none());
}

fn profile_on_rail() -> ProfileFeature {
    ProfileFeature::new(
        vec![SubElementLink::new("Rail", SubElementRef::edge(1))],
        vec![
            DVec3::new(0.0, 0.0, -5.0),
            DVec3::new(5.0, 2.0, 0.0),
            DVec3::new(10.0, 0.0, 5.0),
        ],
        vec![DataType::Free, DataType::OnSupport, DataType::Free],
        &EditorOptions::default(),
    )
}

#[test]
fn test_recompute_follows_moved_support() {
    let engine = CurveConstructionEngine::default();
    let mut store = store();
    let mut profile = profile_on_rail();
    {
        let ctx = RecomputeContext::new(GeometryResolver::new(&store), &engine);
        profile.execute(&ctx).expect("Startzustand");
    }

    // Stütze wird stromaufwärts verschoben, die Liste bleibt gleich
    store.insert(
        "Rail",
        Shape::from_edge(Edge::line(
            DVec3::new(0.0, 3.0, 0.0),
            DVec3::new(10.0, 3.0, 0.0),
        )),
    );
    let ctx = RecomputeContext::new(GeometryResolver::new(&store), &engine);
    profile.execute(&ctx).expect("Neuberechnung sollte gelingen");

    let curve = &profile.shape().expect("Shape vorhanden").edges[0].curve;
    let footpoint = curve.closest_point(DVec3::new(5.0, 3.0, 0.0), curve.domain());
    assert!(footpoint.distance < 1e-5);
    // Gespeicherte Daten bleiben unverändert
    assert_eq!(profile.data()[1], DVec3::new(5.0, 2.0, 0.0));
}

#[test]
fn test_recompute_with_vanished_support_keeps_shape() {
    let engine = CurveConstructionEngine::default();
    let mut store = store();
    let mut profile = profile_on_rail();
    {
        let ctx = RecomputeContext::new(GeometryResolver::new(&store), &engine);
        profile.execute(&ctx).expect("Startzustand");
    }
    let before = profile.shape().cloned();

    store.remove("Rail");
    let ctx = RecomputeContext::new(GeometryResolver::new(&store), &engine);
    assert!(matches!(
        profile.execute(&ctx),
        Err(FeatureError::ReferenceResolution(_))
    ));
    assert_eq!(profile.shape().cloned(), before);
}
