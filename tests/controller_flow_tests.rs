use std::path::PathBuf;

use glam::DVec3;
use parametric_curve_editor::app::features::blend::EdgeSlot;
use parametric_curve_editor::app::features::{BlendEdit, Continuity};
use parametric_curve_editor::{
    AppCommand, AppController, AppIntent, AppState, Document, Edge, Feature, FeatureEdit,
    FeatureId, OutputMode, PickedElement, Shape, SubElementLink, SubElementRef, Viewport,
};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("pce_{}_{}.json", name, std::process::id()))
}

fn state_with_lines() -> AppState {
    let mut state = AppState::new();
    state.document.add_object(
        "A",
        Shape::from_edge(Edge::line(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0))),
    );
    state.document.add_object(
        "B",
        Shape::from_edge(Edge::line(
            DVec3::new(20.0, 10.0, 0.0),
            DVec3::new(20.0, 0.0, 0.0),
        )),
    );
    state
}

fn pick(object: &str, point: DVec3) -> PickedElement {
    PickedElement::new(SubElementLink::new(object, SubElementRef::edge(1)), Some(point))
}

fn create_blend(controller: &mut AppController, state: &mut AppState) -> FeatureId {
    controller
        .handle_intent(
            state,
            AppIntent::SelectionChanged {
                selection: vec![
                    pick("A", DVec3::new(9.0, 0.0, 0.0)),
                    pick("B", DVec3::new(20.0, 1.0, 0.0)),
                ],
            },
        )
        .expect("Auswahl sollte gesetzt werden");
    let index = state
        .commands
        .find("ParametricBlendCurve")
        .expect("Blend-Command sollte registriert sein");
    controller
        .handle_intent(state, AppIntent::FeatureCommandActivated { index })
        .expect("Blend-Command sollte laufen");
    let ids = state.document.feature_ids();
    assert_eq!(ids.len(), 1);
    ids[0]
}

#[test]
fn test_blend_command_creates_single_output() {
    let mut controller = AppController::new();
    let mut state = state_with_lines();
    let id = create_blend(&mut controller, &mut state);

    let blend = state
        .document
        .feature(id)
        .and_then(Feature::as_blend)
        .expect("Blend angelegt");
    assert_eq!(blend.output(), OutputMode::Single);
    assert_eq!(blend.continuity(EdgeSlot::Second), Continuity::G1);
    assert!(state.document.shapes.contains("Blend_Curve"));
    assert!(state.selection.is_empty());
    // Single blendet die Eingänge nicht aus
    assert!(state.viewport.is_visible("A"));
}

#[test]
fn test_output_wire_hides_inputs_and_single_shows_them() {
    let mut controller = AppController::new();
    let mut state = state_with_lines();
    let id = create_blend(&mut controller, &mut state);

    controller
        .handle_intent(
            &mut state,
            AppIntent::FeatureEditRequested {
                id,
                edit: FeatureEdit::Blend(BlendEdit::Output(OutputMode::Wire)),
            },
        )
        .expect("Output-Änderung sollte gelingen");
    assert!(!state.viewport.is_visible("A"));
    assert!(!state.viewport.is_visible("B"));

    controller
        .handle_intent(
            &mut state,
            AppIntent::FeatureEditRequested {
                id,
                edit: FeatureEdit::Blend(BlendEdit::Output(OutputMode::Single)),
            },
        )
        .expect("Output-Änderung sollte gelingen");
    assert!(state.viewport.is_visible("A"));
}

#[test]
fn test_relinked_edge_releases_previously_hidden_input() {
    let mut controller = AppController::new();
    let mut state = state_with_lines();
    state.document.add_object(
        "C",
        Shape::from_edge(Edge::line(
            DVec3::new(0.0, -5.0, 0.0),
            DVec3::new(10.0, -5.0, 0.0),
        )),
    );
    let id = create_blend(&mut controller, &mut state);

    for edit in [
        BlendEdit::Output(OutputMode::Wire),
        BlendEdit::Edge1(SubElementLink::new("C", SubElementRef::edge(1))),
    ] {
        controller
            .handle_intent(
                &mut state,
                AppIntent::FeatureEditRequested {
                    id,
                    edit: FeatureEdit::Blend(edit),
                },
            )
            .expect("Änderung sollte gelingen");
    }
    assert!(state.viewport.is_visible("A"), "alter Eingang wieder sichtbar");
    assert!(!state.viewport.is_visible("C"));
    assert!(!state.viewport.is_visible("B"));

    controller
        .handle_intent(
            &mut state,
            AppIntent::FeatureEditRequested {
                id,
                edit: FeatureEdit::Blend(BlendEdit::Output(OutputMode::Single)),
            },
        )
        .expect("Output-Änderung sollte gelingen");
    for object in ["A", "B", "C"] {
        assert!(state.viewport.is_visible(object), "{object} sollte sichtbar sein");
    }
    assert!(state.hidden_inputs.is_empty());
}

#[test]
fn test_deleting_wire_blend_shows_inputs_again() {
    let mut controller = AppController::new();
    let mut state = state_with_lines();
    let id = create_blend(&mut controller, &mut state);
    controller
        .handle_intent(
            &mut state,
            AppIntent::FeatureEditRequested {
                id,
                edit: FeatureEdit::Blend(BlendEdit::Output(OutputMode::Joined)),
            },
        )
        .expect("Output-Änderung sollte gelingen");
    assert!(!state.viewport.is_visible("A"));

    controller
        .handle_intent(&mut state, AppIntent::DeleteFeatureRequested { id })
        .expect("Löschen");
    assert!(state.viewport.is_visible("A"));
    assert!(state.viewport.is_visible("B"));
}

#[test]
fn test_double_click_drag_and_commit() {
    let mut controller = AppController::new();
    let mut state = state_with_lines();
    let id = create_blend(&mut controller, &mut state);

    controller
        .handle_intent(&mut state, AppIntent::FeatureDoubleClicked { id })
        .expect("Session sollte starten");
    assert!(state.is_editing());
    assert!(!state.viewport.is_selectable("Blend_Curve"));

    for intent in [
        AppIntent::DragStarted {
            position: DVec3::new(10.0, 0.0, 0.0),
        },
        AppIntent::DragUpdated {
            position: DVec3::new(7.0, 1.0, 0.0),
        },
        AppIntent::DragUpdated {
            position: DVec3::new(5.0, 1.0, 0.0),
        },
        AppIntent::DragEnded,
    ] {
        controller
            .handle_intent(&mut state, intent)
            .expect("Drag sollte verarbeitet werden");
    }
    // Dokument erst nach Commit geändert
    let before = state
        .document
        .feature(id)
        .and_then(Feature::as_blend)
        .map(|b| b.parameter(EdgeSlot::First));
    assert_eq!(before, Some(1.0));

    controller
        .handle_intent(&mut state, AppIntent::FeatureDoubleClicked { id })
        .expect("Commit sollte gelingen");
    assert!(!state.is_editing());
    assert!(state.viewport.is_selectable("Blend_Curve"));
    assert_eq!(state.viewport.node_count(), 0);
    let after = state
        .document
        .feature(id)
        .and_then(Feature::as_blend)
        .map(|b| b.parameter(EdgeSlot::First))
        .expect("Blend vorhanden");
    assert!((after - 0.5).abs() < 1e-9);

    let drag_updates = state
        .command_log
        .entries()
        .iter()
        .filter(|c| matches!(c, AppCommand::UpdateMarkerDrag { .. }))
        .count();
    assert_eq!(drag_updates, 1);
}

#[test]
fn test_cancel_restores_scene_without_touching_document() {
    let mut controller = AppController::new();
    let mut state = state_with_lines();
    let id = create_blend(&mut controller, &mut state);
    let before = state.document.shapes.get("Blend_Curve").cloned();

    controller
        .handle_intent(&mut state, AppIntent::FeatureDoubleClicked { id })
        .expect("Session sollte starten");
    controller
        .handle_intent(
            &mut state,
            AppIntent::DragStarted {
                position: DVec3::new(10.0, 0.0, 0.0),
            },
        )
        .expect("Drag-Start");
    controller
        .handle_intent(
            &mut state,
            AppIntent::DragUpdated {
                position: DVec3::new(3.0, 0.0, 0.0),
            },
        )
        .expect("Drag");
    controller
        .handle_intent(&mut state, AppIntent::EditCancelRequested)
        .expect("Abbruch");

    assert!(!state.is_editing());
    assert_eq!(state.viewport.node_count(), 0);
    assert!(state.viewport.is_selectable("A"));
    assert_eq!(state.document.shapes.get("Blend_Curve").cloned(), before);
}

#[test]
fn test_double_click_on_other_feature_while_editing_is_ignored() {
    let mut controller = AppController::new();
    let mut state = state_with_lines();
    let id = create_blend(&mut controller, &mut state);
    let index = state
        .commands
        .find("Constrained Profile")
        .expect("Profil-Command");
    controller
        .handle_intent(&mut state, AppIntent::FeatureCommandActivated { index })
        .expect("Profil-Command sollte laufen");
    let profile_id = state.document.find_by_label("Profile").expect("Profil angelegt");

    controller
        .handle_intent(&mut state, AppIntent::FeatureDoubleClicked { id })
        .expect("Session sollte starten");
    controller
        .handle_intent(&mut state, AppIntent::FeatureDoubleClicked { id: profile_id })
        .expect("Doppelklick wird ignoriert");

    let session = state.session.as_ref().expect("Session läuft weiter");
    assert_eq!(session.feature_id(), id);
}

#[test]
fn test_control_point_overlay_follows_and_is_removed_with_feature() {
    let mut controller = AppController::new();
    let mut state = state_with_lines();
    let id = create_blend(&mut controller, &mut state);

    controller
        .handle_intent(&mut state, AppIntent::ToggleControlPointsRequested { id })
        .expect("Overlay einblenden");
    assert_eq!(state.viewport.node_count(), 1);

    controller
        .handle_intent(
            &mut state,
            AppIntent::FeatureEditRequested {
                id,
                edit: FeatureEdit::Blend(BlendEdit::Continuity1(Continuity::G2)),
            },
        )
        .expect("Stetigkeit ändern");
    let handle = *state.overlays.get(&id).expect("Overlay vorhanden");
    match state.viewport.node(handle) {
        Some(parametric_curve_editor::app::editing::SceneNode::ControlPolygon { points }) => {
            assert_eq!(points.len(), 5)
        }
        other => panic!("Unerwarteter Overlay-Knoten: {other:?}"),
    }

    controller
        .handle_intent(&mut state, AppIntent::DeleteFeatureRequested { id })
        .expect("Löschen");
    assert_eq!(state.viewport.node_count(), 0);
    assert!(!state.document.shapes.contains("Blend_Curve"));
}

#[test]
fn test_open_and_save_roundtrip() {
    let mut controller = AppController::new();
    let mut state = state_with_lines();
    create_blend(&mut controller, &mut state);
    let path = temp_path("controller_roundtrip");

    controller
        .handle_intent(
            &mut state,
            AppIntent::SaveRequested {
                path: Some(path.clone()),
            },
        )
        .expect("Speichern sollte gelingen");

    let mut reopened = AppState::new();
    controller
        .handle_intent(&mut reopened, AppIntent::OpenRequested { path: path.clone() })
        .expect("Öffnen sollte gelingen");
    assert_eq!(reopened.feature_count(), 1);
    assert_eq!(reopened.document_path.as_deref(), Some(path.as_path()));
    assert!(reopened.document.shapes.contains("Blend_Curve"));
    let _ = std::fs::remove_file(&path);

    let missing: Result<Document, _> =
        Document::load_from_file(&temp_path("does_not_exist"), &reopened.options);
    assert!(missing.is_err());
}
