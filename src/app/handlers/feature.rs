//! Handler für Feature-Commands, Feldänderungen und Overlays.

use anyhow::Context;

use crate::app::document::FeatureId;
use crate::app::editing::SceneNode;
use crate::app::feature_commands::PickedElement;
use crate::app::features::{Feature, FeatureEdit, FeatureField, ParametricFeature};
use crate::app::AppState;

/// Ersetzt die geordnete Auswahl.
pub fn set_selection(state: &mut AppState, selection: Vec<PickedElement>) {
    state.selection = selection;
}

/// Führt einen Feature-Command mit der aktuellen Auswahl aus.
pub fn activate_command(state: &mut AppState, index: usize) -> anyhow::Result<()> {
    let command = state
        .commands
        .get(index)
        .with_context(|| format!("Feature-Command {} unbekannt", index))?;
    if !command.is_active(&state.document, &state.selection) {
        log::warn!(
            "{} mit der aktuellen Auswahl nicht ausführbar",
            command.resources().menu_text
        );
        return Ok(());
    }
    let created = command.activated(
        &mut state.document,
        &state.selection,
        &state.engine,
        &state.options,
    )?;
    for id in &created {
        sync_visibility(state, *id);
    }
    state.status_message = Some(format!("{} Feature(s) angelegt", created.len()));
    state.selection.clear();
    Ok(())
}

/// Ändert ein Feld und gleicht Sichtbarkeit und Overlay ab.
pub fn edit(state: &mut AppState, id: FeatureId, edit: FeatureEdit) -> anyhow::Result<()> {
    let event = state.document.apply_edit(id, edit, &state.engine)?;
    if matches!(
        event.field,
        FeatureField::Output | FeatureField::Edge1 | FeatureField::Edge2
    ) {
        sync_visibility(state, id);
    }
    refresh_overlay(state, id);
    Ok(())
}

/// Blendet das Kontrollpolygon eines Blends ein oder aus.
pub fn toggle_control_points(state: &mut AppState, id: FeatureId) {
    if let Some(handle) = state.overlays.shift_remove(&id) {
        state.viewport.remove_node(handle);
        return;
    }
    let Some(blend) = state.document.feature(id).and_then(Feature::as_blend) else {
        log::warn!("Kontrollpolygon nur für Blend-Kurven verfügbar");
        return;
    };
    let handle = state.viewport.add_node(SceneNode::ControlPolygon {
        points: blend.curve_pts().to_vec(),
    });
    state.overlays.insert(id, handle);
}

/// Entfernt ein Feature samt Ergebnis, Overlay und Eingangs-Ausblendung.
pub fn delete(state: &mut AppState, id: FeatureId) {
    if state.session.as_ref().is_some_and(|s| s.feature_id() == id) {
        super::editing::cancel_session(state);
    }
    if let Some(handle) = state.overlays.shift_remove(&id) {
        state.viewport.remove_node(handle);
    }
    release_inputs(state, id);
    if state.document.remove_feature(id).is_none() {
        log::warn!("Feature {:?} nicht gefunden", id);
    }
}

/// Berechnet alle Features neu und gleicht die Szene ab.
pub fn recompute_all(state: &mut AppState) {
    let failed = state.document.recompute_all(&state.engine);
    for id in state.document.feature_ids() {
        sync_visibility(state, id);
        refresh_overlay(state, id);
    }
    state.status_message = Some(if failed == 0 {
        format!("{} Feature(s) berechnet", state.document.feature_count())
    } else {
        format!("{} Feature(s) fehlgeschlagen", failed)
    });
}

/// Eingänge eines Blends sind ausgeblendet, solange die Ausgabe sie enthält.
///
/// Zuvor von diesem Feature ausgeblendete Objekte werden erst freigegeben,
/// damit auch nach einem Wechsel von Edge1/Edge2 nichts verborgen bleibt.
pub(crate) fn sync_visibility(state: &mut AppState, id: FeatureId) {
    release_inputs(state, id);
    let Some(Feature::Blend(blend)) = state.document.feature(id) else {
        return;
    };
    if !blend.output().subsumes_inputs() {
        return;
    }
    let objects = blend.input_objects();
    for object in &objects {
        state.viewport.set_visibility(object, false);
    }
    state.hidden_inputs.insert(id, objects);
}

/// Blendet die von `id` verborgenen Objekte wieder ein, sofern kein
/// anderes Feature sie noch beansprucht.
fn release_inputs(state: &mut AppState, id: FeatureId) {
    let Some(objects) = state.hidden_inputs.shift_remove(&id) else {
        return;
    };
    for object in objects {
        let claimed = state.hidden_inputs.values().any(|o| o.contains(&object));
        if !claimed {
            state.viewport.set_visibility(&object, true);
        }
    }
}

/// Gibt alle verborgenen Eingänge frei (Dokumentwechsel).
pub(crate) fn release_all_inputs(state: &mut AppState) {
    for (_, objects) in state.hidden_inputs.drain(..) {
        for object in objects {
            state.viewport.set_visibility(&object, true);
        }
    }
}

/// Zieht ein eingeblendetes Kontrollpolygon auf die aktuellen Pole nach.
pub(crate) fn refresh_overlay(state: &mut AppState, id: FeatureId) {
    let Some(handle) = state.overlays.get(&id).copied() else {
        return;
    };
    if let Some(blend) = state.document.feature(id).and_then(Feature::as_blend) {
        state.viewport.update_node(
            handle,
            SceneNode::ControlPolygon {
                points: blend.curve_pts().to_vec(),
            },
        );
    }
}
