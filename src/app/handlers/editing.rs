//! Handler für die interaktive Edit-Session.

use glam::DVec3;

use super::feature;
use crate::app::document::FeatureId;
use crate::app::editing::{DragOutcome, DragSession};
use crate::app::AppState;

/// Startet eine Edit-Session (Idle → Editing).
pub fn begin_session(state: &mut AppState, id: FeatureId) -> anyhow::Result<()> {
    if state.session.is_some() {
        log::warn!("Es läuft bereits eine Edit-Session");
        return Ok(());
    }
    let session = DragSession::begin(
        &state.document,
        id,
        &state.options,
        &state.engine,
        state.viewport.as_mut(),
    )?;
    state.status_message = Some(format!("Bearbeite {}", session.label()));
    state.session = Some(session);
    Ok(())
}

/// Übernimmt die Session ins Dokument (Editing → Idle).
pub fn commit_session(state: &mut AppState) -> anyhow::Result<()> {
    let Some(session) = state.session.take() else {
        return Ok(());
    };
    let id = session.feature_id();
    let ok = session.commit(&mut state.document, state.viewport.as_mut())?;
    feature::sync_visibility(state, id);
    feature::refresh_overlay(state, id);
    if !ok {
        state.status_message = Some("Übernommen, Neuberechnung fehlgeschlagen".to_string());
    } else {
        state.status_message = None;
    }
    Ok(())
}

/// Verwirft die Session (Editing → Idle).
pub fn cancel_session(state: &mut AppState) {
    if let Some(session) = state.session.take() {
        session.cancel(state.viewport.as_mut());
        state.status_message = None;
    }
}

pub fn begin_drag(state: &mut AppState, position: DVec3) {
    if let Some(session) = state.session.as_mut() {
        if !session.begin_drag(position) {
            log::debug!("Kein Marker bei {:?}", position);
        }
    }
}

pub fn update_drag(state: &mut AppState, position: DVec3) {
    let Some(session) = state.session.as_mut() else {
        return;
    };
    if session.drag_to(&state.document, position, state.viewport.as_mut()) == DragOutcome::Rejected
    {
        log::debug!("Drag nach {:?} verworfen", position);
    }
}

pub fn end_drag(state: &mut AppState) {
    if let Some(session) = state.session.as_mut() {
        session.end_drag();
    }
}

pub fn delete_marker(state: &mut AppState, position: DVec3) {
    if let Some(session) = state.session.as_mut() {
        session.delete_marker(&state.document, position, state.viewport.as_mut());
    }
}

pub fn detach_marker(state: &mut AppState, position: DVec3) {
    if let Some(session) = state.session.as_mut() {
        session.detach_support(&state.document, position);
    }
}
