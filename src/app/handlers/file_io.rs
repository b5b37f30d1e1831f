//! Handler für Datei-Operationen (Öffnen, Speichern).

use std::path::PathBuf;

use anyhow::bail;

use super::feature;
use crate::app::document::Document;
use crate::app::AppState;

/// Lädt ein Dokument, berechnet alle Features neu und gleicht die Szene ab.
pub fn load(state: &mut AppState, path: PathBuf) -> anyhow::Result<()> {
    let document = Document::load_from_file(&path, &state.options)?;

    for (_, handle) in state.overlays.drain(..) {
        state.viewport.remove_node(handle);
    }
    feature::release_all_inputs(state);
    state.document = document;
    state.document_path = Some(path);
    state.selection.clear();

    feature::recompute_all(state);
    Ok(())
}

/// Speichert das Dokument unter `path` oder dem bekannten Pfad.
pub fn save(state: &mut AppState, path: Option<PathBuf>) -> anyhow::Result<()> {
    let Some(path) = path.or_else(|| state.document_path.clone()) else {
        bail!("Kein Speicherpfad bekannt");
    };
    state.document.save_to_file(&path)?;
    state.status_message = Some(format!("Gespeichert: {}", path.display()));
    state.document_path = Some(path);
    Ok(())
}
