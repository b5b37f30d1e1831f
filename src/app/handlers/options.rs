//! Handler für Optionsänderungen.

use crate::app::engine::CurveConstructionEngine;
use crate::app::AppState;
use crate::shared::EditorOptions;

/// Übernimmt neue Optionen; der Engine wird mit ihnen neu aufgebaut.
pub fn apply(state: &mut AppState, options: EditorOptions) {
    state.engine = CurveConstructionEngine::new(&options);
    state.options = options;
    log::info!("Optionen übernommen");
}
