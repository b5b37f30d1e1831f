use std::path::PathBuf;

use glam::DVec3;

use crate::app::document::FeatureId;
use crate::app::feature_commands::PickedElement;
use crate::app::features::FeatureEdit;
use crate::shared::EditorOptions;

/// App-Intent und App-Command Events.
/// Intents sind Eingaben aus UI/System ohne direkte Mutationslogik.
#[derive(Debug, Clone)]
pub enum AppIntent {
    /// Dokument öffnen
    OpenRequested { path: PathBuf },
    /// Dokument speichern (`None` = unter aktuellem Pfad)
    SaveRequested { path: Option<PathBuf> },
    /// Auswahl im Viewport geändert (geordnet, mit Pick-Punkten)
    SelectionChanged { selection: Vec<PickedElement> },
    /// Feature-Command aus Menü/Toolbar aktiviert
    FeatureCommandActivated { index: usize },
    /// Feld eines Features im Property-Editor geändert
    FeatureEditRequested { id: FeatureId, edit: FeatureEdit },
    /// Doppelklick auf ein Feature (Edit-Session starten oder übernehmen)
    FeatureDoubleClicked { id: FeatureId },
    /// Maus gedrückt im Viewport (Marker greifen)
    DragStarted { position: DVec3 },
    /// Maus bewegt bei gedrückter Taste
    DragUpdated { position: DVec3 },
    /// Maus losgelassen
    DragEnded,
    /// Marker unter dem Cursor löschen
    MarkerDeleteRequested { position: DVec3 },
    /// Marker unter dem Cursor von seiner Stütze lösen
    MarkerDetachRequested { position: DVec3 },
    /// Edit-Session verwerfen (Escape)
    EditCancelRequested,
    /// Kontrollpolygon eines Features ein-/ausblenden
    ToggleControlPointsRequested { id: FeatureId },
    /// Feature löschen
    DeleteFeatureRequested { id: FeatureId },
    /// Alle Features neu berechnen
    RecomputeAllRequested,
    /// Optionen geändert
    OptionsChanged { options: EditorOptions },
}
