use std::path::PathBuf;

use glam::DVec3;

use crate::app::document::FeatureId;
use crate::app::feature_commands::PickedElement;
use crate::app::features::FeatureEdit;
use crate::shared::EditorOptions;

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Dokument laden und alle Features neu berechnen
    LoadDocument { path: PathBuf },
    /// Dokument speichern
    SaveDocument { path: Option<PathBuf> },
    /// Auswahl ersetzen
    SetSelection { selection: Vec<PickedElement> },
    /// Feature-Command mit der aktuellen Auswahl ausführen
    ActivateFeatureCommand { index: usize },
    /// Feld ändern und neu berechnen
    EditFeature { id: FeatureId, edit: FeatureEdit },
    /// Edit-Session für ein Feature starten
    BeginEditSession { id: FeatureId },
    /// Aktive Edit-Session übernehmen
    CommitEditSession,
    /// Aktive Edit-Session verwerfen
    CancelEditSession,
    /// Marker nahe der Position greifen
    BeginMarkerDrag { position: DVec3 },
    /// Gegriffenen Marker ziehen
    UpdateMarkerDrag { position: DVec3 },
    /// Gegriffenen Marker loslassen
    EndMarkerDrag,
    /// Marker nahe der Position löschen
    DeleteMarker { position: DVec3 },
    /// Marker nahe der Position von seiner Stütze lösen
    DetachMarker { position: DVec3 },
    /// Kontrollpolygon-Overlay umschalten
    ToggleControlPoints { id: FeatureId },
    /// Feature samt Ergebnis entfernen
    DeleteFeature { id: FeatureId },
    /// Alle Features neu berechnen
    RecomputeAll,
    /// Neue Optionen übernehmen
    ApplyOptions { options: EditorOptions },
}
