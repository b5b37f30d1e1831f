//! Application State: zentrale Datenhaltung.

use std::path::PathBuf;

use indexmap::IndexMap;

use super::document::{Document, FeatureId};
use super::editing::{DragSession, SceneHandle, SceneRecorder, Viewport};
use super::engine::CurveConstructionEngine;
use super::feature_commands::{CommandRegistry, PickedElement};
use super::CommandLog;
use crate::shared::EditorOptions;

/// Zustand der gesamten Anwendung.
pub struct AppState {
    /// Aktuelles Dokument (Objekte + Features)
    pub document: Document,
    /// Pfad für "Speichern" ohne neuen Pfad
    pub document_path: Option<PathBuf>,
    /// Laufzeit-Optionen
    pub options: EditorOptions,
    /// Kurvenkonstruktion mit den aktuellen Optionen
    pub engine: CurveConstructionEngine,
    /// Szene des Hosts
    pub viewport: Box<dyn Viewport>,
    /// Aktive Edit-Session (None = Idle)
    pub session: Option<DragSession>,
    /// Geordnete Auswahl für Feature-Commands
    pub selection: Vec<PickedElement>,
    /// Registrierte Feature-Commands
    pub commands: CommandRegistry,
    /// Eingeblendete Kontrollpolygone je Feature
    pub overlays: IndexMap<FeatureId, SceneHandle>,
    /// Von Features ausgeblendete Eingangsobjekte
    pub hidden_inputs: IndexMap<FeatureId, Vec<String>>,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    /// Letzte Statusmeldung für die Statusleiste
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Erstellt einen leeren App-State mit Headless-Szene.
    pub fn new() -> Self {
        Self::with_viewport(Box::new(SceneRecorder::new()), EditorOptions::default())
    }

    /// Erstellt einen leeren App-State für eine Host-Szene.
    pub fn with_viewport(viewport: Box<dyn Viewport>, options: EditorOptions) -> Self {
        Self {
            document: Document::new(),
            document_path: None,
            engine: CurveConstructionEngine::new(&options),
            options,
            viewport,
            session: None,
            selection: Vec::new(),
            commands: CommandRegistry::new(),
            overlays: IndexMap::new(),
            hidden_inputs: IndexMap::new(),
            command_log: CommandLog::new(),
            status_message: None,
        }
    }

    /// `true` während einer Edit-Session.
    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    /// Anzahl der Features im Dokument (für UI-Anzeige)
    pub fn feature_count(&self) -> usize {
        self.document.feature_count()
    }
}
