//! Dokument: benannte Objekte plus parametrische Features.
//!
//! Features lesen Geometrie aus dem `ShapeStore` und veröffentlichen ihr
//! Ergebnis dort wieder unter ihrem Label, damit Folge-Features und die
//! Darstellung es wie jedes andere Objekt ansprechen können.

use std::path::Path;

use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::engine::CurveConstructionEngine;
use super::features::{
    Feature, FeatureEdit, FeatureError, FieldChanged, ParametricFeature, RecomputeContext,
};
use crate::core::{GeometryResolver, Shape, ShapeStore};
use crate::shared::EditorOptions;

/// Stabile ID eines Features im Dokument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub u64);

/// Feature mit Label und letztem Berechnungsfehler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureEntry {
    pub label: String,
    pub feature: Feature,
    #[serde(skip)]
    pub last_error: Option<FeatureError>,
}

/// Persistiertes Dokument.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub shapes: ShapeStore,
    #[serde(default)]
    features: IndexMap<FeatureId, FeatureEntry>,
    #[serde(default)]
    next_id: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fügt ein Basisobjekt hinzu (oder ersetzt es).
    pub fn add_object(&mut self, name: impl Into<String>, shape: Shape) {
        self.shapes.insert(name, shape);
    }

    /// Erstes freies Label `base`, `base001`, `base002`, …
    pub fn unique_label(&self, base: &str) -> String {
        let taken = |label: &str| {
            self.shapes.contains(label) || self.features.values().any(|e| e.label == label)
        };
        if !taken(base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{}{:03}", base, n))
            .find(|label| !taken(label))
            .unwrap_or_else(|| base.to_string())
    }

    /// Fügt ein Feature hinzu und berechnet es sofort.
    pub fn add_feature(&mut self, feature: Feature, engine: &CurveConstructionEngine) -> FeatureId {
        let id = FeatureId(self.next_id);
        self.next_id += 1;
        let label = self.unique_label(feature.base_label());
        log::info!("Feature {} angelegt", label);
        self.features.insert(
            id,
            FeatureEntry {
                label,
                feature,
                last_error: None,
            },
        );
        self.recompute(id, engine);
        id
    }

    pub fn entry(&self, id: FeatureId) -> Option<&FeatureEntry> {
        self.features.get(&id)
    }

    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(&id).map(|e| &e.feature)
    }

    pub fn label(&self, id: FeatureId) -> Option<&str> {
        self.features.get(&id).map(|e| e.label.as_str())
    }

    pub fn find_by_label(&self, label: &str) -> Option<FeatureId> {
        self.features
            .iter()
            .find(|(_, e)| e.label == label)
            .map(|(id, _)| *id)
    }

    /// IDs aller Features in Einfügereihenfolge.
    pub fn feature_ids(&self) -> Vec<FeatureId> {
        self.features.keys().copied().collect()
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Ändert ein Feld und berechnet neu.
    ///
    /// Ein Berechnungsfehler ist kein Fehler des Aufrufs: er wird geloggt und
    /// in `last_error` abgelegt, das alte Ergebnis bleibt erhalten.
    pub fn apply_edit(
        &mut self,
        id: FeatureId,
        edit: FeatureEdit,
        engine: &CurveConstructionEngine,
    ) -> anyhow::Result<FieldChanged> {
        let Document {
            shapes, features, ..
        } = self;
        let entry = features
            .get_mut(&id)
            .with_context(|| format!("Feature {:?} nicht gefunden", id))?;
        let event = entry
            .feature
            .set(edit)
            .with_context(|| format!("Änderung passt nicht zu {}", entry.label))?;

        let ctx = RecomputeContext::new(GeometryResolver::new(shapes), engine);
        let result = entry.feature.on_changed(event, &ctx);
        Self::finish_recompute(shapes, entry, result);
        Ok(event)
    }

    /// Übernimmt mehrere Änderungen und berechnet einmal neu.
    pub fn apply_edits(
        &mut self,
        id: FeatureId,
        edits: Vec<FeatureEdit>,
        engine: &CurveConstructionEngine,
    ) -> anyhow::Result<bool> {
        let entry = self
            .features
            .get_mut(&id)
            .with_context(|| format!("Feature {:?} nicht gefunden", id))?;
        for edit in edits {
            entry
                .feature
                .set(edit)
                .with_context(|| format!("Änderung passt nicht zu {}", entry.label))?;
        }
        Ok(self.recompute(id, engine))
    }

    /// Berechnet ein Feature neu und veröffentlicht sein Ergebnis.
    pub fn recompute(&mut self, id: FeatureId, engine: &CurveConstructionEngine) -> bool {
        let Document {
            shapes, features, ..
        } = self;
        let Some(entry) = features.get_mut(&id) else {
            log::warn!("Neuberechnung: Feature {:?} unbekannt", id);
            return false;
        };
        let ctx = RecomputeContext::new(GeometryResolver::new(shapes), engine);
        let result = entry.feature.execute(&ctx);
        Self::finish_recompute(shapes, entry, result)
    }

    /// Berechnet alle Features in Einfügereihenfolge neu. Liefert die Anzahl Fehlschläge.
    pub fn recompute_all(&mut self, engine: &CurveConstructionEngine) -> usize {
        self.feature_ids()
            .into_iter()
            .filter(|id| !self.recompute(*id, engine))
            .count()
    }

    fn finish_recompute(
        shapes: &mut ShapeStore,
        entry: &mut FeatureEntry,
        result: Result<(), FeatureError>,
    ) -> bool {
        match result {
            Ok(()) => {
                entry.last_error = None;
                if let Some(shape) = entry.feature.shape() {
                    shapes.insert(entry.label.clone(), shape.clone());
                }
                log::debug!("{} neu berechnet", entry.label);
                true
            }
            Err(e) => {
                log::error!("{}: Neuberechnung fehlgeschlagen: {}", entry.label, e);
                entry.last_error = Some(e);
                false
            }
        }
    }

    /// Entfernt ein Feature samt veröffentlichtem Ergebnis.
    pub fn remove_feature(&mut self, id: FeatureId) -> Option<FeatureEntry> {
        let entry = self.features.shift_remove(&id)?;
        self.shapes.remove(&entry.label);
        log::info!("Feature {} entfernt", entry.label);
        Some(entry)
    }

    /// Ersetzt ein Feature (z. B. durch eine Schattenkopie) und veröffentlicht dessen Ergebnis.
    pub fn replace_feature(&mut self, id: FeatureId, feature: Feature) -> anyhow::Result<()> {
        let entry = self
            .features
            .get_mut(&id)
            .with_context(|| format!("Feature {:?} nicht gefunden", id))?;
        entry.feature = feature;
        if let Some(shape) = entry.feature.shape() {
            self.shapes.insert(entry.label.clone(), shape.clone());
        }
        Ok(())
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("Dokument nicht serialisierbar")
    }

    /// Liest ein Dokument und bringt die Bereichs-Metadaten wieder an.
    pub fn from_json(json: &str, options: &EditorOptions) -> anyhow::Result<Self> {
        let mut document: Document =
            serde_json::from_str(json).context("Dokument nicht lesbar")?;
        for entry in document.features.values_mut() {
            entry.feature.on_restored(options);
        }
        if let Some(max) = document.features.keys().map(|id| id.0).max() {
            document.next_id = document.next_id.max(max + 1);
        }
        Ok(document)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("Schreiben von {} fehlgeschlagen", path.display()))?;
        log::info!("Dokument gespeichert: {}", path.display());
        Ok(())
    }

    pub fn load_from_file(path: &Path, options: &EditorOptions) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Lesen von {} fehlgeschlagen", path.display()))?;
        let document = Self::from_json(&json, options)?;
        log::info!(
            "Dokument geladen: {} ({} Objekte, {} Features)",
            path.display(),
            document.shapes.len(),
            document.features.len()
        );
        Ok(document)
    }
}
