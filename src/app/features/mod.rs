//! Parametrische Features: Blend-Kurve und Constrained Profile.
//!
//! Jedes Feature ist eine deklarative Beschreibung (Referenzen, Parameter,
//! Datenpunkte) plus gecachtes Ergebnis. Änderungen laufen als
//! `FieldChanged`-Ereignis durch einen einzigen `on_changed`-Handler, der die
//! Neuberechnung anstößt. Schlägt sie fehl, bleibt der alte Cache stehen.

pub mod blend;
mod error;
pub mod field;
pub mod profile;

pub use blend::{BlendEdit, BlendFeature, Continuity};
pub use error::{FeatureError, FeatureResult};
pub use field::ClampedFloat;
pub use profile::{DataType, ProfileEdit, ProfileFeature};

use serde::{Deserialize, Serialize};

use super::engine::CurveConstructionEngine;
use crate::core::{GeometryResolver, Shape};
use crate::shared::EditorOptions;

/// Benannte Felder beider Feature-Typen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureField {
    Edge1,
    Edge2,
    Parameter1,
    Parameter2,
    Scale1,
    Scale2,
    Continuity1,
    Continuity2,
    DegreeMax,
    Output,
    Support,
    Tolerance,
    Periodic,
    Data,
    DataType,
    /// Support, Data und DataType gemeinsam (Übernahme aus einer Edit-Session)
    ProfileData,
}

/// Änderungsereignis eines Feldes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldChanged {
    pub field: FeatureField,
}

impl FieldChanged {
    pub fn new(field: FeatureField) -> Self {
        Self { field }
    }
}

/// Alles, was eine Neuberechnung von außen braucht.
#[derive(Clone, Copy)]
pub struct RecomputeContext<'a> {
    pub resolver: GeometryResolver<'a>,
    pub engine: &'a CurveConstructionEngine,
}

impl<'a> RecomputeContext<'a> {
    pub fn new(resolver: GeometryResolver<'a>, engine: &'a CurveConstructionEngine) -> Self {
        Self { resolver, engine }
    }
}

/// Gemeinsamer Vertrag beider Feature-Typen.
pub trait ParametricFeature {
    /// Reagiert auf ein geändertes Feld (typisch: Neuberechnung).
    fn on_changed(&mut self, event: FieldChanged, ctx: &RecomputeContext<'_>)
        -> FeatureResult<()>;

    /// Berechnet das Ergebnis neu; bei Fehler bleibt der Cache unverändert.
    fn execute(&mut self, ctx: &RecomputeContext<'_>) -> FeatureResult<()>;

    /// Bringt nach dem Laden die Bereichs-Metadaten wieder an.
    fn on_restored(&mut self, options: &EditorOptions);

    /// Zuletzt berechnetes Ergebnis.
    fn shape(&self) -> Option<&Shape>;

    /// Objekte, deren Geometrie das Feature liest.
    fn input_objects(&self) -> Vec<String>;
}

/// Änderung an einem Feature beliebigen Typs.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureEdit {
    Blend(BlendEdit),
    Profile(ProfileEdit),
}

/// Ein Feature des Dokuments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "Type")]
pub enum Feature {
    Blend(BlendFeature),
    Profile(ProfileFeature),
}

impl Feature {
    /// Basisname für automatisch vergebene Labels.
    pub fn base_label(&self) -> &'static str {
        match self {
            Feature::Blend(_) => "Blend_Curve",
            Feature::Profile(_) => "Profile",
        }
    }

    /// Validiert und speichert eine Änderung ohne Neuberechnung.
    ///
    /// `None` wenn die Änderung nicht zum Feature-Typ passt.
    pub fn set(&mut self, edit: FeatureEdit) -> Option<FieldChanged> {
        match (self, edit) {
            (Feature::Blend(f), FeatureEdit::Blend(e)) => Some(f.set(e)),
            (Feature::Profile(f), FeatureEdit::Profile(e)) => Some(f.set(e)),
            _ => None,
        }
    }

    pub fn as_blend(&self) -> Option<&BlendFeature> {
        match self {
            Feature::Blend(f) => Some(f),
            Feature::Profile(_) => None,
        }
    }

    pub fn as_profile(&self) -> Option<&ProfileFeature> {
        match self {
            Feature::Profile(f) => Some(f),
            Feature::Blend(_) => None,
        }
    }
}

impl ParametricFeature for Feature {
    fn on_changed(
        &mut self,
        event: FieldChanged,
        ctx: &RecomputeContext<'_>,
    ) -> FeatureResult<()> {
        match self {
            Feature::Blend(f) => f.on_changed(event, ctx),
            Feature::Profile(f) => f.on_changed(event, ctx),
        }
    }

    fn execute(&mut self, ctx: &RecomputeContext<'_>) -> FeatureResult<()> {
        match self {
            Feature::Blend(f) => f.execute(ctx),
            Feature::Profile(f) => f.execute(ctx),
        }
    }

    fn on_restored(&mut self, options: &EditorOptions) {
        match self {
            Feature::Blend(f) => f.on_restored(options),
            Feature::Profile(f) => f.on_restored(options),
        }
    }

    fn shape(&self) -> Option<&Shape> {
        match self {
            Feature::Blend(f) => f.shape(),
            Feature::Profile(f) => f.shape(),
        }
    }

    fn input_objects(&self) -> Vec<String> {
        match self {
            Feature::Blend(f) => f.input_objects(),
            Feature::Profile(f) => f.input_objects(),
        }
    }
}
