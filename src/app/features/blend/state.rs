//! Zustand der Blend-Kurve und Validierung von Änderungen.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::super::field::ClampedFloat;
use super::super::{FeatureField, FieldChanged};
use crate::app::engine::{BlendRequest, BlendSide, OutputMode};
use crate::core::{CurveReference, Shape, SubElementLink};
use crate::shared::options::{
    EditorOptions, DEGREE_MAX, DEGREE_MIN, SCALE_EPSILON, SCALE_MAX, SCALE_MIN,
};

/// Anschlussordnung an einem Blend-Ende.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Continuity {
    /// Nur Position
    #[default]
    C0,
    /// Tangentenrichtung
    G1,
    /// Krümmung
    G2,
    G3,
    G4,
}

impl Continuity {
    /// Ganzzahlige Ordnung 0..=4.
    pub fn order(self) -> usize {
        match self {
            Continuity::C0 => 0,
            Continuity::G1 => 1,
            Continuity::G2 => 2,
            Continuity::G3 => 3,
            Continuity::G4 => 4,
        }
    }
}

/// Welche der beiden Eingangskanten gemeint ist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeSlot {
    First,
    Second,
}

/// Änderung eines einzelnen Blend-Feldes.
#[derive(Debug, Clone, PartialEq)]
pub enum BlendEdit {
    Edge1(SubElementLink),
    Edge2(SubElementLink),
    Parameter1(f64),
    Parameter2(f64),
    Scale1(f64),
    Scale2(f64),
    Continuity1(Continuity),
    Continuity2(Continuity),
    DegreeMax(usize),
    Output(OutputMode),
}

impl BlendEdit {
    /// Parameter-Änderung für die angegebene Seite.
    pub fn parameter(slot: EdgeSlot, value: f64) -> Self {
        match slot {
            EdgeSlot::First => BlendEdit::Parameter1(value),
            EdgeSlot::Second => BlendEdit::Parameter2(value),
        }
    }

    /// Skalierungs-Änderung für die angegebene Seite.
    pub fn scale(slot: EdgeSlot, value: f64) -> Self {
        match slot {
            EdgeSlot::First => BlendEdit::Scale1(value),
            EdgeSlot::Second => BlendEdit::Scale2(value),
        }
    }

    pub fn field(&self) -> FeatureField {
        match self {
            BlendEdit::Edge1(_) => FeatureField::Edge1,
            BlendEdit::Edge2(_) => FeatureField::Edge2,
            BlendEdit::Parameter1(_) => FeatureField::Parameter1,
            BlendEdit::Parameter2(_) => FeatureField::Parameter2,
            BlendEdit::Scale1(_) => FeatureField::Scale1,
            BlendEdit::Scale2(_) => FeatureField::Scale2,
            BlendEdit::Continuity1(_) => FeatureField::Continuity1,
            BlendEdit::Continuity2(_) => FeatureField::Continuity2,
            BlendEdit::DegreeMax(_) => FeatureField::DegreeMax,
            BlendEdit::Output(_) => FeatureField::Output,
        }
    }
}

/// Persistenter Zustand einer Blend-Kurve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlendFeature {
    pub(super) edge1: SubElementLink,
    pub(super) edge2: SubElementLink,
    pub(super) parameter1: ClampedFloat,
    pub(super) parameter2: ClampedFloat,
    pub(super) scale1: ClampedFloat,
    pub(super) scale2: ClampedFloat,
    pub(super) continuity1: Continuity,
    pub(super) continuity2: Continuity,
    pub(super) degree_max: usize,
    pub(super) output: OutputMode,
    pub(super) curve_pts: Vec<DVec3>,
    #[serde(skip)]
    pub(super) shape: Option<Shape>,
    /// Ersatzwert für Skalierung 0 aus den Optionen
    #[serde(skip, default = "default_scale_epsilon")]
    pub(super) scale_epsilon: f64,
}

fn default_scale_epsilon() -> f64 {
    SCALE_EPSILON
}

impl BlendFeature {
    /// Neue Blend-Kurve an den Kantenenden (Parameter 1), Skalierung 1, C0.
    pub fn new(edge1: SubElementLink, edge2: SubElementLink, options: &EditorOptions) -> Self {
        let mut feature = Self {
            edge1,
            edge2,
            parameter1: ClampedFloat::from(1.0),
            parameter2: ClampedFloat::from(1.0),
            scale1: ClampedFloat::from(1.0),
            scale2: ClampedFloat::from(1.0),
            continuity1: Continuity::C0,
            continuity2: Continuity::C0,
            degree_max: options.default_degree_max.clamp(DEGREE_MIN, DEGREE_MAX),
            output: OutputMode::Wire,
            curve_pts: Vec::new(),
            shape: None,
            scale_epsilon: SCALE_EPSILON,
        };
        feature.attach_ranges(options);
        feature
    }

    pub(super) fn attach_ranges(&mut self, options: &EditorOptions) {
        for field in [&mut self.parameter1, &mut self.parameter2] {
            field.reattach(0.0, 1.0, options.parameter_step);
        }
        for field in [&mut self.scale1, &mut self.scale2] {
            field.reattach(options.scale_min, options.scale_max, options.scale_step);
        }
        let epsilon = options.scale_epsilon;
        self.scale_epsilon = if epsilon.is_finite() && epsilon > 0.0 {
            epsilon
        } else {
            log::warn!("scale_epsilon {} ungültig, verwende {}", epsilon, SCALE_EPSILON);
            SCALE_EPSILON
        };
    }

    pub fn edge(&self, slot: EdgeSlot) -> &SubElementLink {
        match slot {
            EdgeSlot::First => &self.edge1,
            EdgeSlot::Second => &self.edge2,
        }
    }

    pub fn parameter(&self, slot: EdgeSlot) -> f64 {
        match slot {
            EdgeSlot::First => self.parameter1.value(),
            EdgeSlot::Second => self.parameter2.value(),
        }
    }

    pub fn scale(&self, slot: EdgeSlot) -> f64 {
        match slot {
            EdgeSlot::First => self.scale1.value(),
            EdgeSlot::Second => self.scale2.value(),
        }
    }

    pub fn continuity(&self, slot: EdgeSlot) -> Continuity {
        match slot {
            EdgeSlot::First => self.continuity1,
            EdgeSlot::Second => self.continuity2,
        }
    }

    /// Geklemmtes Feld für Parameter der Seite (Bereich + Schritt).
    pub fn parameter_field(&self, slot: EdgeSlot) -> ClampedFloat {
        match slot {
            EdgeSlot::First => self.parameter1,
            EdgeSlot::Second => self.parameter2,
        }
    }

    /// Geklemmtes Feld für die Skalierung der Seite (Bereich + Schritt).
    pub fn scale_field(&self, slot: EdgeSlot) -> ClampedFloat {
        match slot {
            EdgeSlot::First => self.scale1,
            EdgeSlot::Second => self.scale2,
        }
    }

    pub fn degree_max(&self) -> usize {
        self.degree_max
    }

    pub fn output(&self) -> OutputMode {
        self.output
    }

    /// Kontrollpolygon der letzten erfolgreichen Berechnung.
    pub fn curve_pts(&self) -> &[DVec3] {
        &self.curve_pts
    }

    /// Grad der Blend-Konstruktion: `k1 + k2 + 1`.
    pub fn construction_degree(&self) -> usize {
        self.continuity1.order() + self.continuity2.order() + 1
    }

    /// Liefert die korrigierte Form einer Änderung, ohne etwas zu speichern.
    ///
    /// Skalierung 0 wird zu `scale_epsilon` der Optionen, Parameter auf [0, 1],
    /// Skalierung auf den Skalierungsbereich, DegreeMax auf [1, 9].
    pub fn validate(&self, edit: BlendEdit) -> BlendEdit {
        let scale = |field: &ClampedFloat, value: f64| {
            let value = if value == 0.0 {
                log::debug!("Skalierung 0 korrigiert auf {}", self.scale_epsilon);
                self.scale_epsilon
            } else {
                value
            };
            let lo = if field.is_bounded() { field.min() } else { SCALE_MIN };
            let hi = if field.is_bounded() { field.max() } else { SCALE_MAX };
            value.clamp(lo, hi)
        };
        match edit {
            BlendEdit::Parameter1(v) => BlendEdit::Parameter1(v.clamp(0.0, 1.0)),
            BlendEdit::Parameter2(v) => BlendEdit::Parameter2(v.clamp(0.0, 1.0)),
            BlendEdit::Scale1(v) => BlendEdit::Scale1(scale(&self.scale1, v)),
            BlendEdit::Scale2(v) => BlendEdit::Scale2(scale(&self.scale2, v)),
            BlendEdit::DegreeMax(d) => {
                let clamped = d.clamp(DEGREE_MIN, DEGREE_MAX);
                if clamped != d {
                    log::debug!("DegreeMax {} auf {} geklemmt", d, clamped);
                }
                BlendEdit::DegreeMax(clamped)
            }
            other => other,
        }
    }

    /// Validiert und speichert eine Änderung, ohne neu zu berechnen.
    pub fn set(&mut self, edit: BlendEdit) -> FieldChanged {
        let edit = self.validate(edit);
        let event = FieldChanged::new(edit.field());
        match edit {
            BlendEdit::Edge1(link) => self.edge1 = link,
            BlendEdit::Edge2(link) => self.edge2 = link,
            BlendEdit::Parameter1(v) => {
                self.parameter1.set(v);
            }
            BlendEdit::Parameter2(v) => {
                self.parameter2.set(v);
            }
            BlendEdit::Scale1(v) => {
                self.scale1.set(v);
            }
            BlendEdit::Scale2(v) => {
                self.scale2.set(v);
            }
            BlendEdit::Continuity1(c) => self.continuity1 = c,
            BlendEdit::Continuity2(c) => self.continuity2 = c,
            BlendEdit::DegreeMax(d) => self.degree_max = d,
            BlendEdit::Output(mode) => self.output = mode,
        }
        event
    }

    /// Baut die Anfrage an den Konstruktions-Engine.
    pub(super) fn request(&self) -> BlendRequest {
        let side = |link: &SubElementLink, parameter: &ClampedFloat, c: Continuity, s: &ClampedFloat| {
            BlendSide {
                reference: CurveReference::new(link.clone(), Some(parameter.value())),
                continuity: c.order(),
                scale: s.value(),
            }
        };
        BlendRequest {
            start: side(&self.edge1, &self.parameter1, self.continuity1, &self.scale1),
            end: side(&self.edge2, &self.parameter2, self.continuity2, &self.scale2),
            max_degree: self.degree_max,
        }
    }
}
