//! Zustand des Profils und Validierung von Änderungen.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::super::{FeatureError, FeatureField, FeatureResult, FieldChanged};
use crate::core::{GeometryResolver, Shape, SubElementLink};
use crate::shared::EditorOptions;

/// Typ eines Datenpunkts: frei (0) oder auf der zugehörigen Stütze (1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DataType {
    #[default]
    Free,
    OnSupport,
}

impl TryFrom<u8> for DataType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DataType::Free),
            1 => Ok(DataType::OnSupport),
            other => Err(format!("Unbekannter DataType {}", other)),
        }
    }
}

impl From<DataType> for u8 {
    fn from(value: DataType) -> Self {
        match value {
            DataType::Free => 0,
            DataType::OnSupport => 1,
        }
    }
}

/// Änderung eines Profil-Feldes.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileEdit {
    Support(Vec<SubElementLink>),
    Tolerance(f64),
    Periodic(bool),
    Data(Vec<DVec3>),
    DataType(Vec<DataType>),
    /// Übernahme aller drei Listen auf einmal (Commit einer Edit-Session)
    ReplaceAll {
        support: Vec<SubElementLink>,
        data: Vec<DVec3>,
        data_type: Vec<DataType>,
    },
}

impl ProfileEdit {
    pub fn field(&self) -> FeatureField {
        match self {
            ProfileEdit::Support(_) => FeatureField::Support,
            ProfileEdit::Tolerance(_) => FeatureField::Tolerance,
            ProfileEdit::Periodic(_) => FeatureField::Periodic,
            ProfileEdit::Data(_) => FeatureField::Data,
            ProfileEdit::DataType(_) => FeatureField::DataType,
            ProfileEdit::ReplaceAll { .. } => FeatureField::ProfileData,
        }
    }
}

/// Persistenter Zustand eines Profils.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfileFeature {
    pub(super) support: Vec<SubElementLink>,
    pub(super) tolerance: f64,
    pub(super) periodic: bool,
    pub(super) data: Vec<DVec3>,
    pub(super) data_type: Vec<DataType>,
    #[serde(skip)]
    pub(super) shape: Option<Shape>,
}

impl ProfileFeature {
    pub fn new(
        support: Vec<SubElementLink>,
        data: Vec<DVec3>,
        data_type: Vec<DataType>,
        options: &EditorOptions,
    ) -> Self {
        Self {
            support,
            tolerance: options.default_tolerance,
            periodic: false,
            data,
            data_type,
            shape: None,
        }
    }

    /// Profil aus einer Auswahl: alle Sub-Elemente werden Stützen, jeder
    /// gepickte Punkt ein gebundener Datenpunkt.
    ///
    /// Ohne Picks entsteht eine freie Strecke von (0,0,0) nach (1,0,0).
    pub fn from_selection(
        support: Vec<SubElementLink>,
        picked: Vec<DVec3>,
        options: &EditorOptions,
    ) -> Self {
        if picked.is_empty() {
            return Self::new(
                support,
                vec![DVec3::ZERO, DVec3::X],
                vec![DataType::Free; 2],
                options,
            );
        }
        let count = picked.len();
        Self::new(support, picked, vec![DataType::OnSupport; count], options)
    }

    pub fn support(&self) -> &[SubElementLink] {
        &self.support
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn is_periodic(&self) -> bool {
        self.periodic
    }

    pub fn data(&self) -> &[DVec3] {
        &self.data
    }

    pub fn data_type(&self) -> &[DataType] {
        &self.data_type
    }

    /// Liefert die korrigierte Form einer Änderung, ohne etwas zu speichern.
    ///
    /// Eine Toleranz ≤ 0 (oder nicht endlich) wird verworfen, der alte Wert bleibt.
    pub fn validate(&self, edit: ProfileEdit) -> ProfileEdit {
        match edit {
            ProfileEdit::Tolerance(t) if !(t.is_finite() && t > 0.0) => {
                log::warn!(
                    "Toleranz {} ungültig, behalte {}",
                    t,
                    self.tolerance
                );
                ProfileEdit::Tolerance(self.tolerance)
            }
            other => other,
        }
    }

    /// Validiert und speichert eine Änderung, ohne neu zu berechnen.
    pub fn set(&mut self, edit: ProfileEdit) -> FieldChanged {
        let edit = self.validate(edit);
        let event = FieldChanged::new(edit.field());
        match edit {
            ProfileEdit::Support(support) => self.support = support,
            ProfileEdit::Tolerance(t) => self.tolerance = t,
            ProfileEdit::Periodic(p) => self.periodic = p,
            ProfileEdit::Data(data) => self.data = data,
            ProfileEdit::DataType(types) => self.data_type = types,
            ProfileEdit::ReplaceAll {
                support,
                data,
                data_type,
            } => {
                self.support = support;
                self.data = data;
                self.data_type = data_type;
            }
        }
        event
    }

    /// Prüft die Listen-Invarianten (gleiche Länge, genug Stützen).
    pub fn check_shape(&self) -> FeatureResult<()> {
        if self.data.len() != self.data_type.len() {
            return Err(FeatureError::DataShapeMismatch {
                data: self.data.len(),
                types: self.data_type.len(),
            });
        }
        let constrained = self.constrained_count();
        if constrained > self.support.len() {
            return Err(FeatureError::SupportOverflow {
                constrained,
                supports: self.support.len(),
            });
        }
        Ok(())
    }

    /// Anzahl der auf Stützen gebundenen Punkte.
    pub fn constrained_count(&self) -> usize {
        self.data_type
            .iter()
            .filter(|t| **t == DataType::OnSupport)
            .count()
    }

    /// Stütze jedes Datenpunkts: gebundene Punkte verbrauchen die Stützen in Reihenfolge.
    pub fn point_supports(&self) -> Vec<Option<&SubElementLink>> {
        let mut supports = self.support.iter();
        self.data_type
            .iter()
            .map(|t| match t {
                DataType::OnSupport => supports.next(),
                DataType::Free => None,
            })
            .collect()
    }

    /// Projiziert alle gebundenen Punkte neu auf ihre Stützen.
    ///
    /// Freie Punkte bleiben unverändert, Anzahl und Reihenfolge bleiben erhalten.
    pub fn get_points(&self, resolver: &GeometryResolver<'_>) -> FeatureResult<Vec<DVec3>> {
        self.check_shape()?;
        self.data
            .iter()
            .zip(self.point_supports())
            .map(|(point, support)| match support {
                Some(link) => Ok(resolver.project_onto_element(link, *point)?.point),
                None => Ok(*point),
            })
            .collect()
    }
}
