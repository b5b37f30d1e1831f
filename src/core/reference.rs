//! Referenzen auf benannte Sub-Elemente (Vertex/Edge/Face) eines Objekts.
//!
//! Namen wie `Edge3` werden genau einmal beim Erzeugen bzw. Laden geparst;
//! danach wird nur noch mit dem getaggten Typ gearbeitet.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Art eines Sub-Elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubElementKind {
    Vertex,
    Edge,
    Face,
}

impl SubElementKind {
    /// Namenspräfix, wie er in Sub-Element-Namen steht.
    pub fn prefix(self) -> &'static str {
        match self {
            SubElementKind::Vertex => "Vertex",
            SubElementKind::Edge => "Edge",
            SubElementKind::Face => "Face",
        }
    }
}

/// Getaggte Sub-Element-Referenz; `index` ist 1-basiert wie im Namen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubElementRef {
    pub kind: SubElementKind,
    pub index: usize,
}

/// Fehler beim Parsen eines Sub-Element-Namens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("ungültiger Sub-Element-Name: '{0}'")]
pub struct ParseReferenceError(pub String);

fn element_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(Vertex|Edge|Face)([1-9]\d*)$").unwrap_or_else(|e| {
            unreachable!("statisches Pattern ist gültig: {e}")
        })
    })
}

impl SubElementRef {
    pub fn new(kind: SubElementKind, index: usize) -> Self {
        Self { kind, index }
    }

    pub fn edge(index: usize) -> Self {
        Self::new(SubElementKind::Edge, index)
    }

    pub fn vertex(index: usize) -> Self {
        Self::new(SubElementKind::Vertex, index)
    }

    pub fn face(index: usize) -> Self {
        Self::new(SubElementKind::Face, index)
    }

    /// Parst Namen der Form `Vertex<N>`, `Edge<N>`, `Face<N>` (N ≥ 1).
    pub fn parse(name: &str) -> Result<Self, ParseReferenceError> {
        let caps = element_pattern()
            .captures(name.trim())
            .ok_or_else(|| ParseReferenceError(name.to_string()))?;
        let kind = match &caps[1] {
            "Vertex" => SubElementKind::Vertex,
            "Edge" => SubElementKind::Edge,
            _ => SubElementKind::Face,
        };
        let index = caps[2]
            .parse()
            .map_err(|_| ParseReferenceError(name.to_string()))?;
        Ok(Self { kind, index })
    }
}

impl fmt::Display for SubElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.index)
    }
}

/// Verknüpfung `(Objektname, Sub-Element)`, persistiert als `"Objekt:Edge3"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubElementLink {
    pub object: String,
    pub element: SubElementRef,
}

impl SubElementLink {
    pub fn new(object: impl Into<String>, element: SubElementRef) -> Self {
        Self {
            object: object.into(),
            element,
        }
    }
}

impl fmt::Display for SubElementLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object, self.element)
    }
}

impl TryFrom<String> for SubElementLink {
    type Error = ParseReferenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let (object, element) = value
            .rsplit_once(':')
            .ok_or_else(|| ParseReferenceError(value.clone()))?;
        if object.is_empty() {
            return Err(ParseReferenceError(value));
        }
        Ok(Self::new(object, SubElementRef::parse(element)?))
    }
}

impl From<SubElementLink> for String {
    fn from(link: SubElementLink) -> Self {
        link.to_string()
    }
}

/// Sub-Element-Link mit optionalem normiertem Parameter in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveReference {
    pub link: SubElementLink,
    pub parameter: Option<f64>,
}

impl CurveReference {
    /// Erstellt eine Referenz; der Parameter wird auf [0, 1] geklemmt.
    pub fn new(link: SubElementLink, parameter: Option<f64>) -> Self {
        Self {
            link,
            parameter: parameter.map(|t| t.clamp(0.0, 1.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_names() {
        assert_eq!(SubElementRef::parse("Edge3"), Ok(SubElementRef::edge(3)));
        assert_eq!(SubElementRef::parse("Vertex12"), Ok(SubElementRef::vertex(12)));
        assert_eq!(SubElementRef::parse("Face1"), Ok(SubElementRef::face(1)));
    }

    #[test]
    fn test_parse_rejects_invalid_names() {
        for name in ["Edge0", "Edge", "edge1", "Wire1", "Edge1a", ""] {
            assert!(SubElementRef::parse(name).is_err(), "'{name}' sollte ungültig sein");
        }
    }

    #[test]
    fn test_link_roundtrip_with_colon_in_object_name() {
        let link = SubElementLink::try_from("Skizze:A:Edge2".to_string())
            .expect("Link sollte parsebar sein");
        assert_eq!(link.object, "Skizze:A");
        assert_eq!(link.element, SubElementRef::edge(2));
        assert_eq!(String::from(link), "Skizze:A:Edge2");
    }

    #[test]
    fn test_curve_reference_clamps_parameter() {
        let link = SubElementLink::new("Line", SubElementRef::edge(1));
        assert_eq!(CurveReference::new(link.clone(), Some(1.7)).parameter, Some(1.0));
        assert_eq!(CurveReference::new(link, Some(-0.2)).parameter, Some(0.0));
    }
}
