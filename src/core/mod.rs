//! Core-Domänentypen: Sub-Element-Referenzen, Shapes und Geometrie-Auflösung.

pub mod reference;
pub mod resolver;
pub mod shape;

pub use reference::{
    CurveReference, ParseReferenceError, SubElementKind, SubElementLink, SubElementRef,
};
pub use resolver::{
    denormalize, normalize, orientation_sign, project, GeometryResolver, Projection,
    ResolveError, ResolvedElement,
};
pub use shape::{Edge, Face, Shape, ShapeStore};
