//! Command "ParametricBlendCurve".

use super::{CommandResources, FeatureCommand, PickedElement};
use crate::app::document::{Document, FeatureId};
use crate::app::engine::{CurveConstructionEngine, OutputMode};
use crate::app::features::{BlendEdit, BlendFeature, Continuity, Feature};
use crate::core::{normalize, orientation_sign, GeometryResolver, SubElementKind};
use crate::shared::EditorOptions;

/// Legt pro Kantenpaar der Auswahl eine Blend-Kurve an.
pub struct BlendCurveCommand;

/// Normierter Parameter auf das nähere Kantenende gerundet.
fn end_clamped(t: f64) -> f64 {
    if t < 0.5 {
        0.0
    } else {
        1.0
    }
}

impl FeatureCommand for BlendCurveCommand {
    fn resources(&self) -> CommandResources {
        CommandResources {
            pixmap: "icons/blend.svg",
            menu_text: "ParametricBlendCurve",
            tooltip: "Creates a parametric blend curve",
        }
    }

    fn is_active(&self, _document: &Document, selection: &[PickedElement]) -> bool {
        selection
            .iter()
            .filter(|p| p.link.element.kind == SubElementKind::Edge)
            .count()
            >= 2
    }

    fn activated(
        &self,
        document: &mut Document,
        selection: &[PickedElement],
        engine: &CurveConstructionEngine,
        options: &EditorOptions,
    ) -> anyhow::Result<Vec<FeatureId>> {
        // Kanten mit Rohparameter am Pick-Punkt (ohne Pick: Kantenanfang)
        let mut picks = Vec::new();
        {
            let resolver = GeometryResolver::new(&document.shapes);
            for element in selection {
                if element.link.element.kind != SubElementKind::Edge {
                    continue;
                }
                let edge = resolver.resolve_edge(&element.link)?;
                let raw = match element.picked_point {
                    Some(point) => edge.closest_point(point).parameter,
                    None => edge.first,
                };
                picks.push((element.link.clone(), raw));
            }
        }
        if picks.len() % 2 == 1 {
            log::warn!("Blend: ungepaarte letzte Kante wird ignoriert");
        }

        let mut created = Vec::new();
        for pair in picks.chunks_exact(2) {
            let (link1, raw1) = &pair[0];
            let (link2, raw2) = &pair[1];
            let resolver = GeometryResolver::new(&document.shapes);
            let edge1 = resolver.resolve_edge(link1)?;
            let edge2 = resolver.resolve_edge(link2)?;
            let (ori1, ori2) = orientation_sign(
                (edge1, *raw1),
                (edge2, *raw2),
                options.orientation_ray_length,
            );
            let t1 = end_clamped(normalize(edge1, *raw1));
            let t2 = end_clamped(normalize(edge2, *raw2));

            let mut blend = BlendFeature::new(link1.clone(), link2.clone(), options);
            for edit in [
                BlendEdit::Parameter1(t1),
                BlendEdit::Parameter2(t2),
                BlendEdit::Continuity1(Continuity::G1),
                BlendEdit::Continuity2(Continuity::G1),
                BlendEdit::Output(OutputMode::Single),
                BlendEdit::Scale1(ori1),
                BlendEdit::Scale2(ori2),
            ] {
                blend.set(edit);
            }
            created.push(document.add_feature(Feature::Blend(blend), engine));
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::features::blend::EdgeSlot;
    use crate::core::{Edge, Shape, SubElementLink, SubElementRef};
    use glam::DVec3;

    fn document() -> Document {
        let mut doc = Document::new();
        doc.add_object("A", Shape::from_edge(Edge::line(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0))));
        doc.add_object(
            "B",
            Shape::from_edge(Edge::line(DVec3::new(20.0, 10.0, 0.0), DVec3::new(20.0, 0.0, 0.0))),
        );
        doc
    }

    fn pick(object: &str, point: DVec3) -> PickedElement {
        PickedElement::new(
            SubElementLink::new(object, SubElementRef::edge(1)),
            Some(point),
        )
    }

    #[test]
    fn test_activation_clamps_to_nearest_end() {
        let engine = CurveConstructionEngine::default();
        let options = EditorOptions::default();
        let mut doc = document();
        let selection = [
            pick("A", DVec3::new(8.0, 0.5, 0.0)),
            pick("B", DVec3::new(20.0, 3.0, 0.0)),
        ];
        assert!(BlendCurveCommand.is_active(&doc, &selection));

        let created = BlendCurveCommand
            .activated(&mut doc, &selection, &engine, &options)
            .expect("Aktivierung sollte gelingen");
        assert_eq!(created.len(), 1);
        let blend = doc
            .feature(created[0])
            .and_then(Feature::as_blend)
            .expect("Blend angelegt");
        assert_eq!(blend.parameter(EdgeSlot::First), 1.0);
        assert_eq!(blend.parameter(EdgeSlot::Second), 1.0);
        assert_eq!(blend.continuity(EdgeSlot::First), Continuity::G1);
        assert_eq!(blend.output(), OutputMode::Single);
        // Tangentenstrahlen (+X ab x=8, -Y ab y=3) schneiden sich vorwärts in (20,0,0)
        assert_eq!(blend.scale(EdgeSlot::First), 1.0);
        assert_eq!(blend.scale(EdgeSlot::Second), 1.0);
        assert_eq!(blend.curve_pts().len(), 4);
    }

    #[test]
    fn test_odd_edge_is_ignored() {
        let engine = CurveConstructionEngine::default();
        let mut doc = document();
        let selection = [pick("A", DVec3::new(8.0, 0.0, 0.0))];
        assert!(!BlendCurveCommand.is_active(&doc, &selection));
        let created = BlendCurveCommand
            .activated(&mut doc, &selection, &engine, &EditorOptions::default())
            .expect("Aktivierung ohne Paar ist kein Fehler");
        assert!(created.is_empty());
        assert_eq!(doc.feature_count(), 0);
    }
}
