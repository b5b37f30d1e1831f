//! Command "Constrained Profile".

use glam::DVec3;

use super::{CommandResources, FeatureCommand, PickedElement};
use crate::app::document::{Document, FeatureId};
use crate::app::engine::CurveConstructionEngine;
use crate::app::features::{Feature, ProfileFeature};
use crate::shared::EditorOptions;

/// Legt ein Profil aus der Auswahl an.
pub struct ConstrainedProfileCommand;

impl FeatureCommand for ConstrainedProfileCommand {
    fn resources(&self) -> CommandResources {
        CommandResources {
            pixmap: "icons/profile.svg",
            menu_text: "Constrained Profile",
            tooltip: "Creates an editable interpolation curve",
        }
    }

    fn is_active(&self, _document: &Document, _selection: &[PickedElement]) -> bool {
        true
    }

    fn activated(
        &self,
        document: &mut Document,
        selection: &[PickedElement],
        engine: &CurveConstructionEngine,
        options: &EditorOptions,
    ) -> anyhow::Result<Vec<FeatureId>> {
        let support = selection.iter().map(|p| p.link.clone()).collect();
        let picked: Vec<DVec3> = selection.iter().filter_map(|p| p.picked_point).collect();
        let profile = ProfileFeature::from_selection(support, picked, options);
        Ok(vec![document.add_feature(Feature::Profile(profile), engine)])
    }
}
