//! Neuberechnung der Blend-Kurve.

use super::super::{
    FeatureField, FeatureResult, FieldChanged, ParametricFeature, RecomputeContext,
};
use super::state::BlendFeature;
use crate::core::Shape;
use crate::shared::EditorOptions;

impl ParametricFeature for BlendFeature {
    fn on_changed(
        &mut self,
        event: FieldChanged,
        ctx: &RecomputeContext<'_>,
    ) -> FeatureResult<()> {
        match event.field {
            FeatureField::Edge1
            | FeatureField::Edge2
            | FeatureField::Parameter1
            | FeatureField::Parameter2
            | FeatureField::Scale1
            | FeatureField::Scale2
            | FeatureField::Continuity1
            | FeatureField::Continuity2
            | FeatureField::DegreeMax
            | FeatureField::Output => self.execute(ctx),
            _ => Ok(()),
        }
    }

    fn execute(&mut self, ctx: &RecomputeContext<'_>) -> FeatureResult<()> {
        let construction = ctx.engine.blend(&ctx.resolver, &self.request())?;
        let shape = ctx.engine.blend_shape(&construction, self.output)?;

        // Erst nach vollständigem Erfolg übernehmen
        self.curve_pts = construction.poles();
        self.shape = Some(shape);
        Ok(())
    }

    fn on_restored(&mut self, options: &EditorOptions) {
        self.attach_ranges(options);
    }

    fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    fn input_objects(&self) -> Vec<String> {
        let mut objects = vec![self.edge1.object.clone()];
        if self.edge2.object != self.edge1.object {
            objects.push(self.edge2.object.clone());
        }
        objects
    }
}

impl BlendFeature {
    /// Validiert, speichert und meldet eine Änderung (inkl. Neuberechnung).
    pub fn apply(
        &mut self,
        edit: super::BlendEdit,
        ctx: &RecomputeContext<'_>,
    ) -> FeatureResult<FieldChanged> {
        let event = self.set(edit);
        self.on_changed(event, ctx)?;
        Ok(event)
    }
}
