//! Neuberechnung des Profils.

use super::super::{
    FeatureField, FeatureResult, FieldChanged, ParametricFeature, RecomputeContext,
};
use super::state::{ProfileEdit, ProfileFeature};
use crate::core::{Edge, Shape};
use crate::shared::EditorOptions;

impl ParametricFeature for ProfileFeature {
    fn on_changed(
        &mut self,
        event: FieldChanged,
        ctx: &RecomputeContext<'_>,
    ) -> FeatureResult<()> {
        match event.field {
            FeatureField::Support => {
                // Gebundene Punkte folgen der geänderten Stütze
                let points = self.get_points(&ctx.resolver)?;
                let previous = std::mem::replace(&mut self.data, points);
                if let Err(e) = self.execute(ctx) {
                    self.data = previous;
                    return Err(e);
                }
                Ok(())
            }
            FeatureField::Tolerance
            | FeatureField::Periodic
            | FeatureField::Data
            | FeatureField::DataType
            | FeatureField::ProfileData => self.execute(ctx),
            _ => Ok(()),
        }
    }

    fn execute(&mut self, ctx: &RecomputeContext<'_>) -> FeatureResult<()> {
        // Gebundene Punkte folgen auch bewegter Stützgeometrie; `data` bleibt unberührt
        let points = self.get_points(&ctx.resolver)?;
        let curve = ctx
            .engine
            .interpolate(&points, self.periodic, self.tolerance)?;
        self.shape = Some(Shape::from_edge(Edge::from_curve(curve)));
        Ok(())
    }

    fn on_restored(&mut self, options: &EditorOptions) {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            log::warn!(
                "Gespeicherte Toleranz {} ungültig, setze {}",
                self.tolerance,
                options.default_tolerance
            );
            self.tolerance = options.default_tolerance;
        }
    }

    fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    fn input_objects(&self) -> Vec<String> {
        let mut objects: Vec<String> = Vec::new();
        for link in &self.support {
            if !objects.contains(&link.object) {
                objects.push(link.object.clone());
            }
        }
        objects
    }
}

impl ProfileFeature {
    /// Validiert, speichert und meldet eine Änderung (inkl. Neuberechnung).
    pub fn apply(
        &mut self,
        edit: ProfileEdit,
        ctx: &RecomputeContext<'_>,
    ) -> FeatureResult<FieldChanged> {
        let event = self.set(edit);
        self.on_changed(event, ctx)?;
        Ok(event)
    }
}
