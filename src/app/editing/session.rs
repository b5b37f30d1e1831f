//! Interaktive Edit-Session eines Features.
//!
//! Die Session arbeitet auf einer Schattenkopie des Features: Constraints
//! schreiben Parameter nur in diese Kopie, die Live-Vorschau rechnet mit
//! ihr. Erst `commit` überträgt die Werte ins Dokument, `cancel` verwirft
//! sie. Overlay-Knoten und Selektionssperren werden beim Start belegt und
//! auf beiden Wegen wieder freigegeben.

use anyhow::{bail, Context};
use glam::DVec3;
use indexmap::IndexMap;

use super::constraint::ProjectionConstraint;
use super::graph::{ConnectorId, ConnectorKind, ConstraintGraph, ConstraintSolver, DragOutcome, MarkerId};
use super::pick::MarkerIndex;
use super::viewport::{preview_points, SceneHandle, SceneNode, Viewport};
use crate::app::document::{Document, FeatureId};
use crate::app::engine::CurveConstructionEngine;
use crate::app::features::blend::EdgeSlot;
use crate::app::features::{
    BlendEdit, BlendFeature, DataType, Feature, FeatureEdit, ParametricFeature, ProfileEdit,
    ProfileFeature, RecomputeContext,
};
use crate::core::{denormalize, normalize, project, GeometryResolver, SubElementLink};
use crate::shared::options::PREVIEW_SAMPLES_PER_EDGE;
use crate::shared::EditorOptions;

/// Aktive Edit-Session mit Constraint-Graph und Overlay-Ressourcen.
pub struct DragSession {
    feature_id: FeatureId,
    label: String,
    /// Stützen des Profils zu Sessionbeginn
    original_support: Vec<SubElementLink>,
    shadow: Feature,
    graph: ConstraintGraph,
    /// Blend: Marker → Index im Kontrollpolygon
    blend_poles: Vec<(MarkerId, usize)>,
    marker_nodes: IndexMap<MarkerId, SceneHandle>,
    connector_nodes: IndexMap<ConnectorId, SceneHandle>,
    preview: Option<SceneHandle>,
    locked_objects: Vec<String>,
    active: Option<MarkerId>,
    options: EditorOptions,
    engine: CurveConstructionEngine,
    released: bool,
}

impl DragSession {
    /// Startet eine Session für `id` und belegt die Overlay-Ressourcen.
    pub fn begin(
        document: &Document,
        id: FeatureId,
        options: &EditorOptions,
        engine: &CurveConstructionEngine,
        viewport: &mut dyn Viewport,
    ) -> anyhow::Result<Self> {
        let entry = document
            .entry(id)
            .with_context(|| format!("Feature {:?} nicht gefunden", id))?;
        let mut shadow = entry.feature.clone();

        let mut graph = ConstraintGraph::new();
        let mut blend_poles = Vec::new();
        let mut original_support = Vec::new();
        match &mut shadow {
            Feature::Blend(blend) => {
                if blend.curve_pts().is_empty() {
                    let ctx = RecomputeContext::new(GeometryResolver::new(&document.shapes), engine);
                    blend
                        .execute(&ctx)
                        .with_context(|| format!("{} hat keine berechnete Kurve", entry.label))?;
                }
                blend_poles = build_blend_graph(&mut graph, blend);
            }
            Feature::Profile(profile) => {
                original_support = profile.support().to_vec();
                build_profile_graph(&mut graph, profile)?;
            }
        }

        let mut locked_objects = shadow.input_objects();
        locked_objects.push(entry.label.clone());
        for object in &locked_objects {
            viewport.set_selectable(object, false);
        }

        let mut session = Self {
            feature_id: id,
            label: entry.label.clone(),
            original_support,
            shadow,
            graph,
            blend_poles,
            marker_nodes: IndexMap::new(),
            connector_nodes: IndexMap::new(),
            preview: None,
            locked_objects,
            active: None,
            options: options.clone(),
            engine: engine.clone(),
            released: false,
        };
        session.acquire_nodes(viewport);
        log::info!(
            "Edit-Session für {} gestartet ({} Marker)",
            session.label,
            session.graph.marker_count()
        );
        Ok(session)
    }

    pub fn feature_id(&self) -> FeatureId {
        self.feature_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Schattenkopie mit den Live-Werten der Session.
    pub fn shadow(&self) -> &Feature {
        &self.shadow
    }

    pub fn graph(&self) -> &ConstraintGraph {
        &self.graph
    }

    /// Positionen aller Marker in Aufbaureihenfolge.
    pub fn marker_positions(&self) -> Vec<DVec3> {
        self.graph.markers().map(|(_, m)| m.position).collect()
    }

    /// Nächster nicht gelöschter Marker im Pick-Radius.
    pub fn pick(&self, point: DVec3) -> Option<MarkerId> {
        MarkerIndex::from_graph(&self.graph)
            .nearest(point, self.options.pick_radius)
            .map(|(id, _)| id)
    }

    /// Greift den Marker nahe `point`. `false` wenn keiner im Radius liegt.
    pub fn begin_drag(&mut self, point: DVec3) -> bool {
        self.active = self.pick(point);
        self.active.is_some()
    }

    /// Zieht den gegriffenen Marker zur Rohposition `raw`.
    pub fn drag_to(
        &mut self,
        document: &Document,
        raw: DVec3,
        viewport: &mut dyn Viewport,
    ) -> DragOutcome {
        match self.active {
            Some(marker) => self.drag_marker(document, marker, raw, viewport),
            None => DragOutcome::Rejected,
        }
    }

    /// Lässt den gegriffenen Marker los.
    pub fn end_drag(&mut self) -> Option<MarkerId> {
        self.active.take()
    }

    /// Ein Drag-Ereignis auf `marker`: Constraints, Verbinder, Live-Vorschau.
    pub fn drag_marker(
        &mut self,
        document: &Document,
        marker: MarkerId,
        raw: DVec3,
        viewport: &mut dyn Viewport,
    ) -> DragOutcome {
        let resolver = GeometryResolver::new(&document.shapes);
        let outcome = {
            let mut solver = SessionSolver {
                shadow: &mut self.shadow,
                resolver,
                options: &self.options,
            };
            self.graph.drag(marker, raw, &mut solver)
        };
        if outcome == DragOutcome::Rejected {
            return outcome;
        }

        self.refresh_shadow(resolver);
        self.refresh_nodes(viewport);
        outcome
    }

    /// Löscht den Marker nahe `point` (nur Profil). Abhängige Verbinder
    /// entfernen sich bei ihrer nächsten Aktualisierung.
    pub fn delete_marker(
        &mut self,
        document: &Document,
        point: DVec3,
        viewport: &mut dyn Viewport,
    ) -> bool {
        if !matches!(self.shadow, Feature::Profile(_)) {
            log::warn!("Blend-Marker können nicht gelöscht werden");
            return false;
        }
        let Some(marker) = self.pick(point) else {
            return false;
        };
        if !self.graph.mark_deleted(marker) {
            return false;
        }
        self.graph.propagate(marker);
        if self.active == Some(marker) {
            self.active = None;
        }
        self.refresh_shadow(GeometryResolver::new(&document.shapes));
        self.refresh_nodes(viewport);
        log::debug!("Marker {:?} gelöscht", marker);
        true
    }

    /// Löst den Marker nahe `point` von seiner Stütze (nur Profil).
    pub fn detach_support(&mut self, document: &Document, point: DVec3) -> bool {
        if !matches!(self.shadow, Feature::Profile(_)) {
            return false;
        }
        let Some(marker) = self.pick(point) else {
            return false;
        };
        if !self.graph.detach_support(marker) {
            return false;
        }
        self.refresh_shadow(GeometryResolver::new(&document.shapes));
        log::debug!("Marker {:?} ist jetzt frei", marker);
        true
    }

    /// Überträgt die Endwerte der Session ins Dokument und gibt die Ressourcen frei.
    pub fn commit(
        mut self,
        document: &mut Document,
        viewport: &mut dyn Viewport,
    ) -> anyhow::Result<bool> {
        self.release(viewport);
        let edits: Vec<FeatureEdit> = match &self.shadow {
            Feature::Blend(blend) => [EdgeSlot::First, EdgeSlot::Second]
                .into_iter()
                .flat_map(|slot| {
                    [
                        BlendEdit::parameter(slot, blend.parameter(slot)),
                        BlendEdit::scale(slot, blend.scale(slot)),
                    ]
                })
                .map(FeatureEdit::Blend)
                .collect(),
            Feature::Profile(_) => vec![FeatureEdit::Profile(self.profile_edit())],
        };
        let ok = document.apply_edits(self.feature_id, edits, &self.engine)?;
        log::info!("Edit-Session für {} übernommen", self.label);
        Ok(ok)
    }

    /// Verwirft die Session; das Feature im Dokument bleibt unverändert.
    pub fn cancel(mut self, viewport: &mut dyn Viewport) {
        self.release(viewport);
        log::info!("Edit-Session für {} abgebrochen", self.label);
    }

    /// Support/Data/DataType aus den Markern in Aufbaureihenfolge.
    ///
    /// Ein Marker bleibt gebunden, solange er lebt, seine Stütze behält und
    /// diese zu den Stützen bei Sessionbeginn gehört. Gelöschte Marker
    /// werden zu freien Punkten an ihrer letzten Position.
    fn profile_edit(&self) -> ProfileEdit {
        let mut support = Vec::new();
        let mut data = Vec::with_capacity(self.graph.marker_count());
        let mut data_type = Vec::with_capacity(self.graph.marker_count());
        for (_, marker) in self.graph.markers() {
            data.push(marker.position);
            let link = marker
                .constraints
                .iter()
                .find_map(ProjectionConstraint::support_link)
                .filter(|link| !marker.deleted && self.original_support.contains(link));
            match link {
                Some(link) => {
                    support.push(link.clone());
                    data_type.push(DataType::OnSupport);
                }
                None => data_type.push(DataType::Free),
            }
        }
        ProfileEdit::ReplaceAll {
            support,
            data,
            data_type,
        }
    }

    /// Rechnet die Schattenkopie neu und zieht die Blend-Marker auf die neuen Pole nach.
    fn refresh_shadow(&mut self, resolver: GeometryResolver<'_>) {
        if let Feature::Profile(_) = self.shadow {
            let edit = self.profile_edit();
            if let Feature::Profile(profile) = &mut self.shadow {
                profile.set(edit);
            }
        }
        let ctx = RecomputeContext::new(resolver, &self.engine);
        if let Err(e) = self.shadow.execute(&ctx) {
            log::warn!("{}: Vorschau nicht berechenbar: {}", self.label, e);
            return;
        }
        if let Feature::Blend(blend) = &self.shadow {
            let poles = blend.curve_pts().to_vec();
            for (marker, index) in &self.blend_poles {
                if let Some(pole) = poles.get(*index) {
                    self.graph.set_position(*marker, *pole);
                }
            }
        }
    }

    fn acquire_nodes(&mut self, viewport: &mut dyn Viewport) {
        for (id, marker) in self.graph.markers() {
            let handle = viewport.add_node(SceneNode::Marker {
                position: marker.position,
            });
            self.marker_nodes.insert(id, handle);
        }
        for (id, connector) in self.graph.connectors() {
            let handle = viewport.add_node(connector_node(connector.kind, connector.vertices()));
            self.connector_nodes.insert(id, handle);
        }
        let points = self.preview_points();
        self.preview = Some(viewport.add_node(SceneNode::Curve { points }));
    }

    fn refresh_nodes(&mut self, viewport: &mut dyn Viewport) {
        for (id, marker) in self.graph.markers() {
            let Some(handle) = self.marker_nodes.get(&id).copied() else {
                continue;
            };
            if marker.deleted {
                viewport.remove_node(handle);
                self.marker_nodes.shift_remove(&id);
            } else {
                viewport.update_node(
                    handle,
                    SceneNode::Marker {
                        position: marker.position,
                    },
                );
            }
        }
        for (id, connector) in self.graph.connectors() {
            let Some(handle) = self.connector_nodes.get(&id).copied() else {
                continue;
            };
            if connector.is_deleted() {
                viewport.remove_node(handle);
                self.connector_nodes.shift_remove(&id);
            } else {
                viewport.update_node(handle, connector_node(connector.kind, connector.vertices()));
            }
        }
        if let Some(handle) = self.preview {
            let points = self.preview_points();
            viewport.update_node(handle, SceneNode::Curve { points });
        }
    }

    fn preview_points(&self) -> Vec<DVec3> {
        self.shadow
            .shape()
            .map(|shape| preview_points(shape, PREVIEW_SAMPLES_PER_EDGE))
            .unwrap_or_default()
    }

    /// Gibt alle Overlay-Knoten frei und hebt die Selektionssperren auf.
    fn release(&mut self, viewport: &mut dyn Viewport) {
        if self.released {
            return;
        }
        for (_, handle) in self.marker_nodes.drain(..) {
            viewport.remove_node(handle);
        }
        for (_, handle) in self.connector_nodes.drain(..) {
            viewport.remove_node(handle);
        }
        if let Some(handle) = self.preview.take() {
            viewport.remove_node(handle);
        }
        for object in &self.locked_objects {
            viewport.set_selectable(object, true);
        }
        self.released = true;
    }
}

impl Drop for DragSession {
    fn drop(&mut self) {
        if !self.released {
            log::warn!(
                "Edit-Session für {} ohne commit/cancel verworfen, Overlay bleibt bestehen",
                self.label
            );
        }
    }
}

fn connector_node(kind: ConnectorKind, vertices: &[DVec3]) -> SceneNode {
    match kind {
        ConnectorKind::Line => SceneNode::Line {
            vertices: vertices.to_vec(),
        },
        ConnectorKind::Polygon => SceneNode::Polygon {
            vertices: vertices.to_vec(),
        },
    }
}

/// Marker für Endpunkte und Skalierungspunkte des Kontrollpolygons,
/// verbunden durch Linien in Polygonreihenfolge.
fn build_blend_graph(graph: &mut ConstraintGraph, blend: &BlendFeature) -> Vec<(MarkerId, usize)> {
    let poles = blend.curve_pts();
    let last = poles.len().saturating_sub(1);
    let mut roles = vec![(0, ProjectionConstraint::OnEdge { slot: EdgeSlot::First })];
    if blend.continuity(EdgeSlot::First).order() >= 1 {
        roles.push((1, ProjectionConstraint::OnTangentLine { slot: EdgeSlot::First }));
    }
    if blend.continuity(EdgeSlot::Second).order() >= 1 {
        roles.push((
            last.saturating_sub(1),
            ProjectionConstraint::OnTangentLine {
                slot: EdgeSlot::Second,
            },
        ));
    }
    roles.push((last, ProjectionConstraint::OnEdge { slot: EdgeSlot::Second }));

    let markers: Vec<(MarkerId, usize)> = roles
        .into_iter()
        .filter_map(|(index, constraint)| {
            let pole = poles.get(index)?;
            Some((graph.add_marker(*pole, vec![constraint]), index))
        })
        .collect();
    for pair in markers.windows(2) {
        graph.add_connector(ConnectorKind::Line, vec![pair[0].0, pair[1].0]);
    }
    markers
}

/// Ein Marker pro Datenpunkt, gebundene Punkte mit ihrer Stütze; ein Polygon über alle.
fn build_profile_graph(graph: &mut ConstraintGraph, profile: &ProfileFeature) -> anyhow::Result<()> {
    if let Err(e) = profile.check_shape() {
        bail!("Profil nicht editierbar: {}", e);
    }
    let markers: Vec<MarkerId> = profile
        .data()
        .iter()
        .zip(profile.point_supports())
        .map(|(point, support)| {
            let constraints = support
                .map(|link| vec![ProjectionConstraint::OnSupport { link: link.clone() }])
                .unwrap_or_default();
            graph.add_marker(*point, constraints)
        })
        .collect();
    graph.add_connector(ConnectorKind::Polygon, markers);
    Ok(())
}

/// Löst Constraints gegen die Dokumentgeometrie und schreibt Parameter in die Schattenkopie.
struct SessionSolver<'s, 'a> {
    shadow: &'s mut Feature,
    resolver: GeometryResolver<'a>,
    options: &'s EditorOptions,
}

impl ConstraintSolver for SessionSolver<'_, '_> {
    fn solve(&mut self, constraint: &ProjectionConstraint, position: DVec3) -> Option<DVec3> {
        match constraint {
            ProjectionConstraint::OnEdge { slot } => {
                let Feature::Blend(blend) = &mut *self.shadow else {
                    return None;
                };
                let edge = self.resolver.resolve_edge(blend.edge(*slot)).ok()?;
                let projection = project(edge, position);
                let raw = projection.parameter?;
                blend.set(BlendEdit::parameter(*slot, normalize(edge, raw)));
                Some(projection.point)
            }
            ProjectionConstraint::OnTangentLine { slot } => {
                let Feature::Blend(blend) = &mut *self.shadow else {
                    return None;
                };
                let other = match slot {
                    EdgeSlot::First => EdgeSlot::Second,
                    EdgeSlot::Second => EdgeSlot::First,
                };
                let edge = self.resolver.resolve_edge(blend.edge(*slot)).ok()?;
                let other_edge = self.resolver.resolve_edge(blend.edge(other)).ok()?;
                let t = denormalize(edge, blend.parameter(*slot));
                let origin = edge.point_at(t);
                let chord = origin
                    .distance(other_edge.point_at(denormalize(other_edge, blend.parameter(other))));
                if chord < f64::EPSILON {
                    return None;
                }
                let unit = edge.tangent_at(t).try_normalize()?;
                let (_, along) = curve_kernel::project_onto_line(
                    position,
                    origin,
                    unit,
                    self.options.tangent_line_half_length,
                )?;

                // Pol = Ursprung + Tangente * Skalierung * Sehne / Grad
                let degree = blend.construction_degree() as f64;
                blend.set(BlendEdit::scale(*slot, along * degree / chord));
                Some(origin + unit * blend.scale(*slot) * chord / degree)
            }
            ProjectionConstraint::OnSupport { link } => self
                .resolver
                .project_onto_element(link, position)
                .ok()
                .map(|p| p.point),
        }
    }
}
