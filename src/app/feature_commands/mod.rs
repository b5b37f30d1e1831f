//! Trait-basierte Feature-Commands für den Host.
//!
//! Jeder Command implementiert `FeatureCommand` und wird beim
//! `CommandRegistry` registriert. Ein Command liest die aktuelle Auswahl
//! und legt daraus neue Features im Dokument an.

mod blend;
mod profile;

pub use blend::BlendCurveCommand;
pub use profile::ConstrainedProfileCommand;

use glam::DVec3;

use super::document::{Document, FeatureId};
use super::engine::CurveConstructionEngine;
use crate::core::SubElementLink;
use crate::shared::EditorOptions;

/// Ausgewähltes Sub-Element mit optionalem Pick-Punkt.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedElement {
    pub link: SubElementLink,
    pub picked_point: Option<DVec3>,
}

impl PickedElement {
    pub fn new(link: SubElementLink, picked_point: Option<DVec3>) -> Self {
        Self { link, picked_point }
    }
}

/// Beschreibung eines Commands für Menü und Toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResources {
    pub pixmap: &'static str,
    pub menu_text: &'static str,
    pub tooltip: &'static str,
}

/// Schnittstelle aller Feature-Commands.
pub trait FeatureCommand {
    fn resources(&self) -> CommandResources;

    /// `true` wenn der Command mit der aktuellen Auswahl ausführbar ist.
    fn is_active(&self, document: &Document, selection: &[PickedElement]) -> bool;

    /// Legt aus der Auswahl neue Features an.
    fn activated(
        &self,
        document: &mut Document,
        selection: &[PickedElement],
        engine: &CurveConstructionEngine,
        options: &EditorOptions,
    ) -> anyhow::Result<Vec<FeatureId>>;
}

/// Verwaltet registrierte Feature-Commands.
pub struct CommandRegistry {
    commands: Vec<Box<dyn FeatureCommand>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Erstellt eine Registry mit Blend- und Profil-Command.
    pub fn new() -> Self {
        let mut registry = Self {
            commands: Vec::new(),
        };
        registry.register(Box::new(BlendCurveCommand));
        registry.register(Box::new(ConstrainedProfileCommand));
        registry
    }

    pub fn register(&mut self, command: Box<dyn FeatureCommand>) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn FeatureCommand> {
        self.commands.get(index).map(|c| c.as_ref())
    }

    /// Index und Ressourcen aller Commands.
    pub fn entries(&self) -> Vec<(usize, CommandResources)> {
        self.commands
            .iter()
            .enumerate()
            .map(|(i, c)| (i, c.resources()))
            .collect()
    }

    /// Index eines Commands anhand seines Menütexts.
    pub fn find(&self, menu_text: &str) -> Option<usize> {
        self.commands
            .iter()
            .position(|c| c.resources().menu_text == menu_text)
    }
}
