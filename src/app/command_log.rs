//! Protokoll der ausgeführten Commands (Diagnose, CLI-Report).

use super::AppCommand;

const CAPACITY: usize = 1000;

/// Ausgeführte Commands in Reihenfolge; Drag-Ströme werden verdichtet.
#[derive(Default)]
pub struct CommandLog {
    entries: Vec<AppCommand>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Protokolliert `command`.
    ///
    /// Folgen von `UpdateMarkerDrag` behalten nur die letzte Position. Bei
    /// voller Kapazität fällt die ältere Hälfte weg.
    pub fn record(&mut self, command: &AppCommand) {
        let continues_drag = matches!(command, AppCommand::UpdateMarkerDrag { .. })
            && matches!(self.entries.last(), Some(AppCommand::UpdateMarkerDrag { .. }));
        if continues_drag {
            self.entries.pop();
        } else if self.entries.len() >= CAPACITY {
            self.entries.drain(..CAPACITY / 2);
        }
        self.entries.push(command.clone());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[AppCommand] {
        &self.entries
    }

    /// Anzahl der Commands, die das Dokument verändern können.
    pub fn document_changes(&self) -> usize {
        self.entries
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    AppCommand::LoadDocument { .. }
                        | AppCommand::ActivateFeatureCommand { .. }
                        | AppCommand::EditFeature { .. }
                        | AppCommand::CommitEditSession
                        | AppCommand::DeleteFeature { .. }
                        | AppCommand::RecomputeAll
                )
            })
            .count()
    }
}
