//! Application Controller für zentrale Event-Verarbeitung.

use super::{AppCommand, AppIntent, AppState};

/// Orchestriert Host-Events und Handler auf den AppState.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    pub fn handle_intent(&mut self, state: &mut AppState, intent: AppIntent) -> anyhow::Result<()> {
        let commands = self.map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, command)?;
        }

        Ok(())
    }

    fn map_intent_to_commands(&self, state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
        super::intent_mapping::map_intent_to_commands(state, intent)
    }

    /// Führt mutierende Commands auf dem AppState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);
        use super::handlers;

        match command {
            // === Datei-I/O ===
            AppCommand::LoadDocument { path } => handlers::file_io::load(state, path)?,
            AppCommand::SaveDocument { path } => handlers::file_io::save(state, path)?,

            // === Auswahl & Commands ===
            AppCommand::SetSelection { selection } => {
                handlers::feature::set_selection(state, selection)
            }
            AppCommand::ActivateFeatureCommand { index } => {
                handlers::feature::activate_command(state, index)?
            }

            // === Features ===
            AppCommand::EditFeature { id, edit } => handlers::feature::edit(state, id, edit)?,
            AppCommand::ToggleControlPoints { id } => {
                handlers::feature::toggle_control_points(state, id)
            }
            AppCommand::DeleteFeature { id } => handlers::feature::delete(state, id),
            AppCommand::RecomputeAll => handlers::feature::recompute_all(state),

            // === Edit-Session ===
            AppCommand::BeginEditSession { id } => handlers::editing::begin_session(state, id)?,
            AppCommand::CommitEditSession => handlers::editing::commit_session(state)?,
            AppCommand::CancelEditSession => handlers::editing::cancel_session(state),
            AppCommand::BeginMarkerDrag { position } => {
                handlers::editing::begin_drag(state, position)
            }
            AppCommand::UpdateMarkerDrag { position } => {
                handlers::editing::update_drag(state, position)
            }
            AppCommand::EndMarkerDrag => handlers::editing::end_drag(state),
            AppCommand::DeleteMarker { position } => {
                handlers::editing::delete_marker(state, position)
            }
            AppCommand::DetachMarker { position } => {
                handlers::editing::detach_marker(state, position)
            }

            // === Optionen ===
            AppCommand::ApplyOptions { options } => handlers::options::apply(state, options),
        }

        Ok(())
    }
}
