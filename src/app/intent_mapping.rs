//! Mapping von UI-Intents auf mutierende App-Commands.

use super::{AppCommand, AppIntent, AppState};

/// Übersetzt einen `AppIntent` in eine Sequenz ausführbarer `AppCommand`s.
pub fn map_intent_to_commands(state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
    match intent {
        AppIntent::OpenRequested { path } => vec![
            AppCommand::CancelEditSession,
            AppCommand::LoadDocument { path },
        ],
        AppIntent::SaveRequested { path } => vec![AppCommand::SaveDocument { path }],
        AppIntent::SelectionChanged { selection } => vec![AppCommand::SetSelection { selection }],
        AppIntent::FeatureCommandActivated { index } => {
            if state.session.is_some() {
                log::warn!("Feature-Command während einer Edit-Session ignoriert");
                return vec![];
            }
            vec![AppCommand::ActivateFeatureCommand { index }]
        }
        AppIntent::FeatureEditRequested { id, edit } => {
            vec![AppCommand::EditFeature { id, edit }]
        }
        AppIntent::FeatureDoubleClicked { id } => match &state.session {
            None => vec![AppCommand::BeginEditSession { id }],
            Some(session) if session.feature_id() == id => vec![AppCommand::CommitEditSession],
            Some(session) => {
                log::warn!(
                    "Doppelklick ignoriert: {} wird gerade bearbeitet",
                    session.label()
                );
                vec![]
            }
        },
        AppIntent::DragStarted { position } => session_only(
            state,
            AppCommand::BeginMarkerDrag { position },
        ),
        AppIntent::DragUpdated { position } => session_only(
            state,
            AppCommand::UpdateMarkerDrag { position },
        ),
        AppIntent::DragEnded => session_only(state, AppCommand::EndMarkerDrag),
        AppIntent::MarkerDeleteRequested { position } => {
            session_only(state, AppCommand::DeleteMarker { position })
        }
        AppIntent::MarkerDetachRequested { position } => {
            session_only(state, AppCommand::DetachMarker { position })
        }
        AppIntent::EditCancelRequested => session_only(state, AppCommand::CancelEditSession),
        AppIntent::ToggleControlPointsRequested { id } => {
            vec![AppCommand::ToggleControlPoints { id }]
        }
        AppIntent::DeleteFeatureRequested { id } => vec![AppCommand::DeleteFeature { id }],
        AppIntent::RecomputeAllRequested => vec![AppCommand::RecomputeAll],
        AppIntent::OptionsChanged { options } => vec![AppCommand::ApplyOptions { options }],
    }
}

/// Session-Commands nur bei aktiver Edit-Session.
fn session_only(state: &AppState, command: AppCommand) -> Vec<AppCommand> {
    if state.session.is_some() {
        vec![command]
    } else {
        vec![]
    }
}
