//! Parametric Curve Editor (headless).
//!
//! Lädt ein Dokument, berechnet alle Blend-Kurven und Profile neu, meldet
//! das Ergebnis und speichert optional unter neuem Pfad.
//!
//! Aufruf: `parametric-curve-editor <dokument.json> [--out <pfad>]`

use std::path::PathBuf;

use anyhow::{bail, Context};
use parametric_curve_editor::{AppController, AppIntent, AppState, EditorOptions, SceneRecorder};

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!(
        "Parametric Curve Editor v{} startet...",
        env!("CARGO_PKG_VERSION")
    );

    let (input, output) = parse_args(std::env::args().skip(1))?;

    // Optionen aus TOML laden (oder Standardwerte)
    let options = EditorOptions::load_from_file(&EditorOptions::config_path());
    let mut state = AppState::with_viewport(Box::new(SceneRecorder::new()), options);
    let mut controller = AppController::new();

    controller.handle_intent(&mut state, AppIntent::OpenRequested { path: input })?;

    let mut failed = 0;
    for id in state.document.feature_ids() {
        let Some(entry) = state.document.entry(id) else {
            continue;
        };
        match &entry.last_error {
            Some(e) => {
                failed += 1;
                log::error!("{}: {}", entry.label, e);
            }
            None => log::info!("{}: ok", entry.label),
        }
    }
    log::info!(
        "{} Feature(s), {} fehlgeschlagen",
        state.feature_count(),
        failed
    );

    if let Some(path) = output {
        controller.handle_intent(&mut state, AppIntent::SaveRequested { path: Some(path) })?;
    }
    log::debug!(
        "{} Command(s), davon {} mit Dokumentänderung",
        state.command_log.len(),
        state.command_log.document_changes()
    );
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<(PathBuf, Option<PathBuf>)> {
    let mut input = None;
    let mut output = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" => {
                let path = args.next().context("--out erwartet einen Pfad")?;
                output = Some(PathBuf::from(path));
            }
            _ if input.is_none() => input = Some(PathBuf::from(arg)),
            other => bail!("Unbekanntes Argument: {}", other),
        }
    }
    let input = input.context("Aufruf: parametric-curve-editor <dokument.json> [--out <pfad>]")?;
    Ok((input, output))
}
