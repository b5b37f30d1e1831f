//! Zentrale Konfiguration für den Parametric Curve Editor.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Interaktion ─────────────────────────────────────────────────────

/// Pick-Radius (Welteinheiten): Drag-Start greift den nächsten Marker in diesem Radius.
pub const PICK_RADIUS: f64 = 0.5;
/// Halbe Länge der Tangentenlinie, auf der die Skalierungs-Marker gleiten.
pub const TANGENT_LINE_HALF_LENGTH: f64 = 1000.0;
/// Abtastpunkte pro Kante für die Live-Vorschau.
pub const PREVIEW_SAMPLES_PER_EDGE: usize = 32;

// ── Blend-Parameter ─────────────────────────────────────────────────

/// Untere Grenze der Tangentenskalierung.
pub const SCALE_MIN: f64 = -5.0;
/// Obere Grenze der Tangentenskalierung.
pub const SCALE_MAX: f64 = 5.0;
/// Schrittweite der Tangentenskalierung im Property-Editor.
pub const SCALE_STEP: f64 = 0.05;
/// Ersatzwert für eine Skalierung von exakt 0 (entartete Tangente).
pub const SCALE_EPSILON: f64 = 1e-4;
/// Schrittweite der normierten Kurvenparameter.
pub const PARAMETER_STEP: f64 = 0.05;
/// Kleinster erlaubter Konstruktionsgrad.
pub const DEGREE_MIN: usize = 1;
/// Größter erlaubter Konstruktionsgrad.
pub const DEGREE_MAX: usize = 9;
/// Länge der Tangentenstrahlen für die Orientierungsheuristik.
pub const ORIENTATION_RAY_LENGTH: f64 = 100_000.0;

// ── Profil & Geometrie ──────────────────────────────────────────────

/// Standard-Toleranz der Profil-Interpolation.
pub const DEFAULT_TOLERANCE: f64 = 1e-5;
/// Maximale Lücke beim Verbinden von Kanten und Blend (Output "Joined").
pub const JOIN_TOLERANCE: f64 = 1e-7;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird als `parametric_curve_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorOptions {
    // ── Interaktion ─────────────────────────────────────────────
    /// Pick-Radius für Marker in Welteinheiten
    pub pick_radius: f64,
    /// Halbe Länge der Tangentenlinie für Skalierungs-Marker
    pub tangent_line_half_length: f64,

    // ── Blend ───────────────────────────────────────────────────
    /// Untere Grenze der Skalierung
    pub scale_min: f64,
    /// Obere Grenze der Skalierung
    pub scale_max: f64,
    /// Schrittweite der Skalierung
    pub scale_step: f64,
    /// Ersatzwert für Skalierung 0
    pub scale_epsilon: f64,
    /// Schrittweite der normierten Parameter
    pub parameter_step: f64,
    /// Standard-Maximalgrad neuer Blend-Kurven
    pub default_degree_max: usize,
    /// Strahllänge der Orientierungsheuristik
    pub orientation_ray_length: f64,

    // ── Profil ──────────────────────────────────────────────────
    /// Standard-Toleranz neuer Profile
    pub default_tolerance: f64,
    /// Verbindungs-Toleranz für zusammengesetzte Kurven
    #[serde(default = "default_join_tolerance")]
    pub join_tolerance: f64,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            pick_radius: PICK_RADIUS,
            tangent_line_half_length: TANGENT_LINE_HALF_LENGTH,

            scale_min: SCALE_MIN,
            scale_max: SCALE_MAX,
            scale_step: SCALE_STEP,
            scale_epsilon: SCALE_EPSILON,
            parameter_step: PARAMETER_STEP,
            default_degree_max: DEGREE_MAX,
            orientation_ray_length: ORIENTATION_RAY_LENGTH,

            default_tolerance: DEFAULT_TOLERANCE,
            join_tolerance: JOIN_TOLERANCE,
        }
    }
}

/// Serde-Default für `join_tolerance` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_join_tolerance() -> f64 {
    JOIN_TOLERANCE
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("parametric_curve_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("parametric_curve_editor.toml")
    }
}
