// crates/clipscout-core/src/commands.rs
//
// Every user action in ClipScout is expressed as an AppCommand.
// Modules emit these; app.rs processes them after the UI pass.
// Adding a new feature = add a variant here + one match arm in app.rs.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum AppCommand {
    // ── Selection ────────────────────────────────────────────────────────────
    /// Replace the selected clip with `path` (from the file dialog or a drop).
    SelectFile(PathBuf),

    // ── Preview transport ────────────────────────────────────────────────────
    Play,
    Pause,
    Stop,
    SetPlayhead(f64),

    // ── Analysis ─────────────────────────────────────────────────────────────
    /// Submit the currently selected clip to the analysis endpoint.
    /// Precondition checks (file present, nothing in flight) happen in app.rs
    /// via `SessionState::begin_submission`.
    Submit,
    /// Clear a Failed banner back to the empty output view.
    DismissFailure,
    /// The server base URL was edited in the Analyze panel.
    SetServerUrl(String),
}
