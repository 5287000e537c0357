// crates/clipscout-core/src/state.rs
// Pure session data — no egui, no ffmpeg, no runtime handles.
// Serializable via serde; everything transient is #[serde(skip)] so only the
// server URL survives a restart.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::media_types::mime_for_path;

/// Where the analysis service lives by default (the dev server's port).
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// The one file currently loaded for preview and submission.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelectedClip {
    pub id:              Uuid,
    pub path:            PathBuf,
    pub name:            String,
    /// Derived from the extension at selection time; sent with the upload.
    pub mime:            String,
    pub size_bytes:      u64,
    pub duration:        f64,
    pub duration_probed: bool,
    #[serde(default)]
    pub video_size:      Option<(u32, u32)>,
}

/// Content of the output card. Progress and results overwrite each other;
/// nothing else writes here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum OutputView {
    #[default]
    Empty,
    Analyzing,
    Result(String),
    Failed(String),
}

/// Verdict of `begin_submission` — the UI acts on each arm differently
/// (modal notification, silently ignored click, worker kick-off).
#[derive(Debug, PartialEq)]
pub enum SubmitGate {
    NoFileSelected,
    AlreadyInFlight,
    Ready(u64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// At most one clip is ever selected; replacing it supersedes the old
    /// preview entirely.
    #[serde(skip)]
    pub selected:     Option<SelectedClip>,
    #[serde(skip)]
    pub output:       OutputView,
    pub server_url:   String,

    // ── Preview transport (runtime-only) ─────────────────────────────────────
    #[serde(skip)]
    pub current_time: f64,
    #[serde(skip)]
    pub is_playing:   bool,

    // ── Submission tracking (runtime-only) ───────────────────────────────────
    /// Sequence number of the in-flight submission, or None when idle.
    /// Doubles as the "submission in progress" flag that disables the button.
    #[serde(skip)]
    pub in_flight:    Option<u64>,
    /// Monotonic tag handed to each accepted submission. A response only
    /// renders if its tag still matches `in_flight` — late responses from a
    /// superseded request are dropped instead of racing the output card.
    #[serde(skip)]
    next_seq:         u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            selected:     None,
            output:       OutputView::Empty,
            server_url:   DEFAULT_SERVER_URL.to_string(),
            current_time: 0.0,
            is_playing:   false,
            in_flight:    None,
            next_seq:     0,
        }
    }
}

impl SessionState {
    /// Replace the selection with `path`. Returns the new clip id so the
    /// caller can kick probing. Duration = 0 until the probe returns.
    pub fn select_file(&mut self, path: PathBuf, size_bytes: u64) -> Uuid {
        let name = path.file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let mime = mime_for_path(&path).to_string();
        let id   = Uuid::new_v4();

        self.selected = Some(SelectedClip {
            id,
            path,
            name,
            mime,
            size_bytes,
            duration:        0.0,
            duration_probed: false,
            video_size:      None,
        });
        self.current_time = 0.0;
        self.is_playing   = false;
        id
    }

    pub fn update_duration(&mut self, id: Uuid, seconds: f64) {
        if let Some(clip) = self.selected.as_mut().filter(|c| c.id == id) {
            clip.duration        = seconds;
            clip.duration_probed = true;
        }
    }

    pub fn update_video_size(&mut self, id: Uuid, width: u32, height: u32) {
        if let Some(clip) = self.selected.as_mut().filter(|c| c.id == id) {
            clip.video_size = Some((width, height));
        }
    }

    pub fn duration(&self) -> f64 {
        self.selected.as_ref().map(|c| c.duration).unwrap_or(0.0)
    }

    /// Aspect ratio of the selected clip's video stream, 16:9 until probed.
    pub fn video_ratio(&self) -> f32 {
        self.selected.as_ref()
            .and_then(|c| c.video_size)
            .filter(|&(w, h)| w > 0 && h > 0)
            .map(|(w, h)| w as f32 / h as f32)
            .unwrap_or(16.0 / 9.0)
    }

    /// Gate a submit action. On `Ready` the output card flips to Analyzing
    /// and the returned tag must travel with the request.
    pub fn begin_submission(&mut self) -> SubmitGate {
        if self.selected.is_none() {
            // Output stays exactly as it was — the caller notifies the user
            // and no request is issued.
            return SubmitGate::NoFileSelected;
        }
        if self.in_flight.is_some() {
            return SubmitGate::AlreadyInFlight;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight = Some(seq);
        self.output    = OutputView::Analyzing;
        SubmitGate::Ready(seq)
    }

    /// Apply a submission outcome. Returns false when `seq` is stale
    /// (superseded request) and nothing was rendered.
    pub fn finish_submission(&mut self, seq: u64, outcome: Result<String, String>) -> bool {
        if self.in_flight != Some(seq) {
            return false;
        }
        self.in_flight = None;
        self.output = match outcome {
            Ok(rendered) => OutputView::Result(rendered),
            Err(msg)     => OutputView::Failed(msg),
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_clip() -> SessionState {
        let mut s = SessionState::default();
        s.select_file(PathBuf::from("/videos/clip.mp4"), 10);
        s
    }

    #[test]
    fn submit_without_file_is_rejected_and_output_untouched() {
        let mut s = SessionState::default();
        s.output = OutputView::Result("{}".into());
        assert_eq!(s.begin_submission(), SubmitGate::NoFileSelected);
        // Prior content survives — a no-file click changes nothing on screen.
        assert_eq!(s.output, OutputView::Result("{}".into()));
        assert!(s.in_flight.is_none());
    }

    #[test]
    fn submit_with_file_enters_analyzing() {
        let mut s = state_with_clip();
        let gate = s.begin_submission();
        assert_eq!(gate, SubmitGate::Ready(0));
        assert_eq!(s.output, OutputView::Analyzing);
        assert_eq!(s.in_flight, Some(0));
    }

    #[test]
    fn second_submit_while_in_flight_is_blocked() {
        let mut s = state_with_clip();
        assert_eq!(s.begin_submission(), SubmitGate::Ready(0));
        assert_eq!(s.begin_submission(), SubmitGate::AlreadyInFlight);
    }

    #[test]
    fn stale_outcome_is_dropped() {
        let mut s = state_with_clip();
        assert_eq!(s.begin_submission(), SubmitGate::Ready(0));
        assert!(s.finish_submission(0, Ok("first".into())));

        assert_eq!(s.begin_submission(), SubmitGate::Ready(1));
        // A late duplicate of the finished request must not clobber the
        // in-flight one.
        assert!(!s.finish_submission(0, Ok("ghost".into())));
        assert_eq!(s.output, OutputView::Analyzing);

        assert!(s.finish_submission(1, Ok("second".into())));
        assert_eq!(s.output, OutputView::Result("second".into()));
    }

    #[test]
    fn failure_renders_failed_view_and_clears_flight() {
        let mut s = state_with_clip();
        let SubmitGate::Ready(seq) = s.begin_submission() else { panic!() };
        assert!(s.finish_submission(seq, Err("connection refused".into())));
        assert_eq!(s.output, OutputView::Failed("connection refused".into()));
        assert!(s.in_flight.is_none());
    }

    #[test]
    fn resubmission_after_result_starts_fresh_cycle() {
        let mut s = state_with_clip();
        let SubmitGate::Ready(a) = s.begin_submission() else { panic!() };
        s.finish_submission(a, Ok("one".into()));
        let SubmitGate::Ready(b) = s.begin_submission() else { panic!() };
        assert_ne!(a, b);
        assert_eq!(s.output, OutputView::Analyzing);
        s.finish_submission(b, Ok("two".into()));
        assert_eq!(s.output, OutputView::Result("two".into()));
    }

    #[test]
    fn selecting_a_file_captures_name_and_mime() {
        let s = state_with_clip();
        let clip = s.selected.as_ref().unwrap();
        assert_eq!(clip.name, "clip.mp4");
        assert_eq!(clip.mime, "video/mp4");
        assert_eq!(clip.size_bytes, 10);
        assert!(!clip.duration_probed);
    }

    #[test]
    fn new_selection_replaces_the_previous_clip() {
        let mut s = state_with_clip();
        let first = s.selected.as_ref().unwrap().id;
        s.current_time = 3.5;
        let second = s.select_file(PathBuf::from("/videos/other.webm"), 99);
        assert_ne!(first, second);
        assert_eq!(s.selected.as_ref().unwrap().name, "other.webm");
        // Playhead resets with the new source.
        assert_eq!(s.current_time, 0.0);
    }

    #[test]
    fn probe_updates_ignore_stale_ids() {
        let mut s = state_with_clip();
        let old = s.selected.as_ref().unwrap().id;
        s.select_file(PathBuf::from("/videos/new.mp4"), 1);
        s.update_duration(old, 120.0);
        s.update_video_size(old, 1920, 1080);
        let clip = s.selected.as_ref().unwrap();
        assert!(!clip.duration_probed);
        assert!(clip.video_size.is_none());
    }

    #[test]
    fn video_ratio_defaults_until_probed() {
        let mut s = state_with_clip();
        assert!((s.video_ratio() - 16.0 / 9.0).abs() < 1e-6);
        let id = s.selected.as_ref().unwrap().id;
        s.update_video_size(id, 1080, 1920);
        assert!((s.video_ratio() - 0.5625).abs() < 1e-4);
    }
}
