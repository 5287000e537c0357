// crates/clipscout-ui/src/upload.rs
//
// AnalyzeWorker: carries one submission at a time from the UI to the
// /analyze endpoint on a background thread.
//
// Each submission is tagged with the sequence number handed out by
// SessionState::begin_submission. The UI thread only renders an outcome
// whose tag still matches the in-flight submission, so a response that
// arrives after its request was superseded is dropped instead of racing
// the output card.

use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, Receiver, Sender};

use clipscout_core::multipart::MultipartForm;
use clipscout_core::render::pretty_json;
use clipscout_core::state::SelectedClip;

/// Outcome of one submission, delivered on the worker channel.
/// `Ok` carries the pretty-printed JSON ready for display; `Err` carries a
/// human-readable failure description.
pub struct AnalyzeOutcome {
    pub seq:     u64,
    pub outcome: Result<String, String>,
}

pub struct AnalyzeWorker {
    pub rx: Receiver<AnalyzeOutcome>,
    tx:     Sender<AnalyzeOutcome>,
}

impl AnalyzeWorker {
    pub fn new() -> Self {
        let (tx, rx) = bounded(8);
        Self { rx, tx }
    }

    /// Spawn a thread that reads the file, uploads it, and reports back.
    /// The thread owns everything it needs — nothing blocks the UI.
    pub fn submit(&self, seq: u64, clip: &SelectedClip, server_url: String) {
        let tx   = self.tx.clone();
        let path = clip.path.clone();
        let name = clip.name.clone();
        let mime = clip.mime.clone();
        thread::spawn(move || {
            // Errors cross the channel as display strings — the UI thread has
            // no use for the error types themselves.
            let outcome = run_submission(&path, &name, &mime, &server_url)
                .map_err(|e| format!("{e:#}"));
            if let Err(msg) = &outcome {
                eprintln!("[submit] seq={seq} failed: {msg}");
            }
            let _ = tx.send(AnalyzeOutcome { seq, outcome });
        });
    }
}

/// `base` with the fixed endpoint path appended. Trailing slashes on the
/// configured URL are tolerated.
fn endpoint_url(base: &str) -> String {
    format!("{}/analyze", base.trim_end_matches('/'))
}

fn run_submission(
    path:       &PathBuf,
    filename:   &str,
    mime:       &str,
    server_url: &str,
) -> Result<String> {
    let url = endpoint_url(server_url);

    let bytes = std::fs::read(path)
        .with_context(|| format!("read {}", path.display()))?;

    let mut form = MultipartForm::new();
    form.add_file("video", filename, mime, &bytes);
    let (content_type, body) = form.finish();

    eprintln!("[submit] POST {url} ({} bytes)", body.len());

    // The client contract does no status branching — a 500 with a JSON body
    // renders exactly like a 200, so HTTP error statuses must not become
    // transport errors here.
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .into();

    let resp = agent.post(&url)
        .header("Content-Type", content_type.as_str())
        .send(&body[..])
        .with_context(|| format!("POST {url}"))?;

    let text = resp.into_body()
        .read_to_string()
        .context("read response body")?;

    pretty_json(&text).context("response is not valid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_fixed_path() {
        assert_eq!(endpoint_url("http://127.0.0.1:5000"), "http://127.0.0.1:5000/analyze");
    }

    #[test]
    fn trailing_slash_is_tolerated() {
        assert_eq!(endpoint_url("http://host:8000/"), "http://host:8000/analyze");
    }
}
