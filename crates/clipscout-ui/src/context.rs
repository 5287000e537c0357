// crates/clipscout-ui/src/context.rs
//
// AppContext owns all runtime handles that are NOT part of the serializable
// session state.  ClipScoutApp holds one of these plus a SessionState and the
// panel modules — nothing else.
//
// Sub-struct layout:
//   AppContext
//     ├── media_worker   — the FFmpeg worker + all channel handles
//     ├── analyze_worker — the upload thread spawner + result channel
//     └── preview: PreviewContext — textures + scrub/playback tracking

use clipscout_core::media_types::PlaybackFrame;
use clipscout_core::state::SessionState;
use clipscout_media::{MediaResult, MediaWorker};
use crate::upload::AnalyzeWorker;
use eframe::egui;
use uuid::Uuid;

// ── PreviewContext ────────────────────────────────────────────────────────────
// Everything the preview canvas needs at runtime: the GPU textures for the
// selected clip and the decode-tracking state for scrub and playback.
pub struct PreviewContext {
    /// Poster thumbnail for the selected clip (shown until a frame decodes).
    pub thumb_tex: Option<egui::TextureHandle>,

    /// Latest live-playback or scrub frame.
    pub frame_tex: Option<egui::TextureHandle>,

    /// Next-to-display playback frame, held until its PTS is due.
    /// Prevents the drain-all pattern from racing ahead of wall-clock time.
    pub pending_pb_frame: Option<PlaybackFrame>,

    /// Exact (clip_id, timestamp_secs) of the last scrub decode request.
    /// Stored as exact f64 so scrub fires on every drag pixel.
    pub last_frame_req: Option<(Uuid, f64)>,

    /// Which clip the live-playback thread is currently decoding.
    pub playback_clip: Option<Uuid>,

    /// Was is_playing true on the previous frame?  Used to detect play/stop edges.
    pub prev_playing: bool,
}

impl PreviewContext {
    fn new() -> Self {
        Self {
            thumb_tex:        None,
            frame_tex:        None,
            pending_pb_frame: None,
            last_frame_req:   None,
            playback_clip:    None,
            prev_playing:     false,
        }
    }
}

// ── AppContext ────────────────────────────────────────────────────────────────

pub struct AppContext {
    pub media_worker:   MediaWorker,
    pub analyze_worker: AnalyzeWorker,
    pub preview:        PreviewContext,
}

impl AppContext {
    pub fn new(media_worker: MediaWorker) -> Self {
        Self {
            media_worker,
            analyze_worker: AnalyzeWorker::new(),
            preview:        PreviewContext::new(),
        }
    }

    /// Release every preview resource tied to the previous selection:
    /// stop the playback pipeline, drop the textures (freeing the GPU
    /// allocations), and clear all decode tracking. Called before a new file
    /// replaces the old one, so the superseded preview is torn down
    /// explicitly rather than lingering until something overwrites it.
    pub fn release_preview(&mut self) {
        self.media_worker.stop_playback();
        self.preview.thumb_tex        = None;
        self.preview.frame_tex        = None;
        self.preview.pending_pb_frame = None;
        self.preview.last_frame_req   = None;
        self.preview.playback_clip    = None;
    }

    /// Drain the MediaWorker result channels and load everything into the
    /// preview context or session state.  Called once per frame from
    /// `app::poll_workers`, before the UI pass.
    ///
    /// scrub_rx is drained first so scrub VideoFrame results are never
    /// delayed behind probe traffic.
    pub fn ingest_media_results(
        &mut self,
        state: &mut SessionState,
        ctx:   &egui::Context,
    ) {
        // ── Scrub frames — high-priority path ─────────────────────────────────
        while let Ok(result) = self.media_worker.scrub_rx.try_recv() {
            // Only VideoFrame arrives on scrub_rx — match exhaustively so the
            // compiler warns if the channel ever carries an unexpected variant.
            if let MediaResult::VideoFrame { id, width, height, data } = result {
                self.ingest_video_frame(id, width, height, data, state, ctx);
            }
        }

        // ── Shared channel: probe results ─────────────────────────────────────
        while let Ok(result) = self.media_worker.rx.try_recv() {
            match result {
                MediaResult::Duration { id, seconds } => {
                    state.update_duration(id, seconds);
                    ctx.request_repaint();
                }

                MediaResult::Thumbnail { id, width, height, data } => {
                    if state.selected.as_ref().map(|c| c.id) != Some(id) {
                        continue; // superseded selection
                    }
                    let tex = ctx.load_texture(
                        format!("thumb-{id}"),
                        egui::ColorImage::from_rgba_unmultiplied(
                            [width as usize, height as usize], &data,
                        ),
                        egui::TextureOptions::LINEAR,
                    );
                    self.preview.thumb_tex = Some(tex);
                    ctx.request_repaint();
                }

                MediaResult::VideoSize { id, width, height } => {
                    state.update_video_size(id, width, height);
                    // Dimensions just became known — re-request the current
                    // frame so the canvas stops letterboxing at the default
                    // ratio for portrait or unusual sources.
                    if let Some(clip) = state.selected.as_ref().filter(|c| c.id == id) {
                        self.media_worker.request_frame(
                            clip.id, clip.path.clone(), state.current_time, state.video_ratio(),
                        );
                    }
                    ctx.request_repaint();
                }

                MediaResult::Error { id, msg } => {
                    eprintln!("[media] {id}: {msg}");
                    crate::clipscout_log!("[media] {id}: {msg}");
                }

                MediaResult::VideoFrame { id, width, height, data } => {
                    self.ingest_video_frame(id, width, height, data, state, ctx);
                }
            }
        }
    }

    /// Shared logic for handling a VideoFrame result.
    fn ingest_video_frame(
        &mut self,
        id:     Uuid,
        width:  u32,
        height: u32,
        data:   Vec<u8>,
        state:  &mut SessionState,
        ctx:    &egui::Context,
    ) {
        if state.selected.as_ref().map(|c| c.id) != Some(id) {
            return; // frame for a clip that was replaced mid-decode
        }

        // During playback the pb channel owns frame_tex — a late-arriving
        // scrub result would overwrite the correct playback frame with a
        // wrong-position one.  Skip the write while playing.
        if state.is_playing {
            return;
        }

        let tex = ctx.load_texture(
            format!("frame-{id}"),
            egui::ColorImage::from_rgba_unmultiplied(
                [width as usize, height as usize], &data,
            ),
            egui::TextureOptions::LINEAR,
        );
        self.preview.frame_tex = Some(tex);
        ctx.request_repaint();
    }

    /// Drain finished submissions into the output card. Stale sequence
    /// numbers are dropped by `finish_submission` (latest-wins).
    pub fn ingest_analyze_results(
        &mut self,
        state: &mut SessionState,
        ctx:   &egui::Context,
    ) {
        while let Ok(done) = self.analyze_worker.rx.try_recv() {
            if state.finish_submission(done.seq, done.outcome) {
                ctx.request_repaint();
            } else {
                eprintln!("[submit] dropped stale outcome seq={}", done.seq);
            }
        }
    }
}
