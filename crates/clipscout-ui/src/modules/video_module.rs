// crates/clipscout-ui/src/modules/video_module.rs
//
// VideoModule owns all preview scrub/playback frame logic.
// Non-rendering module — tick() and poll_playback() are called every frame
// from app.rs. No egui panel is shown.

use clipscout_core::commands::AppCommand;
use clipscout_core::state::SessionState;
use clipscout_core::media_types::PlaybackFrame;
use crate::context::AppContext;
use super::PanelModule;
use eframe::egui;

pub struct VideoModule;

impl VideoModule {
    pub fn new() -> Self { Self }

    // ── poll_playback ─────────────────────────────────────────────────────────
    /// PTS-gated playback frame consumption. Call from app::poll_workers().
    ///
    /// The decode thread pre-fills a bounded channel as fast as FFmpeg can go.
    /// Draining all frames and showing the last races ahead at decode speed.
    /// Instead we use a one-slot pending buffer and only promote a frame to
    /// frame_tex once wall-clock current_time has caught up to its PTS.
    pub fn poll_playback(
        state:    &SessionState,
        ctx:      &mut AppContext,
        egui_ctx: &egui::Context,
    ) {
        let Some(clip_id) = state.selected.as_ref().map(|c| c.id) else { return };
        let local_t = state.current_time;

        // ── Discard a stale pending frame ─────────────────────────────────────
        // wrong_clip: the selection changed while a frame was in the slot.
        // too_old: burn_to_pts runs synchronously, so current_time advances
        // during the burn; a frame that far behind would block the slot forever.
        if let Some(pending) = &ctx.preview.pending_pb_frame {
            let wrong_clip = pending.id != clip_id;
            let too_old    = pending.timestamp < local_t - 3.0;
            if wrong_clip || too_old {
                ctx.preview.pending_pb_frame = None;
            }
        }

        // Step 1: fill the pending slot if empty.
        if ctx.preview.pending_pb_frame.is_none() {
            if let Ok(f) = ctx.media_worker.pb_rx.try_recv() {
                ctx.preview.pending_pb_frame = Some(f);
            }
        }

        // Step 2: fast-forward past overdue frames.
        while ctx.preview.pending_pb_frame
            .as_ref()
            .map(|f: &PlaybackFrame| f.timestamp < local_t - (1.0 / 30.0))
            .unwrap_or(false)
        {
            match ctx.media_worker.pb_rx.try_recv() {
                Ok(newer) => { ctx.preview.pending_pb_frame = Some(newer); }
                Err(_)    => break,
            }
        }

        // Step 3: promote the pending frame when its PTS is due.
        // Upper bound: don't show a frame more than 1 tick early.
        // Lower bound: 3.0 s covers the worst-case burn_to_pts duration.
        let frame_due = ctx.preview.pending_pb_frame.as_ref().map(|f| {
            f.timestamp <= local_t + (1.0 / 60.0) && f.timestamp >= local_t - 3.0
        }).unwrap_or(false);

        if frame_due {
            if let Some(f) = ctx.preview.pending_pb_frame.take() {
                let tex = egui_ctx.load_texture(
                    format!("pb-{}", f.id),
                    egui::ColorImage::from_rgba_unmultiplied(
                        [f.width as usize, f.height as usize], &f.data,
                    ),
                    egui::TextureOptions::LINEAR,
                );
                ctx.preview.frame_tex = Some(tex);
                egui_ctx.request_repaint();
                // Pre-pull the next frame so it's ready for the next tick.
                if let Ok(next) = ctx.media_worker.pb_rx.try_recv() {
                    ctx.preview.pending_pb_frame = Some(next);
                }
            }
        }
    }

    // ── tick ──────────────────────────────────────────────────────────────────
    /// Playback start/stop edges + paused-scrub decode requests.
    /// Call every frame from app::update().
    pub fn tick(state: &SessionState, ctx: &mut AppContext) {
        let just_started = state.is_playing && !ctx.preview.prev_playing;
        let just_stopped = !state.is_playing && ctx.preview.prev_playing;
        ctx.preview.prev_playing = state.is_playing;

        let Some(clip) = state.selected.clone() else { return };

        // ── Playback mode ─────────────────────────────────────────────────────
        if state.is_playing {
            if just_started || ctx.preview.playback_clip != Some(clip.id) {
                ctx.preview.playback_clip    = Some(clip.id);
                ctx.preview.pending_pb_frame = None;
                ctx.media_worker.start_playback(
                    clip.id, clip.path.clone(), state.current_time, state.video_ratio(),
                );
            }
            return;
        }

        // ── Transition: playing → stopped ─────────────────────────────────────
        if just_stopped {
            ctx.media_worker.stop_playback();
            ctx.preview.playback_clip    = None;
            ctx.preview.last_frame_req   = None;
            ctx.preview.pending_pb_frame = None;
        }

        // ── Paused scrub ──────────────────────────────────────────────────────
        // Any position change > ~10ms fires a new decode request. The
        // latest-wins condvar slot in the worker is the rate limiter.
        let local_t = state.current_time;
        let scrub_moved = ctx.preview.last_frame_req
            .map(|(rid, last_ts)| rid != clip.id || (last_ts - local_t).abs() > 0.010)
            .unwrap_or(true);

        if scrub_moved {
            ctx.preview.last_frame_req = Some((clip.id, local_t));
            ctx.media_worker.request_frame(
                clip.id, clip.path.clone(), local_t, state.video_ratio(),
            );
        }
    }
}

// ── PanelModule (no panel) ────────────────────────────────────────────────────

impl PanelModule for VideoModule {
    fn name(&self) -> &str { "Video" }

    fn ui(
        &mut self,
        _ui:    &mut egui::Ui,
        _state: &SessionState,
        _cmd:   &mut Vec<AppCommand>,
    ) {
        // No panel — driven entirely by tick() and poll_playback().
    }
}
