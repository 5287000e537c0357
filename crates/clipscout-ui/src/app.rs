// crates/clipscout-ui/src/app.rs (clipscout-ui)
use clipscout_core::commands::AppCommand;
use clipscout_core::state::{OutputView, SessionState, SubmitGate};
use clipscout_media::MediaWorker;
use crate::context::AppContext;
use crate::theme::configure_style;
use crate::modules::{
    PanelModule,
    analyze_module::AnalyzeModule,
    preview_module::PreviewModule,
    video_module::VideoModule,
};
use eframe::egui;
use serde::{Deserialize, Serialize};
use rfd::FileDialog;

#[derive(Serialize, Deserialize)]
struct AppStorage {
    session: SessionState,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct ClipScoutApp {
    state:        SessionState,
    context:      AppContext,
    // Panel modules as concrete types — typos are a compile error instead of
    // a silently blank panel.
    preview:      PreviewModule,
    analyze:      AnalyzeModule,
    /// Stored separately so tick() calls the concrete method, not the trait default no-op.
    video:        VideoModule,
    /// Commands emitted by modules each frame, processed after the UI pass
    pending_cmds: Vec<AppCommand>,
}

impl ClipScoutApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        configure_style(&cc.egui_ctx);
        // Pin to dark mode — prevents egui overwriting our theme on OS light/dark changes.
        cc.egui_ctx.options_mut(|o| {
            o.theme_preference = egui::ThemePreference::Dark;
        });

        // Only the server URL survives a restart; the selected file and the
        // output card are session-scoped (#[serde(skip)] in SessionState).
        let state = cc.storage
            .and_then(|s| eframe::get_value::<AppStorage>(s, eframe::APP_KEY))
            .map(|d| d.session)
            .unwrap_or_default();

        let analyze = AnalyzeModule::new(&state.server_url);
        let context = AppContext::new(MediaWorker::new());

        Self {
            state,
            context,
            preview:      PreviewModule::new(),
            analyze,
            video:        VideoModule::new(),
            pending_cmds: Vec::new(),
        }
    }

    fn process_command(&mut self, cmd: AppCommand) {
        match cmd {
            // ── Selection ────────────────────────────────────────────────────
            AppCommand::SelectFile(path) => {
                // Tear down the superseded preview before the new source
                // takes its place.
                self.context.release_preview();
                self.preview.clear();

                let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
                let id = self.state.select_file(path.clone(), size);
                crate::clipscout_log!("[app] selected {} ({id})", path.display());
                self.context.media_worker.probe_clip(id, path);
                // VideoModule::tick issues the first preview frame request.
            }

            // ── Preview transport ────────────────────────────────────────────
            AppCommand::Play => {
                let total = self.state.duration();
                if total > 0.0 && self.state.current_time >= total - 0.1 {
                    self.state.current_time = 0.0;
                }
                self.state.is_playing = true;
            }
            AppCommand::Pause => {
                self.state.is_playing = false;
            }
            AppCommand::Stop => {
                self.state.is_playing   = false;
                self.state.current_time = 0.0;
            }
            AppCommand::SetPlayhead(t) => {
                self.state.current_time = t;
                self.context.preview.pending_pb_frame = None;
                // Seeking mid-playback restarts the decode pipeline at the
                // new position; a paused seek is handled by the scrub path.
                if self.state.is_playing {
                    if let Some(clip) = &self.state.selected {
                        self.context.media_worker.start_playback(
                            clip.id, clip.path.clone(), t, self.state.video_ratio(),
                        );
                    }
                }
            }

            // ── Analysis ─────────────────────────────────────────────────────
            AppCommand::Submit => {
                match self.state.begin_submission() {
                    SubmitGate::NoFileSelected => {
                        // Blocking notification; the output card keeps its
                        // prior content and no request is issued.
                        rfd::MessageDialog::new()
                            .set_level(rfd::MessageLevel::Warning)
                            .set_title("ClipScout")
                            .set_description("Upload a video first")
                            .set_buttons(rfd::MessageButtons::Ok)
                            .show();
                    }
                    SubmitGate::AlreadyInFlight => {
                        // Button is disabled while in flight; a queued click
                        // from the same frame lands here and is ignored.
                    }
                    SubmitGate::Ready(seq) => {
                        if let Some(clip) = self.state.selected.clone() {
                            crate::clipscout_log!(
                                "[submit] seq={seq} {} → {}", clip.name, self.state.server_url
                            );
                            self.context.analyze_worker.submit(
                                seq, &clip, self.state.server_url.clone(),
                            );
                        }
                    }
                }
            }
            AppCommand::DismissFailure => {
                self.state.output = OutputView::Empty;
            }
            AppCommand::SetServerUrl(url) => {
                self.state.server_url = url;
            }
        }
    }

    fn poll_workers(&mut self, ctx: &egui::Context) {
        // Playback frame consumption (PTS-gated), then probe/scrub results,
        // then finished submissions.
        VideoModule::poll_playback(&self.state, &mut self.context, ctx);
        self.context.ingest_media_results(&mut self.state, ctx);
        self.context.ingest_analyze_results(&mut self.state, ctx);
    }

    fn handle_drag_and_drop(&mut self, ctx: &egui::Context) {
        let files = ctx.input(|i| i.raw.dropped_files.clone());
        // Single-file model: the last dropped file wins, exactly like
        // re-picking in the dialog.
        if let Some(path) = files.into_iter().rev().find_map(|f| f.path) {
            self.pending_cmds.push(AppCommand::SelectFile(path));
        }
    }
}

// ── eframe::App ───────────────────────────────────────────────────────────────

impl eframe::App for ClipScoutApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &AppStorage {
            session: self.state.clone(),
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.context.media_worker.shutdown();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_drag_and_drop(ctx);
        self.poll_workers(ctx);

        egui::TopBottomPanel::top("top_panel")
            .exact_height(36.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new("🔎 ClipScout")
                            .strong().size(15.0).color(crate::theme::ACCENT),
                    );
                    ui.separator();
                    if ui.button(egui::RichText::new("📂 Open Video…").size(12.0)).clicked() {
                        if let Some(path) = FileDialog::new()
                            .add_filter("Video", &["mp4","mov","mkv","avi","webm","m4v","mpg","mpeg"])
                            .pick_file()
                        {
                            self.pending_cmds.push(AppCommand::SelectFile(path));
                        }
                    }
                    ui.label(egui::RichText::new("or drop a video file anywhere").size(12.0).weak());
                });
            });

        egui::SidePanel::right("analyze_panel")
            .resizable(true)
            .default_width(300.0)
            .min_width(220.0)
            .show(ctx, |ui| {
                self.analyze.ui(ui, &self.state, &mut self.pending_cmds);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            // Hand PreviewModule the current textures so it renders them
            // directly; the module owns its held-frame anti-flash logic.
            self.preview.current_frame = self.context.preview.frame_tex.clone();
            self.preview.thumbnail     = self.context.preview.thumb_tex.clone();

            self.preview.ui(ui, &self.state, &mut self.pending_cmds);
        });

        // ── Process commands emitted by modules this frame ────────────────────
        let cmds: Vec<AppCommand> = self.pending_cmds.drain(..).collect();
        for cmd in cmds {
            self.process_command(cmd);
        }

        // ── Tick the non-rendering module (concrete call, not the trait no-op) ─
        VideoModule::tick(&self.state, &mut self.context);

        if self.state.is_playing {
            let dt = ctx.input(|i| i.stable_dt as f64);
            self.state.current_time += dt;
            let total = self.state.duration();
            if total > 0.0 && self.state.current_time >= total {
                self.state.current_time = total - 0.001;
                self.state.is_playing   = false;
            }
            ctx.request_repaint();
        }
    }
}
