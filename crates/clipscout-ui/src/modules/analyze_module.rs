// crates/clipscout-ui/src/modules/analyze_module.rs
//
// AnalyzeModule: right-panel UI for submitting the selected clip to the
// analysis endpoint and showing the verdict.
//
// State machine (driven by SessionState.output / in_flight, set by app.rs
// and the AnalyzeWorker):
//
//   Empty      → user clicks "Analyze Video"
//                → app.rs gates via begin_submission, kicks AnalyzeWorker
//                → output = Analyzing, in_flight = Some(seq)
//
//   Analyzing  → UI shows spinner; the button is disabled until the
//                outcome for this seq arrives (stale seqs are dropped)
//
//   Result     → pretty-printed JSON in a scrollable monospace region
//
//   Failed     → ✗ banner with the transport/parse error + Dismiss
//
// Clicking Analyze with no file loaded never reaches this module's state —
// app.rs pops the blocking notification and leaves the output untouched.

use super::PanelModule;
use clipscout_core::commands::AppCommand;
use clipscout_core::helpers::time::format_duration;
use clipscout_core::state::{OutputView, SessionState};
use crate::helpers::format::{fit_label, format_bytes};
use crate::theme::{ACCENT, DARK_BG_2, DARK_BG_3, DARK_BORDER, DARK_TEXT_DIM, GREEN_DIM, RED_DIM};
use egui::{Color32, Margin, RichText, Stroke, Ui};

pub struct AnalyzeModule {
    /// Editable copy of the server base URL; authoritative value lives in
    /// SessionState so the worker and persistence read one place.
    server_url: String,
}

impl AnalyzeModule {
    pub fn new(server_url: &str) -> Self {
        Self { server_url: server_url.to_string() }
    }
}

impl PanelModule for AnalyzeModule {
    fn name(&self) -> &str { "Analyze" }

    fn ui(&mut self, ui: &mut Ui, state: &SessionState, cmd: &mut Vec<AppCommand>) {
        ui.vertical(|ui| {
            let in_flight = state.in_flight.is_some();

            // ── Header ────────────────────────────────────────────────────────
            egui::Frame::new()
                .fill(DARK_BG_2)
                .inner_margin(Margin { left: 8, right: 8, top: 6, bottom: 6 })
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("🔎 Analyze").size(12.0).strong());
                    });
                });

            ui.separator();

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .scroll_bar_visibility(egui::scroll_area::ScrollBarVisibility::VisibleWhenNeeded)
                .show(ui, |ui| {
                    ui.vertical(|ui| {
                        ui.add_space(4.0);
                        self.show_clip_card(ui, state);
                        ui.add_space(10.0);
                        self.show_server_settings(ui, state, cmd, in_flight);
                        ui.add_space(12.0);
                        self.show_submit_button(ui, cmd, in_flight);
                        ui.add_space(12.0);
                        self.show_output(ui, state, cmd);
                    });
                });
        });
    }
}

// ── Private helpers ───────────────────────────────────────────────────────────

impl AnalyzeModule {
    /// Selected-clip facts: name, duration, resolution, size, MIME.
    fn show_clip_card(&self, ui: &mut Ui, state: &SessionState) {
        egui::Frame::new()
            .fill(DARK_BG_3)
            .stroke(Stroke::new(1.0, DARK_BORDER))
            .corner_radius(egui::CornerRadius::same(4))
            .inner_margin(Margin::same(8))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                match &state.selected {
                    Some(clip) => {
                        ui.label(
                            RichText::new(fit_label(&clip.name, ui.available_width()))
                                .size(11.0)
                                .color(ACCENT),
                        );
                        ui.add_space(2.0);
                        let dur = if clip.duration_probed {
                            format_duration(clip.duration)
                        } else {
                            "probing…".to_string()
                        };
                        let res = clip.video_size
                            .map(|(w, h)| format!("{w}×{h}"))
                            .unwrap_or_else(|| "—".to_string());
                        ui.label(RichText::new(format!("Duration:  {dur}")).size(11.0).monospace());
                        ui.label(RichText::new(format!("Video:     {res}")).size(11.0).monospace());
                        ui.label(RichText::new(format!(
                            "Size:      {}", format_bytes(clip.size_bytes)
                        )).size(11.0).monospace());
                        ui.label(RichText::new(format!("Type:      {}", clip.mime)).size(11.0).monospace());
                    }
                    None => {
                        ui.label(
                            RichText::new("No video loaded").size(11.0).color(DARK_TEXT_DIM),
                        );
                        ui.add_space(2.0);
                        ui.label(
                            RichText::new("Open a file or drop one on the window")
                                .size(10.0).color(DARK_TEXT_DIM),
                        );
                    }
                }
            });
    }

    /// Server base URL field. The `/analyze` path is fixed by the service
    /// contract and shown read-only next to it.
    fn show_server_settings(
        &mut self,
        ui:        &mut Ui,
        state:     &SessionState,
        cmd:       &mut Vec<AppCommand>,
        in_flight: bool,
    ) {
        ui.label(RichText::new("Analysis Server").size(11.0).color(DARK_TEXT_DIM));
        ui.add_space(2.0);

        // Pick up external changes (e.g. restored storage) while not editing.
        if !ui.memory(|m| m.has_focus(egui::Id::new("server_url_edit")))
            && self.server_url != state.server_url
        {
            self.server_url = state.server_url.clone();
        }

        let resp = ui.add_enabled(
            !in_flight,
            egui::TextEdit::singleline(&mut self.server_url)
                .id(egui::Id::new("server_url_edit"))
                .desired_width(f32::INFINITY)
                .hint_text("http://127.0.0.1:5000"),
        );
        if resp.changed() {
            cmd.push(AppCommand::SetServerUrl(self.server_url.clone()));
        }

        ui.add_space(2.0);
        ui.label(
            RichText::new("POST /analyze — multipart field \"video\"")
                .size(10.0)
                .color(DARK_TEXT_DIM),
        );
    }

    /// The action control. Disabled only while a submission is in flight —
    /// clicking with no file loaded is allowed and handled upstream with a
    /// blocking notification.
    fn show_submit_button(&self, ui: &mut Ui, cmd: &mut Vec<AppCommand>, in_flight: bool) {
        let submit_btn = egui::Button::new(
            RichText::new("⚡ Analyze Video")
                .size(13.0)
                .strong()
                .color(if in_flight { Color32::DARK_GRAY } else { Color32::BLACK }),
        )
        .fill(if in_flight { DARK_BG_3 } else { ACCENT })
        .stroke(Stroke::NONE)
        .min_size(egui::vec2(ui.available_width(), 34.0));

        let response = ui.add_enabled(!in_flight, submit_btn);
        if response.clicked() {
            cmd.push(AppCommand::Submit);
        }
        if in_flight {
            response.on_hover_text("A submission is already in flight");
        }
    }

    /// The output region: progress message, rendered verdict, or failure.
    fn show_output(&self, ui: &mut Ui, state: &SessionState, cmd: &mut Vec<AppCommand>) {
        match &state.output {
            OutputView::Empty => {
                ui.label(
                    RichText::new("Results will appear here")
                        .size(10.0)
                        .color(DARK_TEXT_DIM),
                );
            }

            OutputView::Analyzing => {
                egui::Frame::new()
                    .fill(DARK_BG_3)
                    .stroke(Stroke::new(1.0, DARK_BORDER))
                    .corner_radius(egui::CornerRadius::same(4))
                    .inner_margin(Margin::same(8))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            // Painted one-arm spinner, same idiom as the
                            // preview canvas placeholder.
                            let (rect, _) = ui.allocate_exact_size(
                                egui::vec2(18.0, 18.0), egui::Sense::hover());
                            let p = ui.painter();
                            let c = rect.center();
                            let r = 7.0_f32;
                            p.circle_stroke(c, r, Stroke::new(1.5, Color32::from_gray(45)));
                            let a = ui.input(|i| i.time) as f32 * 3.5;
                            p.line_segment(
                                [c, c + egui::vec2(a.cos() * r, a.sin() * r)],
                                Stroke::new(2.0, ACCENT));
                            ui.label(RichText::new("Analyzing…").size(11.0).color(ACCENT));
                        });
                        ui.ctx().request_repaint();
                    });
            }

            OutputView::Result(rendered) => {
                ui.label(RichText::new("Result").size(11.0).color(GREEN_DIM));
                ui.add_space(2.0);
                egui::Frame::new()
                    .fill(DARK_BG_2)
                    .stroke(Stroke::new(1.0, DARK_BORDER))
                    .corner_radius(egui::CornerRadius::same(4))
                    .inner_margin(Margin::same(8))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(
                            RichText::new(rendered)
                                .size(11.0)
                                .monospace()
                                .color(Color32::from_gray(200)),
                        );
                    });
            }

            OutputView::Failed(msg) => {
                egui::Frame::new()
                    .fill(Color32::from_rgb(60, 25, 25))
                    .stroke(Stroke::new(1.0, RED_DIM))
                    .corner_radius(egui::CornerRadius::same(4))
                    .inner_margin(Margin::same(8))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(RichText::new(format!("💥  {msg}")).size(11.0).color(RED_DIM));
                    });

                ui.add_space(6.0);
                let dismiss = egui::Button::new(
                    RichText::new("Dismiss").size(11.0).color(DARK_TEXT_DIM),
                )
                .stroke(Stroke::new(1.0, DARK_BORDER))
                .fill(DARK_BG_2)
                .min_size(egui::vec2(ui.available_width(), 24.0));
                if ui.add(dismiss).clicked() {
                    cmd.push(AppCommand::DismissFailure);
                }
            }
        }
    }
}
