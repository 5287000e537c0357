// crates/clipscout-ui/src/modules/preview_module.rs
use super::PanelModule;
use clipscout_core::commands::AppCommand;
use clipscout_core::state::SessionState;
use clipscout_core::helpers::time::format_time;
use crate::helpers::format::fit_label;
use crate::theme::{ACCENT, DARK_BG_2, DARK_BG_3, DARK_BORDER};
use egui::{Ui, Color32, Sense, Rect, Pos2, Stroke, RichText, Vec2};

// ── Transport bar layout constants ───────────────────────────────────────────
const BAR_H:    f32 = 48.0;
const BTN_SIZE: f32 = 30.0;   // every button is this exact square
const BTN_R:    f32 = 4.0;    // button corner radius
const ICON_SZ:  f32 = 9.0;    // half-size of painted icon geometry
const GAP:      f32 = 4.0;    // gap between buttons in the same group
const SEP:      f32 = 18.0;   // gap between groups
const PAD:      f32 = 10.0;   // bar edge padding
const TIME_W:   f32 = 66.0;   // timecode width

pub struct PreviewModule {
    /// The live decoded frame for the current playhead position, set by app.rs
    /// each frame before ui() is called.
    pub current_frame: Option<egui::TextureHandle>,
    /// Poster thumbnail, shown until a decoded frame is available.
    pub thumbnail: Option<egui::TextureHandle>,
    /// Last successfully decoded frame. Held across ticks so brief scrub
    /// decode latency never flashes the thumbnail.
    held_frame: Option<egui::TextureHandle>,
}

impl PreviewModule {
    pub fn new() -> Self {
        Self { current_frame: None, thumbnail: None, held_frame: None }
    }

    /// Drop every held texture. Called when the selection is replaced so the
    /// canvas never shows a frame from the superseded file.
    pub fn clear(&mut self) {
        self.current_frame = None;
        self.thumbnail     = None;
        self.held_frame    = None;
    }
}

impl PanelModule for PreviewModule {
    fn name(&self) -> &str { "Preview" }

    fn ui(&mut self, ui: &mut Ui, state: &SessionState, cmd: &mut Vec<AppCommand>) {
        ui.vertical(|ui| {

            // ── Header ───────────────────────────────────────────────────────
            egui::Frame::new()
                .fill(DARK_BG_2)
                .inner_margin(egui::Margin { left: 8, right: 8, top: 5, bottom: 5 })
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("📺 Preview").size(12.0).strong());
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if let Some(clip) = &state.selected {
                                ui.label(
                                    RichText::new(fit_label(&clip.name, ui.available_width()))
                                        .size(11.0)
                                        .color(ACCENT),
                                );
                            } else {
                                ui.label(
                                    RichText::new("no file loaded").size(11.0).weak(),
                                );
                            }
                        });
                    });
                });

            ui.add_space(4.0);

            // ── Video Canvas ─────────────────────────────────────────────────
            // Full panel width allocated, canvas drawn centered inside it.
            let ratio   = state.video_ratio();
            let panel_w = ui.available_width();
            let panel_h = (ui.available_height() - BAR_H - 12.0).max(80.0);

            let (canvas_w, canvas_h) = {
                let h = panel_w / ratio;
                if h <= panel_h { (panel_w, h) } else { (panel_h * ratio, panel_h) }
            };

            let (outer_rect, _) = ui.allocate_exact_size(
                Vec2::new(panel_w, canvas_h), Sense::hover());
            let canvas = Rect::from_center_size(
                outer_rect.center(), Vec2::new(canvas_w, canvas_h));
            let painter = ui.painter();

            if state.is_playing {
                painter.rect_stroke(canvas.expand(2.0), 4.0,
                    Stroke::new(1.5, ACCENT.gamma_multiply(0.55)),
                    egui::StrokeKind::Outside);
            } else {
                painter.rect_stroke(canvas.expand(1.0), 4.0,
                    Stroke::new(1.0, DARK_BORDER),
                    egui::StrokeKind::Outside);
            }
            painter.rect_filled(canvas, 3.0, Color32::BLACK);

            if let Some(clip) = &state.selected {
                // Update held_frame whenever we have a fresh decoded frame so
                // scrub decode latency shows the last good frame, not the
                // thumbnail.
                if self.current_frame.is_some() {
                    self.held_frame = self.current_frame.clone();
                }
                let canvas_tex = self.held_frame.as_ref().or(self.thumbnail.as_ref());
                if let Some(tex) = canvas_tex {
                    painter.image(tex.id(), canvas,
                        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                        Color32::WHITE);
                } else {
                    // Nothing decoded yet — name + spinner
                    painter.text(
                        canvas.center() - egui::vec2(0.0, 20.0),
                        egui::Align2::CENTER_CENTER,
                        &clip.name,
                        egui::FontId::proportional(13.0),
                        Color32::from_gray(70));
                    let t  = ui.input(|i| i.time) as f32;
                    let cx = canvas.center() + egui::vec2(0.0, 20.0);
                    let r  = 12.0_f32;
                    painter.circle_stroke(cx, r, Stroke::new(1.5, Color32::from_gray(35)));
                    let a  = t * 3.5;
                    painter.line_segment(
                        [cx, cx + egui::vec2(a.cos() * r, a.sin() * r)],
                        Stroke::new(2.0, ACCENT));
                    ui.ctx().request_repaint();
                }
            } else {
                painter.text(canvas.center(), egui::Align2::CENTER_CENTER,
                    "NO FILE", egui::FontId::monospace(14.0), Color32::from_gray(40));
                painter.text(canvas.center() + egui::vec2(0.0, 24.0),
                    egui::Align2::CENTER_CENTER,
                    "open a video or drop one here",
                    egui::FontId::proportional(11.0), Color32::from_gray(55));
                let mut y = canvas.min.y;
                while y < canvas.max.y {
                    painter.line_segment(
                        [Pos2::new(canvas.min.x, y), Pos2::new(canvas.max.x, y)],
                        Stroke::new(0.5, Color32::from_rgba_unmultiplied(255, 255, 255, 3)));
                    y += 4.0;
                }
            }

            ui.add_space(6.0);

            // ── Transport Bar ─────────────────────────────────────────────────
            // Allocate the full-width bar, then position every element with
            // pure coordinate math — no egui layout pass for the controls, so
            // buttons are always the same pixel size.
            let bar_w = ui.available_width();
            let (bar_rect, _) = ui.allocate_exact_size(
                Vec2::new(bar_w, BAR_H), Sense::hover());

            let painter = ui.painter();
            painter.rect_filled(bar_rect, BTN_R, DARK_BG_3);
            painter.rect_stroke(bar_rect, BTN_R,
                Stroke::new(1.0, DARK_BORDER), egui::StrokeKind::Outside);

            let has_clip = state.selected.is_some();
            let cy = bar_rect.center().y;
            // x advances left-to-right through the content block
            let mut x = bar_rect.min.x + PAD;

            // ── Helper: one fixed-size transport button ───────────────────
            // Paints bg + border, calls draw_icon closure, returns clicked.
            macro_rules! tbtn {
                ($id:expr, $active:expr, $draw_icon:expr) => {{
                    let r = Rect::from_min_size(
                        Pos2::new(x, cy - BTN_SIZE / 2.0),
                        Vec2::splat(BTN_SIZE));
                    let resp = ui.interact(r, ui.id().with($id), Sense::click());
                    let (bg, icol) = if resp.is_pointer_button_down_on() {
                        (DARK_BG_2.gamma_multiply(0.6), Color32::WHITE)
                    } else if resp.hovered() {
                        (DARK_BG_2, ACCENT.linear_multiply(1.2))
                    } else if $active {
                        (DARK_BG_3, ACCENT)
                    } else {
                        (DARK_BG_3, Color32::from_gray(175))
                    };
                    painter.rect_filled(r, BTN_R, bg);
                    if resp.hovered() || $active {
                        painter.rect_stroke(r, BTN_R,
                            Stroke::new(1.0, ACCENT.gamma_multiply(0.35)),
                            egui::StrokeKind::Outside);
                    }
                    let c = r.center();
                    $draw_icon(c, icol);
                    x += BTN_SIZE;
                    resp.clicked() && has_clip
                }};
            }

            // ── Skip to Start ─────────────────────────────────────────────
            if tbtn!("skip_back", false, |c: Pos2, col: Color32| {
                painter.rect_filled(
                    Rect::from_center_size(
                        Pos2::new(c.x - ICON_SZ + 0.5, c.y),
                        Vec2::new(2.5, ICON_SZ * 2.0)),
                    0.5, col);
                painter.add(egui::Shape::convex_polygon(vec![
                    Pos2::new(c.x - ICON_SZ + 4.0, c.y),
                    Pos2::new(c.x + ICON_SZ - 1.0,  c.y - ICON_SZ + 1.0),
                    Pos2::new(c.x + ICON_SZ - 1.0,  c.y + ICON_SZ - 1.0),
                ], col, Stroke::NONE));
            }) {
                cmd.push(AppCommand::Stop);
            }
            x += GAP;

            // ── Play / Pause ──────────────────────────────────────────────
            let playing = state.is_playing;
            if tbtn!("play_pause", playing, |c: Pos2, col: Color32| {
                if playing {
                    // Two bars = pause
                    for ox in [-ICON_SZ * 0.45, ICON_SZ * 0.45] {
                        painter.rect_filled(
                            Rect::from_center_size(
                                Pos2::new(c.x + ox, c.y),
                                Vec2::new(3.0, ICON_SZ * 1.8)),
                            1.0, col);
                    }
                } else {
                    // Right-pointing triangle = play
                    painter.add(egui::Shape::convex_polygon(vec![
                        Pos2::new(c.x - ICON_SZ * 0.5, c.y - ICON_SZ),
                        Pos2::new(c.x - ICON_SZ * 0.5, c.y + ICON_SZ),
                        Pos2::new(c.x + ICON_SZ,        c.y),
                    ], col, Stroke::NONE));
                }
            }) {
                if state.is_playing { cmd.push(AppCommand::Pause); }
                else                { cmd.push(AppCommand::Play);  }
            }
            x += GAP;

            // ── Stop ──────────────────────────────────────────────────────
            if tbtn!("stop", false, |c: Pos2, col: Color32| {
                painter.rect_filled(
                    Rect::from_center_size(c, Vec2::splat(ICON_SZ * 1.5)),
                    1.5, col);
            }) {
                cmd.push(AppCommand::Stop);
            }
            x += SEP;

            // ── Timecode ──────────────────────────────────────────────────
            painter.text(
                Pos2::new(x, cy),
                egui::Align2::LEFT_CENTER,
                format_time(state.current_time),
                egui::FontId::monospace(12.0),
                ACCENT);
            x += TIME_W + SEP;

            // ── Seek Slider ───────────────────────────────────────────────
            // ui.put() places the widget at an exact rect we control,
            // keeping it aligned with the painted buttons.
            let seek_w = (bar_rect.max.x - PAD - x).max(40.0);
            let seek_rect = Rect::from_min_size(
                Pos2::new(x, cy - BTN_SIZE / 2.0),
                Vec2::new(seek_w, BTN_SIZE));
            let dur = state.duration().max(0.001);
            let mut t = state.current_time;
            if ui.put(seek_rect,
                egui::Slider::new(&mut t, 0.0_f64..=dur)
                    .show_value(false)
                    .trailing_fill(true)
            ).changed() && has_clip {
                cmd.push(AppCommand::SetPlayhead(t));
            }

        }); // ui.vertical
    }
}
