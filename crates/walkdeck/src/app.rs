use eframe::egui;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::deck::Deck;
use crate::images::ImageCache;
use crate::media::{MediaPlayer, PlaybackToggle};
use crate::player::Player;
use crate::theme::Theme;
use crate::timeline::builder;
use crate::timeline::interaction::{GestureEnd, StripState};
use crate::timeline::sync;
use crate::watcher::DeckWatcher;

const PADDING: f32 = 24.0;
const STRIP_HEIGHT: f32 = 96.0;
const BAR_HEIGHT: f32 = 6.0;
const BUTTON_RADIUS: f32 = 26.0;
const TOAST_DURATION: f32 = 2.0;
/// Edge indicators settle once more shortly after startup, when the first
/// layout pass is done.
const INDICATOR_SETTLE: f32 = 0.1;

/// Transient "Play"/"Pause" badge; re-toggling replaces it, which restarts
/// the 2-second window and cancels the pending hide.
struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        let fade_start = TOAST_DURATION - 0.5;
        if elapsed < fade_start {
            1.0
        } else if elapsed < TOAST_DURATION {
            1.0 - (elapsed - fade_start) / (TOAST_DURATION - fade_start)
        } else {
            0.0
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= TOAST_DURATION
    }
}

/// Per-frame rectangles for the fixed widget layout: phone viewport on the
/// left flanked by the nav buttons, description panel on the right, timeline
/// strip along the bottom.
struct FrameLayout {
    viewport: egui::Rect,
    description: egui::Rect,
    prev_button: egui::Pos2,
    next_button: egui::Pos2,
    strip: egui::Rect,
}

fn compute_layout(rect: egui::Rect) -> FrameLayout {
    let strip = egui::Rect::from_min_max(
        egui::pos2(rect.left() + PADDING, rect.bottom() - PADDING - STRIP_HEIGHT),
        egui::pos2(rect.right() - PADDING, rect.bottom() - PADDING),
    );

    let main = egui::Rect::from_min_max(
        egui::pos2(rect.left() + PADDING, rect.top() + PADDING),
        egui::pos2(rect.right() - PADDING, strip.top() - PADDING),
    );

    // Portrait phone frame, flanked by the prev/next buttons
    let viewport_h = main.height();
    let viewport_w = (viewport_h * 9.0 / 16.0).min(main.width() * 0.42);
    let viewport_left = main.left() + BUTTON_RADIUS * 2.0 + PADDING;
    let viewport = egui::Rect::from_min_size(
        egui::pos2(viewport_left, main.top()),
        egui::vec2(viewport_w, viewport_h),
    );

    let prev_button = egui::pos2(main.left() + BUTTON_RADIUS, viewport.center().y);
    let next_button = egui::pos2(
        viewport.right() + PADDING + BUTTON_RADIUS,
        viewport.center().y,
    );

    let description = egui::Rect::from_min_max(
        egui::pos2(next_button.x + BUTTON_RADIUS + PADDING, main.top()),
        main.right_bottom(),
    );

    FrameLayout {
        viewport,
        description,
        prev_button,
        next_button,
        strip,
    }
}

struct WalkdeckApp {
    player: Player,
    theme: Theme,
    images: ImageCache,
    strip: StripState,
    stage_colors: HashMap<String, egui::Color32>,
    toast: Option<Toast>,
    deck_path: PathBuf,
    watcher: Option<DeckWatcher>,
    started: Instant,
    indicators_settled: bool,
    was_visible: bool,
}

impl WalkdeckApp {
    fn new(deck_path: PathBuf, player: Player, theme: Theme) -> Self {
        let base_path = Deck::base_path(&deck_path);
        let stage_colors = assign_stage_colors(&player, &theme);
        let watcher = match DeckWatcher::new(&deck_path) {
            Ok(w) => Some(w),
            Err(e) => {
                tracing::warn!("Deck watching disabled: {e}");
                None
            }
        };
        Self {
            player,
            theme,
            images: ImageCache::new(base_path),
            strip: StripState::default(),
            stage_colors,
            toast: None,
            deck_path,
            watcher,
            started: Instant::now(),
            indicators_settled: false,
            was_visible: true,
        }
    }

    fn max_scroll(&self, container_width: f32) -> f32 {
        (self.player.timeline().total_width() - container_width).max(0.0)
    }

    /// Center the active segment after a navigation commit.
    fn recenter_strip(&mut self, container_width: f32) {
        let Some(position) = self.player.marks().active else {
            return;
        };
        let target = sync::centering_offset(self.player.timeline(), position, container_width);
        self.strip
            .scroll_towards(target, self.max_scroll(container_width));
    }

    fn reload_deck(&mut self, ctx: &egui::Context) {
        let deck = match Deck::load(&self.deck_path) {
            Ok(deck) => deck,
            Err(e) => {
                tracing::warn!("Deck reload failed, keeping the old deck: {e}");
                return;
            }
        };
        tracing::info!("Reloading {}", self.deck_path.display());
        let font = egui::FontId::proportional(self.theme.timeline_label_size);
        let timeline = builder::build(&deck.slides, |text| {
            ctx.fonts_mut(|f| {
                f.layout_no_wrap(text.to_string(), font.clone(), egui::Color32::WHITE)
                    .rect
                    .width()
            })
        });
        self.images.clear();
        self.player.reload(deck, timeline);
        self.stage_colors = assign_stage_colors(&self.player, &self.theme);
        self.strip.jump_to_start();
        self.indicators_settled = false;
        self.started = Instant::now();
    }

    fn show_toggle_toast(&mut self, toggle: PlaybackToggle) {
        self.toast = Some(Toast::new(match toggle {
            PlaybackToggle::Resumed => "Play",
            PlaybackToggle::Paused => "Pause",
        }));
    }

    /// Pointer interaction for the whole frame: nav buttons, viewport
    /// click-to-advance (or clip toggle), and the strip's drag/click gesture.
    fn handle_pointer(&mut self, ctx: &egui::Context, layout: &FrameLayout) {
        let (pressed, down, pos) = ctx.input(|i| {
            (
                i.pointer.button_pressed(egui::PointerButton::Primary),
                i.pointer.button_down(egui::PointerButton::Primary),
                i.pointer.hover_pos(),
            )
        });

        // An active strip gesture follows the pointer anywhere on screen,
        // like a document-level mouse capture
        if self.strip.gesture_active() {
            if down {
                if let Some(p) = pos {
                    let max = self.max_scroll(layout.strip.width());
                    self.strip.drag_to(p.x, max);
                }
                ctx.set_cursor_icon(egui::CursorIcon::Grabbing);
                ctx.request_repaint();
                return;
            }
            // Released: a click (not a drag) on a segment navigates
            if self.strip.end_gesture() == Some(GestureEnd::Click) {
                if let Some(p) = pos {
                    if let Some(slide) = self.segment_slide_at(p, layout) {
                        if self.player.jump_to(slide).is_some() {
                            self.recenter_strip(layout.strip.width());
                        }
                    }
                }
            }
            return;
        }

        let Some(p) = pos else { return };
        if !pressed {
            return;
        }

        if layout.strip.contains(p) {
            self.strip.begin_gesture(p.x);
        } else if layout.prev_button.distance(p) <= BUTTON_RADIUS {
            if self.player.advance_previous().is_some() {
                self.recenter_strip(layout.strip.width());
            }
        } else if layout.next_button.distance(p) <= BUTTON_RADIUS {
            self.player.advance_next();
        } else if layout.viewport.contains(p) {
            // A slide with a clip toggles playback; an image slide advances
            if self.player.slide().has_video() {
                if let Some(toggle) = self.player.toggle_playback() {
                    self.show_toggle_toast(toggle);
                }
            } else {
                self.player.advance_next();
            }
        }
    }

    /// Which slide owns the segment under the pointer, honoring the scroll
    /// offset.
    fn segment_slide_at(&self, pos: egui::Pos2, layout: &FrameLayout) -> Option<usize> {
        if !layout.strip.contains(pos) {
            return None;
        }
        let x = pos.x - layout.strip.left() + self.strip.offset;
        let model = self.player.timeline();
        let mut left = 0.0;
        for segment in &model.segments {
            if x >= left && x < left + segment.width {
                return Some(segment.slide);
            }
            left += segment.width;
        }
        None
    }

    fn draw_viewport(&self, ui: &egui::Ui, ctx: &egui::Context, rect: egui::Rect) {
        let painter = ui.painter();
        painter.rect_filled(rect, 12.0, self.theme.viewport_background);

        // Still image, or the clip's poster while it plays
        let slide = self.player.slide();
        let source = slide
            .video
            .as_ref()
            .and_then(|clip| clip.poster.as_deref())
            .or(slide.image.as_deref());
        if let Some(path) = source {
            if let Some(texture) = self.images.get(ctx, path) {
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                let image_rect = fit_rect(rect, texture.aspect_ratio());
                painter.image(texture.id(), image_rect, uv, egui::Color32::WHITE);
            }
        }

        // Clip progress along the bottom edge
        if let Some(session) = self.player.media().session() {
            let progress_rect = egui::Rect::from_min_max(
                egui::pos2(rect.left(), rect.bottom() - 4.0),
                egui::pos2(
                    rect.left() + rect.width() * session.progress(),
                    rect.bottom(),
                ),
            );
            painter.rect_filled(progress_rect, 2.0, self.theme.accent);
        }

        // Tap indicator during forward transitions
        if let Some(tap) = self.player.tap() {
            let view = tap.view();
            if view.visible {
                let center = egui::pos2(
                    rect.left() + rect.width() * (tap.x / 100.0),
                    rect.top() + rect.height() * (tap.y / 100.0),
                );
                if view.pulsing {
                    painter.circle_filled(
                        center,
                        24.0,
                        Theme::with_opacity(self.theme.accent, 0.35),
                    );
                }
                painter.circle_filled(center, 10.0, Theme::with_opacity(egui::Color32::WHITE, 0.9));
                painter.circle_stroke(
                    center,
                    16.0,
                    egui::Stroke::new(2.0, Theme::with_opacity(self.theme.accent, 0.9)),
                );
            }
        }
    }

    fn draw_nav_button(&self, ui: &egui::Ui, center: egui::Pos2, forward: bool) {
        let painter = ui.painter();
        painter.circle_filled(center, BUTTON_RADIUS, self.theme.panel_background);

        // First-slide ring invites the first tap
        if forward && self.player.on_first_slide() {
            painter.circle_stroke(
                center,
                BUTTON_RADIUS + 3.0,
                egui::Stroke::new(3.0, self.theme.accent),
            );
        }

        let arrow = if forward { "\u{2192}" } else { "\u{2190}" };
        let galley = painter.layout_no_wrap(
            arrow.to_string(),
            egui::FontId::proportional(22.0),
            self.theme.foreground,
        );
        let pos = egui::pos2(
            center.x - galley.rect.width() / 2.0,
            center.y - galley.rect.height() / 2.0,
        );
        painter.galley(pos, galley, self.theme.foreground);
    }

    fn draw_description(&self, ui: &egui::Ui, rect: egui::Rect) {
        let painter = ui.painter();
        let slide = self.player.slide();

        let mut y = rect.top();
        if let Some(title) = &slide.title {
            let galley = painter.layout_no_wrap(
                title.clone(),
                egui::FontId::proportional(self.theme.title_size),
                self.theme.heading_color,
            );
            painter.galley(egui::pos2(rect.left(), y), galley, self.theme.heading_color);
            y += self.theme.title_size + 16.0;
        }

        if let Some(description) = &slide.description {
            let galley = painter.layout(
                description.clone(),
                egui::FontId::proportional(self.theme.body_size),
                self.theme.foreground,
                rect.width(),
            );
            painter.galley(egui::pos2(rect.left(), y), galley, self.theme.foreground);
        }

        // Slide counter
        let counter = format!(
            "{} / {}",
            self.player.current() + 1,
            self.player.slide_count()
        );
        let counter_color = Theme::with_opacity(self.theme.foreground, 0.3);
        let galley = painter.layout_no_wrap(counter, egui::FontId::monospace(14.0), counter_color);
        painter.galley(
            egui::pos2(
                rect.right() - galley.rect.width(),
                rect.bottom() - galley.rect.height(),
            ),
            galley,
            counter_color,
        );

        if let Some(footer) = &self.player.deck().footer {
            let footer_color = Theme::with_opacity(self.theme.foreground, 0.4);
            let galley =
                painter.layout_no_wrap(footer.clone(), egui::FontId::proportional(13.0), footer_color);
            painter.galley(
                egui::pos2(rect.left(), rect.bottom() - galley.rect.height()),
                galley,
                footer_color,
            );
        }
    }

    fn draw_strip(&self, ui: &mut egui::Ui, rect: egui::Rect) {
        let model = self.player.timeline();
        if model.is_empty() {
            return;
        }
        let marks = self.player.marks();

        let child = ui.new_child(egui::UiBuilder::new().max_rect(rect).id_salt("strip_clip"));
        let painter = child.painter();

        let bar_y = rect.top() + 18.0;
        for (position, segment) in model.segments.iter().enumerate() {
            let left = rect.left() + model.segment_left(position) - self.strip.offset;
            let right = left + segment.width;
            if right < rect.left() || left > rect.right() {
                continue;
            }

            let revealed = marks.revealed.get(position).copied().unwrap_or(false);
            let active = marks.active == Some(position);
            let stage_color = self
                .stage_colors
                .get(&segment.stage)
                .copied()
                .unwrap_or(self.theme.accent);

            // Bar: idle segments are dim placeholders, revealed ones carry
            // their stage color, the active one is emphasized
            let bar_height = if active { BAR_HEIGHT + 2.0 } else { BAR_HEIGHT };
            let bar_rect = egui::Rect::from_min_size(
                egui::pos2(left + 2.0, bar_y - bar_height / 2.0),
                egui::vec2(segment.width - 4.0, bar_height),
            );
            let bar_color = if active {
                stage_color
            } else if revealed {
                Theme::with_opacity(stage_color, 0.75)
            } else {
                self.theme.bar_idle
            };
            painter.rect_filled(bar_rect, bar_height / 2.0, bar_color);

            if segment.trailing_dot {
                painter.circle_filled(egui::pos2(right - 2.0, bar_y), 2.5, self.theme.dot_color);
            }

            // Label lines under the bar
            let label_color = if active {
                self.theme.heading_color
            } else if revealed {
                self.theme.foreground
            } else {
                Theme::with_opacity(self.theme.foreground, 0.45)
            };
            let mut text_y = bar_y + 12.0;
            for line in segment.label.lines() {
                let galley = painter.layout_no_wrap(
                    line.to_string(),
                    egui::FontId::proportional(self.theme.timeline_label_size),
                    label_color,
                );
                let x = left + (segment.width - galley.rect.width()) / 2.0;
                painter.galley(egui::pos2(x, text_y), galley, label_color);
                text_y += self.theme.timeline_label_size + 3.0;
            }

            if !segment.duration.is_empty() {
                let duration_color = Theme::with_opacity(label_color, 0.6);
                let galley = painter.layout_no_wrap(
                    segment.duration.clone(),
                    egui::FontId::proportional(self.theme.timeline_duration_size),
                    duration_color,
                );
                let x = left + (segment.width - galley.rect.width()) / 2.0;
                painter.galley(egui::pos2(x, text_y), galley, duration_color);
            }
        }

        // Edge gradients hint at off-screen segments
        let fade_w = 48.0;
        if self.strip.can_scroll_left {
            draw_edge_gradient(ui, rect, fade_w, &self.theme, true);
        }
        if self.strip.can_scroll_right {
            draw_edge_gradient(ui, rect, fade_w, &self.theme, false);
        }
    }

    fn draw_toast(&self, ui: &egui::Ui, rect: egui::Rect) {
        let Some(toast) = &self.toast else { return };
        let opacity = toast.opacity();
        if opacity <= 0.0 {
            return;
        }
        let color = Theme::with_opacity(self.theme.heading_color, opacity * 0.9);
        let bg = Theme::with_opacity(self.theme.panel_background, opacity * 0.9);
        let galley = ui.painter().layout_no_wrap(
            toast.message.clone(),
            egui::FontId::proportional(20.0),
            color,
        );
        let padding = 16.0;
        let toast_rect = egui::Rect::from_center_size(
            rect.center(),
            egui::vec2(
                galley.rect.width() + padding * 2.0,
                galley.rect.height() + padding * 2.0,
            ),
        );
        ui.painter().rect_filled(toast_rect, 8.0, bg);
        ui.painter().galley(
            egui::pos2(toast_rect.left() + padding, toast_rect.top() + padding),
            galley,
            color,
        );
    }
}

impl eframe::App for WalkdeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let layout = compute_layout(ctx.screen_rect());

        // Collect viewport commands to send AFTER the input closure
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();

        ctx.input(|i| {
            if i.key_pressed(egui::Key::Q) {
                viewport_cmds.push(egui::ViewportCommand::Close);
                return;
            }
            if i.key_pressed(egui::Key::F) {
                viewport_cmds.push(egui::ViewportCommand::Fullscreen(
                    !i.viewport().fullscreen.unwrap_or(false),
                ));
                return;
            }

            // Keyboard navigation is immediate: no tap animation
            if i.key_pressed(egui::Key::ArrowRight) {
                let next = self.player.next_index();
                if self.player.jump_to(next).is_some() {
                    self.recenter_strip(layout.strip.width());
                }
            }
            if i.key_pressed(egui::Key::ArrowLeft) && self.player.advance_previous().is_some() {
                self.recenter_strip(layout.strip.width());
            }
        });

        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }

        // Out-of-view collaborator: losing the window stops media, current
        // stays put
        let visible = ctx.input(|i| {
            let vp = i.viewport();
            vp.focused.unwrap_or(true) && !vp.minimized.unwrap_or(false)
        });
        if self.was_visible && !visible {
            self.player.stop_media();
        }
        self.was_visible = visible;

        if self.watcher.as_ref().is_some_and(|w| w.changed()) {
            self.reload_deck(ctx);
        }

        self.handle_pointer(ctx, &layout);

        // Drive transitions and clip auto-advance
        if self.player.tick().is_some() {
            self.recenter_strip(layout.strip.width());
        }

        let max = self.max_scroll(layout.strip.width());
        if self.strip.animate(max) {
            ctx.request_repaint();
        }
        if !self.indicators_settled && self.started.elapsed().as_secs_f32() >= INDICATOR_SETTLE {
            self.strip.update_indicators(max);
            self.indicators_settled = true;
        }

        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }

        let bg = self.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                ui.painter().rect_filled(ui.max_rect(), 0.0, bg);

                self.draw_viewport(ui, ctx, layout.viewport);
                self.draw_nav_button(ui, layout.prev_button, false);
                self.draw_nav_button(ui, layout.next_button, true);
                self.draw_description(ui, layout.description);
                ui.painter()
                    .rect_filled(layout.strip, 8.0, self.theme.panel_background);
                self.draw_strip(ui, layout.strip);
                self.draw_toast(ui, layout.viewport);
            });

        // Keep animating while anything is in motion
        let session_running = self
            .player
            .media()
            .session()
            .is_some_and(|s| !s.is_paused());
        if self.player.transitioning() || session_running || self.toast.is_some() {
            ctx.request_repaint();
        }
    }
}

/// Stage tags get palette colors in order of first appearance.
fn assign_stage_colors(player: &Player, theme: &Theme) -> HashMap<String, egui::Color32> {
    let palette = theme.stage_palette();
    let mut colors = HashMap::new();
    for segment in &player.timeline().segments {
        if !colors.contains_key(&segment.stage) {
            let color = palette[colors.len() % palette.len()];
            colors.insert(segment.stage.clone(), color);
        }
    }
    colors
}

/// Largest rect with the given aspect ratio centered inside `rect`.
fn fit_rect(rect: egui::Rect, aspect: f32) -> egui::Rect {
    let (w, h) = if rect.width() / rect.height() > aspect {
        (rect.height() * aspect, rect.height())
    } else {
        (rect.width(), rect.width() / aspect)
    };
    egui::Rect::from_center_size(rect.center(), egui::vec2(w, h))
}

/// Horizontal fade at the strip edges, hinting at scrollable content.
fn draw_edge_gradient(ui: &egui::Ui, rect: egui::Rect, fade_w: f32, theme: &Theme, left: bool) {
    let bg = theme.panel_background;
    let transparent = egui::Color32::from_rgba_unmultiplied(bg.r(), bg.g(), bg.b(), 0);

    let fade_rect = if left {
        egui::Rect::from_min_max(
            rect.left_top(),
            egui::pos2(rect.left() + fade_w, rect.bottom()),
        )
    } else {
        egui::Rect::from_min_max(
            egui::pos2(rect.right() - fade_w, rect.top()),
            rect.right_bottom(),
        )
    };

    let (left_color, right_color) = if left {
        (bg, transparent)
    } else {
        (transparent, bg)
    };

    let mut mesh = egui::Mesh::default();
    mesh.colored_vertex(fade_rect.left_top(), left_color);
    mesh.colored_vertex(fade_rect.right_top(), right_color);
    mesh.colored_vertex(fade_rect.left_bottom(), left_color);
    mesh.colored_vertex(fade_rect.right_bottom(), right_color);
    mesh.add_triangle(0, 2, 1);
    mesh.add_triangle(1, 2, 3);
    ui.painter().add(egui::Shape::mesh(mesh));
}

pub fn run(
    file: PathBuf,
    windowed: bool,
    start_slide: Option<usize>,
    muted: bool,
) -> anyhow::Result<()> {
    let deck = Deck::load(&file)?;
    let config = Config::load_or_default();
    let defaults = config.defaults.unwrap_or_default();

    let theme_name = deck
        .theme
        .clone()
        .or(defaults.theme)
        .unwrap_or_else(|| "light".to_string());
    let theme = Theme::from_name(&theme_name);

    let windowed = windowed || defaults.windowed.unwrap_or(false);
    let muted = muted || defaults.muted.unwrap_or(false);
    let initial_slide = start_slide
        .or(defaults.start_slide)
        .map(|s| s.saturating_sub(1))
        .unwrap_or(0);

    let title = deck.title.clone().unwrap_or_else(|| {
        format!(
            "walkdeck \u{2014} {}",
            file.file_name().unwrap_or_default().to_string_lossy()
        )
    });

    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            let label_font = egui::FontId::proportional(theme.timeline_label_size);
            let timeline = builder::build(&deck.slides, |text| {
                cc.egui_ctx.fonts_mut(|f| {
                    f.layout_no_wrap(text.to_string(), label_font.clone(), egui::Color32::WHITE)
                        .rect
                        .width()
                })
            });
            let media = MediaPlayer::new(Deck::base_path(&file), muted);
            let mut player = Player::new(deck, media, timeline, initial_slide);
            player.begin();
            Ok(Box::new(WalkdeckApp::new(file, player, theme)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
