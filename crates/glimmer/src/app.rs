use eframe::egui;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::cli::PresentOptions;
use crate::config::{Config, MIN_INTERVAL_MS, Resolved};
use crate::deck::{self, Deck};
use crate::input::{InputAdapter, NavCommand};
use crate::render;
use crate::render::image_cache::ImageCache;
use crate::sampler::ColorSampler;
use crate::slideshow::observer::standard_observers;
use crate::slideshow::{AutoAdvance, SlideshowController, SystemClock};
use crate::theme::Theme;

/// Slowest repaint cadence while nothing is animating.
const IDLE_REPAINT: Duration = Duration::from_millis(250);
/// Observer flourishes run for about a second after each transition.
const FLOURISH_WINDOW: Duration = Duration::from_millis(1100);

/// Auto-advance period: `--interval` beats the deck file, which beats config.
fn resolve_interval(cli_ms: Option<u64>, deck_ms: Option<u64>, config_ms: u64) -> Duration {
    let ms = cli_ms.or(deck_ms).unwrap_or(config_ms);
    Duration::from_millis(ms.max(MIN_INTERVAL_MS))
}

/// Apply one navigation command. Returns true when the shown slide changed.
fn apply_command(
    controller: &mut SlideshowController,
    command: NavCommand,
    interval: Duration,
) -> bool {
    debug!(?command, "navigation");
    match command {
        NavCommand::Advance(delta) => controller.advance(delta),
        NavCommand::GoTo(index) => controller.go_to(index),
        NavCommand::First => controller.go_to(0),
        NavCommand::Last => {
            let last = controller.slide_count() as i64 - 1;
            controller.go_to(last);
        }
        NavCommand::ToggleAutoAdvance => {
            controller.toggle_auto_advance(interval);
            return false;
        }
    }
    true
}

/// Primary-button state for one frame.
#[derive(Debug, Clone, Copy, Default)]
struct PointerFrame {
    pressed: bool,
    released: bool,
    down: bool,
    pos: Option<egui::Pos2>,
}

impl PointerFrame {
    fn read(ctx: &egui::Context) -> Self {
        ctx.input(|i| Self {
            pressed: i.pointer.primary_pressed(),
            released: i.pointer.primary_released(),
            down: i.pointer.primary_down(),
            pos: i.pointer.interact_pos(),
        })
    }
}

/// Routes pointer input either to the swipe tracker or to the on-screen
/// controls. A control fires only when pressed and released on it; a press
/// on the photo is always a swipe, however short.
#[derive(Debug, Clone)]
struct PointerRouter {
    input: InputAdapter,
    pressed_control: Option<NavCommand>,
}

impl PointerRouter {
    fn new(input: InputAdapter) -> Self {
        Self {
            input,
            pressed_control: None,
        }
    }

    fn route(
        &mut self,
        layout: &render::ControlsLayout,
        frame: PointerFrame,
    ) -> Option<NavCommand> {
        let Some(pos) = frame.pos else {
            self.input.gesture_cancel();
            self.pressed_control = None;
            return None;
        };
        let control = control_at(layout, pos);

        if frame.pressed {
            self.pressed_control = control;
            match control {
                Some(_) => self.input.gesture_cancel(),
                None => self.input.gesture_start(pos.x),
            }
        } else if frame.down && self.input.is_tracking() {
            self.input.gesture_move(pos.x);
        }

        if !frame.released {
            return None;
        }
        if self.input.is_tracking() {
            self.pressed_control = None;
            return self.input.gesture_end(pos.x);
        }
        let pressed = self.pressed_control.take();
        pressed.filter(|p| control == Some(*p))
    }
}

fn control_at(layout: &render::ControlsLayout, pos: egui::Pos2) -> Option<NavCommand> {
    if layout.prev.contains(pos) {
        return Some(NavCommand::Advance(-1));
    }
    if layout.next.contains(pos) {
        return Some(NavCommand::Advance(1));
    }
    layout
        .dots
        .iter()
        .position(|d| d.expand(6.0).contains(pos))
        .map(|i| NavCommand::GoTo(i as i64))
}

struct SlideshowApp {
    deck: Deck,
    controller: SlideshowController,
    sampler: ColorSampler,
    pointer: PointerRouter,
    image_cache: ImageCache,
    theme: Theme,
    interval: Duration,
    last_transition: Instant,
    sampling_done: bool,
    /// Panel rect from last frame, used to hit-test pointer input
    last_rect: egui::Rect,
}

impl SlideshowApp {
    fn new(
        deck: Deck,
        settings: &Resolved,
        interval: Duration,
        start: usize,
        autoplay: bool,
    ) -> Self {
        let theme = Theme::night().with_default_accent(settings.theme_color);
        let mut controller = SlideshowController::new(
            deck.slides.len(),
            start,
            theme.clone(),
            Box::new(SystemClock),
            standard_observers(),
        );
        if autoplay {
            controller.start_auto_advance(interval);
        }
        let sampler = ColorSampler::schedule(
            &deck.slides,
            Instant::now(),
            Duration::from_millis(settings.sample_stagger_ms),
        );

        Self {
            deck,
            controller,
            sampler,
            pointer: PointerRouter::new(InputAdapter::new(settings.swipe_threshold)),
            image_cache: ImageCache::new(),
            theme,
            interval,
            last_transition: Instant::now(),
            sampling_done: false,
            last_rect: egui::Rect::ZERO,
        }
    }

    fn dispatch(&mut self, command: NavCommand) {
        if apply_command(&mut self.controller, command, self.interval) {
            self.last_transition = Instant::now();
        }
    }

    fn next_repaint(&self, now: Instant) -> Duration {
        let mut wait = IDLE_REPAINT;
        if now.duration_since(self.last_transition) < FLOURISH_WINDOW {
            return Duration::ZERO;
        }
        let deadlines = [self.controller.next_due(), self.sampler.next_due()];
        for due in deadlines.into_iter().flatten() {
            wait = wait.min(due.saturating_duration_since(now));
        }
        if self.sampler.in_flight() > 0 {
            wait = wait.min(Duration::from_millis(30));
        }
        wait
    }
}

impl eframe::App for SlideshowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.controller.tick() {
            self.last_transition = Instant::now();
        }
        self.controller.absorb_samples(&mut self.sampler);
        if !self.sampling_done && self.sampler.is_idle() {
            self.sampling_done = true;
            let cache = self.controller.cache();
            info!(
                sampled = cache.ready_count(),
                slides = cache.len(),
                "colour sampling complete"
            );
        }

        // Collect viewport commands to send AFTER the input closure
        // (sending inside ctx.input() causes RwLock deadlock)
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();
        let mut commands: Vec<NavCommand> = Vec::new();

        ctx.input(|i| {
            if i.key_pressed(egui::Key::Q) || i.key_pressed(egui::Key::Escape) {
                viewport_cmds.push(egui::ViewportCommand::Close);
                return;
            }
            if i.key_pressed(egui::Key::F) {
                viewport_cmds.push(egui::ViewportCommand::Fullscreen(
                    !i.viewport().fullscreen.unwrap_or(false),
                ));
                return;
            }
            for key in [
                egui::Key::ArrowLeft,
                egui::Key::ArrowRight,
                egui::Key::Home,
                egui::Key::End,
                egui::Key::Space,
            ] {
                if i.key_pressed(key) {
                    commands.extend(self.pointer.input.key(key));
                }
            }
        });

        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }

        let slide_count = self.controller.slide_count();
        let scale = render::compute_scale(self.last_rect);
        let layout = render::controls_layout(self.last_rect, slide_count, scale, &self.theme);
        commands.extend(self.pointer.route(&layout, PointerFrame::read(ctx)));
        for command in commands {
            self.dispatch(command);
        }

        let bg = self.theme.background;
        let view = self.controller.view().clone();
        let flourish = self.controller.flourish();

        self.last_rect = egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);

                let scale = render::compute_scale(rect);
                let layout = render::controls_layout(rect, slide_count, scale, &self.theme);

                if let Some(ref title) = self.deck.title {
                    render::draw_title(ui, title, &view, &self.theme, rect, scale);
                }
                for (slide, visible) in self.deck.slides.iter().zip(&view.visible) {
                    if *visible {
                        render::draw_slide(
                            ui,
                            slide,
                            &view,
                            &flourish,
                            &self.theme,
                            &self.image_cache,
                            rect,
                            scale,
                        );
                    }
                }
                render::draw_controls(ui, &layout, &view, &self.theme, scale);

                if self.controller.auto_advance() == AutoAdvance::Idle {
                    ui.painter().text(
                        egui::pos2(rect.right() - 24.0 * scale, rect.top() + 24.0 * scale),
                        egui::Align2::RIGHT_TOP,
                        "paused",
                        egui::FontId::proportional(18.0 * scale),
                        self.theme.muted,
                    );
                }
                rect
            })
            .inner;

        ctx.request_repaint_after(self.next_repaint(Instant::now()));
    }
}

pub fn run(path: PathBuf, options: PresentOptions) -> anyhow::Result<()> {
    let deck = deck::load(&path)?;

    let settings = Config::load_or_default().resolved();
    let interval = resolve_interval(options.interval_ms, deck.interval_ms, settings.interval_ms);
    let autoplay = settings.autoplay && !options.no_autoplay;

    let slide_count = deck.slides.len();
    // --slide N is 1-indexed
    let start = options
        .start_slide
        .map(|s| s.saturating_sub(1))
        .unwrap_or(0)
        .min(slide_count - 1);

    let title = deck.title.clone().unwrap_or_else(|| {
        format!(
            "glimmer - {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        )
    });
    info!(
        slides = slide_count,
        start,
        autoplay,
        interval_ms = interval.as_millis() as u64,
        "presenting {}",
        path.display()
    );

    let viewport = if options.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let native = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        native,
        Box::new(move |_cc| {
            let app = SlideshowApp::new(deck, &settings, interval, start, autoplay);
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
