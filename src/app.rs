use anyhow::{Context, Result};
use crossterm::event::{MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::action::Action;
use crate::components::action_hud::ActionHud;
use crate::components::context_bar::ContextBar;
use crate::components::diff_view::{text_viewport, DiffView};
use crate::components::key_hints::render_key_hints;
use crate::components::{screen_layout, Component, ScreenLayout};
use crate::config::{self, TwindiffConfig};
use crate::connector::{ConnectorPalette, ConnectorRenderer, ConnectorScene};
use crate::diff::{DiffCache, DiffOptions};
use crate::event::{map_key_to_action, Event, EventReader, KeyContext};
use crate::frame::{FrameScheduler, FrameTask};
use crate::highlight::HighlightEngine;
use crate::state::hunk_state::hunk_text;
use crate::state::pane_state::LINE_HEIGHT;
use crate::state::{AppState, Side};
use crate::sync::ScrollSynchronizer;
use crate::theme::{next_theme, prev_theme};
use crate::tui::Tui;

/// Columns moved per horizontal scroll step.
const PAN_STEP: f64 = 4.0;
/// Rows moved per mouse wheel notch.
const WHEEL_STEP: i32 = 3;
/// ~3 seconds at the default tick rate.
const STATUS_TICKS: u32 = 60;

/// Where one side's text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    pub fn new(path: PathBuf) -> Self {
        if path.as_os_str() == "-" {
            Source::Stdin
        } else {
            Source::File(path)
        }
    }

    pub fn is_stdin(&self) -> bool {
        matches!(self, Source::Stdin)
    }

    pub fn path(&self) -> &Path {
        match self {
            Source::Stdin => Path::new("-"),
            Source::File(path) => path,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Source::Stdin => "<stdin>".to_string(),
            Source::File(path) => path.display().to_string(),
        }
    }

    /// Read the whole input. Invalid UTF-8 is replaced rather than rejected.
    pub fn read(&self) -> Result<String> {
        let bytes = match self {
            Source::Stdin => {
                let mut buf = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut buf)
                    .context("reading stdin")?;
                buf
            }
            Source::File(path) => {
                std::fs::read(path).with_context(|| format!("reading {}", path.display()))?
            }
        };
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

pub struct App {
    state: AppState,
    original: Source,
    modified: Source,
    texts: (String, String),
    cache: DiffCache,
    highlight_engine: HighlightEngine,
    frames: FrameScheduler<FrameTask>,
    sync: ScrollSynchronizer,
    connectors: ConnectorRenderer,
    layout: ScreenLayout,
    config: TwindiffConfig,
    status_clear_countdown: u32,
}

impl App {
    pub fn new(
        original: Source,
        modified: Source,
        grammar: String,
        config: TwindiffConfig,
    ) -> Result<Self> {
        let texts = (original.read()?, modified.read()?);
        Ok(Self::with_texts(original, modified, texts, grammar, config))
    }

    fn with_texts(
        original: Source,
        modified: Source,
        texts: (String, String),
        grammar: String,
        config: TwindiffConfig,
    ) -> Self {
        let highlight_engine = HighlightEngine::new();
        if !grammar.is_empty() && !highlight_engine.supports(&grammar) {
            tracing::info!(grammar = %grammar, "no bundled grammar, showing plain text");
        }
        let mut cache = DiffCache::new(DiffOptions {
            max_table_cells: config.max_table_cells,
        });
        let model = cache.get_or_compute(&texts.0, &texts.1, &grammar, &highlight_engine);
        tracing::info!(
            original = %original.title(),
            modified = %modified.title(),
            grammar = %grammar,
            algorithm = model.algorithm.label(),
            added = model.stats.added,
            removed = model.stats.removed,
            "diff computed"
        );

        let mut state = AppState::new(model, config.theme.clone(), grammar);
        state.left_title = original.title();
        state.right_title = modified.title();
        state.connectors_enabled = config.connectors;

        let connectors =
            ConnectorRenderer::new(config.marker, ConnectorPalette::from_theme(&state.theme));

        Self {
            state,
            original,
            modified,
            texts,
            cache,
            highlight_engine,
            frames: FrameScheduler::new(),
            sync: ScrollSynchronizer::new(LINE_HEIGHT),
            connectors,
            layout: ScreenLayout::default(),
            config,
            status_clear_countdown: 0,
        }
    }

    pub async fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        self.mount();

        let mut events = EventReader::new(Duration::from_millis(self.config.tick_ms));

        let context_bar = ContextBar;
        let left = DiffView { side: Side::Left };
        let right = DiffView { side: Side::Right };
        let action_hud = ActionHud;

        loop {
            let size = terminal.size()?;
            self.apply_layout(Rect::new(0, 0, size.width, size.height));
            self.run_frame();

            let layout = self.layout;
            terminal.draw(|frame| {
                context_bar.render(frame, layout.context_bar, &self.state);
                left.render(frame, layout.left, &self.state);
                right.render(frame, layout.right, &self.state);
                if self.state.connectors_enabled {
                    self.connectors.blit(layout.gutter, frame.buffer_mut());
                }
                action_hud.render(frame, layout.hud, &self.state);

                if self.state.show_hints {
                    render_key_hints(frame, &self.state);
                }
            })?;

            // Wait for at least one event, then drain all pending events
            // to avoid input lag from buffered scroll/key events.
            let first = events.next().await;
            let mut pending = Vec::new();
            if let Some(ev) = first {
                pending.push(ev);
            } else {
                tracing::warn!("event channel closed");
                break;
            }
            while let Some(ev) = events.try_next() {
                pending.push(ev);
            }

            // Coalesce: collapse consecutive scroll actions into net movement
            let mut scroll_delta: i32 = 0;
            let mut actions: Vec<Action> = Vec::new();

            for event in pending {
                let ctx = KeyContext {
                    hints_open: self.state.show_hints,
                };
                let action = match event {
                    Event::Key(key) => map_key_to_action(key, &ctx),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Resize => Some(Action::Resize),
                    Event::Tick => Some(Action::Tick),
                };
                if let Some(action) = action {
                    match action {
                        Action::ScrollUp => scroll_delta -= 1,
                        Action::ScrollDown => scroll_delta += 1,
                        other => actions.push(other),
                    }
                }
            }

            // Apply coalesced scroll
            if scroll_delta != 0 {
                let step = self.config.scroll_step as f64;
                self.state
                    .panes
                    .scroll_by(self.state.focus, scroll_delta as f64 * step);
            }

            // Apply remaining actions
            for action in actions {
                self.update(action);
            }
            self.pump_scroll_events();

            if self.state.should_quit {
                break;
            }
        }

        self.connectors.dispose(&mut self.frames);
        Ok(())
    }

    /// First-frame work: jump to the first hunk once a layout exists, and
    /// paint the connectors.
    fn mount(&mut self) {
        if !self.state.hunks.is_empty() {
            self.frames.request(FrameTask::RevealFirstHunk);
        }
        self.connectors.schedule_paint(&mut self.frames);
    }

    /// Lay out the screen and push pane geometry into the scroll model.
    fn apply_layout(&mut self, area: Rect) {
        let layout = screen_layout(area, self.state.connectors_enabled);
        self.layout = layout;

        for (side, rect) in [(Side::Left, layout.left), (Side::Right, layout.right)] {
            let rows = self.state.model.lines(side.is_left()).len() as f64 * LINE_HEIGHT;
            let (height, width) = text_viewport(rect, self.state.number_width(side));
            self.state.panes.set_geometry(
                side,
                (rows, self.state.max_width(side) as f64),
                (height as f64, width as f64),
            );
        }

        if self.state.connectors_enabled {
            self.connectors.observe(layout.gutter, &mut self.frames);
        }
    }

    /// Run everything deferred to this frame. Scroll events are settled
    /// before the connectors paint so both panes are in their final place.
    fn run_frame(&mut self) {
        let mut paint = false;
        for task in self.frames.drain() {
            match task {
                FrameTask::ReleaseScrollLock => self.sync.release(),
                FrameTask::RevealFirstHunk => {
                    self.state.hunks.go_to(
                        0,
                        &mut self.state.panes,
                        &mut self.sync,
                        &mut self.frames,
                    );
                }
                FrameTask::PaintConnectors => paint = true,
            }
        }
        if self.settle_scroll() || paint {
            self.paint_connectors();
        }
    }

    fn paint_connectors(&mut self) {
        if !self.state.connectors_enabled {
            return;
        }
        let gutter = self.layout.gutter;
        // Pane content starts one row below the top border and ends one row
        // above the bottom border.
        let left_offset = (self.layout.left.y + 1).saturating_sub(gutter.y) as f64;
        let right_offset = (self.layout.right.y + 1).saturating_sub(gutter.y) as f64;
        let scene = ConnectorScene {
            blocks: &self.state.model.blocks,
            width: gutter.width as f64,
            height: gutter.height as f64,
            line_height: LINE_HEIGHT,
            left_scroll: self.state.panes.pane(Side::Left).scroll_top(),
            right_scroll: self.state.panes.pane(Side::Right).scroll_top(),
            left_offset,
            right_offset,
            clip_top: left_offset.min(right_offset),
            clip_bottom: (gutter.height as f64 - 1.0).max(0.0),
        };
        self.connectors.paint_now(&scene);
    }

    /// Feed queued pane scroll events through the synchronizer. Returns
    /// whether anything moved.
    fn settle_scroll(&mut self) -> bool {
        let mut moved = false;
        while let Some(event) = self.state.panes.next_event() {
            moved = true;
            self.sync.on_scroll(
                event.side,
                &mut self.state.panes,
                &self.state.model.alignment,
                &mut self.frames,
            );
        }
        moved
    }

    /// Settle scroll events outside a frame; any movement invalidates the
    /// connectors for the next one.
    fn pump_scroll_events(&mut self) {
        if self.settle_scroll() && self.state.connectors_enabled {
            self.connectors.schedule_paint(&mut self.frames);
        }
    }

    fn update(&mut self, action: Action) {
        let focus = self.state.focus;
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::Tick => {
                if self.status_clear_countdown > 0 {
                    self.status_clear_countdown -= 1;
                    if self.status_clear_countdown == 0 {
                        self.state.status_message = None;
                    }
                }
            }
            Action::Resize => {
                // Geometry is recomputed at the top of the next frame.
            }
            Action::ScrollUp => {
                self.state.panes.scroll_by(focus, -(self.config.scroll_step as f64));
            }
            Action::ScrollDown => {
                self.state.panes.scroll_by(focus, self.config.scroll_step as f64);
            }
            Action::ScrollPageUp | Action::ScrollPageDown => {
                let page = (self.state.panes.pane(focus).viewport_height() - 1.0).max(1.0);
                let delta = if action == Action::ScrollPageUp { -page } else { page };
                self.state.panes.scroll_by(focus, delta);
            }
            Action::ScrollTop => {
                self.state.panes.scroll_to(focus, 0.0);
            }
            Action::ScrollBottom => {
                let bottom = self.state.panes.pane(focus).scrollable_height();
                self.state.panes.scroll_to(focus, bottom);
            }
            Action::ScrollLeft | Action::ScrollRight => {
                let left = self.state.panes.pane(focus).scroll_left();
                let delta = if action == Action::ScrollLeft { -PAN_STEP } else { PAN_STEP };
                self.state.panes.scroll_left_to(focus, left + delta);
            }
            Action::Wheel(side, notches) => {
                self.state
                    .panes
                    .scroll_by(side, (notches * WHEEL_STEP) as f64 * LINE_HEIGHT);
            }
            Action::SwitchFocus => self.state.focus = focus.other(),
            Action::NextHunk | Action::PrevHunk => {
                let target = if action == Action::NextHunk {
                    self.state.hunks.next()
                } else {
                    self.state.hunks.prev()
                };
                match target {
                    Some(index) => {
                        self.state.hunks.go_to(
                            index,
                            &mut self.state.panes,
                            &mut self.sync,
                            &mut self.frames,
                        );
                    }
                    None => self.set_status("No changes".to_string(), false),
                }
            }
            Action::Reload => self.reload(),
            Action::CopyHunk => {
                let text = self
                    .state
                    .hunks
                    .current_line()
                    .and_then(|line| hunk_text(&self.state.model, line));
                match text {
                    Some(text) if !text.is_empty() => {
                        self.copy_to_clipboard(&text, "Hunk copied to clipboard")
                    }
                    Some(_) => self.set_status("Hunk only removes lines".to_string(), true),
                    None => self.set_status("No hunk selected".to_string(), true),
                }
            }
            Action::CopyDocument => {
                let text = self.texts.1.clone();
                self.copy_to_clipboard(&text, "Modified document copied to clipboard");
            }
            Action::NextTheme | Action::PrevTheme => {
                let name = if action == Action::NextTheme {
                    next_theme(&self.state.theme.name)
                } else {
                    prev_theme(&self.state.theme.name)
                };
                self.config.set_theme(name);
                self.state.theme = self.config.theme.clone();
                self.connectors
                    .set_palette(ConnectorPalette::from_theme(&self.state.theme));
                self.connectors.schedule_paint(&mut self.frames);
                config::save_theme(name);
                self.set_status(format!("Theme: {name}"), false);
            }
            Action::ToggleConnectors => {
                self.state.connectors_enabled = !self.state.connectors_enabled;
                if self.state.connectors_enabled {
                    self.connectors.schedule_paint(&mut self.frames);
                }
            }
            Action::ToggleHints => self.state.show_hints = !self.state.show_hints,
        }
    }

    /// Re-read file inputs and recompute if anything changed. Stdin was
    /// consumed at startup and keeps its original text.
    fn reload(&mut self) {
        let read = |source: &Source, current: &str| -> Result<String> {
            if source.is_stdin() {
                Ok(current.to_string())
            } else {
                source.read()
            }
        };
        let texts = match (
            read(&self.original, &self.texts.0),
            read(&self.modified, &self.texts.1),
        ) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("reload failed: {e:#}");
                self.set_status(format!("Reload failed: {e:#}"), true);
                return;
            }
        };
        self.apply_texts(texts);
    }

    fn apply_texts(&mut self, texts: (String, String)) {
        let model = self.cache.get_or_compute(
            &texts.0,
            &texts.1,
            &self.state.grammar,
            &self.highlight_engine,
        );
        self.texts = texts;
        if Arc::ptr_eq(&model, &self.state.model) {
            self.set_status("No changes on disk".to_string(), false);
            return;
        }
        tracing::info!(blocks = model.blocks.len(), "reloaded");
        self.state.set_model(model);
        if !self.state.hunks.is_empty() {
            self.frames.request(FrameTask::RevealFirstHunk);
        }
        self.connectors.schedule_paint(&mut self.frames);
        self.set_status("Reloaded".to_string(), false);
    }

    fn copy_to_clipboard(&mut self, text: &str, done: &str) {
        match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text)) {
            Ok(()) => self.set_status(done.to_string(), false),
            Err(e) => {
                tracing::warn!("clipboard unavailable: {e}");
                self.set_status(format!("Clipboard error: {e}"), true);
            }
        }
    }

    fn handle_mouse(&self, mouse: MouseEvent) -> Option<Action> {
        let notches = match mouse.kind {
            MouseEventKind::ScrollUp => -1,
            MouseEventKind::ScrollDown => 1,
            _ => return None,
        };
        let side = if mouse.column < self.layout.gutter.x {
            Side::Left
        } else if mouse.column >= self.layout.right.x {
            Side::Right
        } else {
            self.state.focus
        };
        Some(Action::Wheel(side, notches))
    }

    fn set_status(&mut self, msg: String, is_error: bool) {
        self.state.status_message = Some((msg, is_error));
        self.status_clear_countdown = STATUS_TICKS;
    }
}
