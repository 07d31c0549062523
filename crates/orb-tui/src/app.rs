use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use chrono::{DateTime, NaiveDate, Utc};
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use orb_core::burndown::{self, BurndownParams, BurndownPoint, BurndownSummary};
use orb_core::config::Config;
use orb_core::feed::LiveFeed;
use orb_core::orb::{self as geometry, OrbRotation, OrbSegment, Projection, SunClock};
use orb_core::store::{ProjectStore, StoreCommand, StoreError, StoreEvent};
use orb_core::types::{BudgetStatus, Feature, FeatureStatus};

use crate::effects::EffectManager;
use crate::widgets::status_bar::FeedState;
use crate::widgets::toast::{Toast, ToastLevel, ToastManager};

pub const ACTIVITY_LIMIT: usize = 50;
const DOUBLE_CLICK: Duration = Duration::from_millis(400);
/// Sun disc radius as a share of the orb radius.
pub const SUN_RADIUS_FACTOR: f64 = 0.35;

#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// Effects queued by state changes. The next render resolves each to the
/// screen area it should play over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingFx {
    DetailsOpened,
    DrawerOpened,
    HoursSpark,
    BudgetFlash,
}

/// What a click on the orb canvas landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbPick {
    Sun,
    Segment(u32),
}

/// Where the orb canvas was last drawn: the inner cell area and the world
/// bounds mapped onto it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbViewport {
    pub area: Rect,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl OrbViewport {
    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.area.x
            && column < self.area.x + self.area.width
            && row >= self.area.y
            && row < self.area.y + self.area.height
    }

    /// World coordinates at the centre of a terminal cell.
    pub fn to_world(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        if !self.contains(column, row) {
            return None;
        }
        let fx = ((column - self.area.x) as f64 + 0.5) / self.area.width as f64;
        let fy = ((row - self.area.y) as f64 + 0.5) / self.area.height as f64;
        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        Some((x0 + fx * (x1 - x0), y1 - fy * (y1 - y0)))
    }

    /// World size of one braille dot, `(dx, dy)`.
    pub fn dot_size(&self) -> (f64, f64) {
        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        (
            (x1 - x0) / (self.area.width as f64 * 2.0),
            (y1 - y0) / (self.area.height as f64 * 4.0),
        )
    }

    /// World width of one terminal column.
    pub fn column_width(&self) -> f64 {
        (self.x_bounds[1] - self.x_bounds[0]) / self.area.width as f64
    }

    /// Terminal cell holding a world point, clamped to the area.
    pub fn to_cell(&self, x: f64, y: f64) -> (u16, u16) {
        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        let fx = ((x - x0) / (x1 - x0)).clamp(0.0, 1.0);
        let fy = ((y1 - y) / (y1 - y0)).clamp(0.0, 1.0);
        let col = (fx * self.area.width as f64).floor() as u16;
        let row = (fy * self.area.height as f64).floor() as u16;
        (
            self.area.x + col.min(self.area.width.saturating_sub(1)),
            self.area.y + row.min(self.area.height.saturating_sub(1)),
        )
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    pub store: ProjectStore,
    pub config: Config,
    pub should_quit: bool,
    pub show_help: bool,
    pub show_burndown: bool,
    pub fullscreen: bool,
    pub feed_paused: bool,

    /// Index into the feature list of the segment under the cursor.
    pub hovered: Option<usize>,
    pub segments: Vec<OrbSegment>,
    pub projection: Projection,
    pub rotation: OrbRotation,
    pub sun: SunClock,

    pub burndown_params: BurndownParams,
    pub burndown: Vec<BurndownPoint>,
    pub burndown_summary: BurndownSummary,

    pub activity: VecDeque<ActivityEntry>,
    pub toasts: ToastManager,
    pub effects: EffectManager,
    pub pending_fx: Vec<PendingFx>,
    /// Time since the last frame, consumed by the effect manager on render.
    pub frame_delta: Duration,
    pub orb_viewport: Option<OrbViewport>,
    pub sun_label_area: Option<Rect>,

    today: NaiveDate,
    events: flume::Receiver<StoreEvent>,
    feed: Option<LiveFeed>,
    statuses: HashMap<u32, FeatureStatus>,
    budget_status: BudgetStatus,
    last_click: Option<Instant>,
    effects_enabled: bool,
}

impl App {
    /// Build the dashboard around `store`. The burndown series is generated
    /// once from `burndown_seed` and stays fixed for the session.
    pub fn new(mut store: ProjectStore, config: Config, today: NaiveDate, burndown_seed: u64) -> Self {
        let events = store.subscribe();
        let segments = geometry::layout_segments(
            store.features(),
            config.display.orb_radius,
            config.display.segment_height,
        );
        let burndown_params = config.burndown_params(store.project(), today);
        let burndown = burndown::generate_seeded(&burndown_params, burndown_seed);
        let burndown_summary = BurndownSummary::from_series(&burndown_params, &burndown);
        let statuses = store
            .features()
            .iter()
            .map(|f| (f.id, f.status(store.rules())))
            .collect();
        let budget_status = store.budget_status();

        tracing::info!(
            features = store.features().len(),
            burndown_days = burndown.len(),
            seed = burndown_seed,
            "dashboard ready"
        );

        Self {
            store,
            config,
            should_quit: false,
            show_help: false,
            show_burndown: false,
            fullscreen: false,
            feed_paused: false,
            hovered: None,
            segments,
            projection: Projection::default(),
            rotation: OrbRotation::default(),
            sun: SunClock::default(),
            burndown_params,
            burndown,
            burndown_summary,
            activity: VecDeque::new(),
            toasts: ToastManager::new(),
            effects: EffectManager::new(),
            pending_fx: Vec::new(),
            frame_delta: Duration::ZERO,
            orb_viewport: None,
            sun_label_area: None,
            today,
            events,
            feed: None,
            statuses,
            budget_status,
            last_click: None,
            effects_enabled: true,
        }
    }

    pub fn with_feed(mut self, feed: LiveFeed) -> Self {
        self.feed = Some(feed);
        self
    }

    /// Stop queueing visual effects. Used when nothing renders, so the queue
    /// is never drained.
    pub fn without_effects(mut self) -> Self {
        self.effects_enabled = false;
        self.pending_fx.clear();
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn feed_state(&self) -> FeedState {
        match (&self.feed, self.feed_paused) {
            (None, _) => FeedState::Off,
            (Some(_), true) => FeedState::Paused,
            (Some(_), false) => FeedState::Live,
        }
    }

    pub fn hovered_feature(&self) -> Option<&Feature> {
        self.hovered.and_then(|i| self.store.features().get(i))
    }

    // -- Input --------------------------------------------------------------

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Left | KeyCode::Char('h') => self.hover_prev(),
            KeyCode::Right | KeyCode::Char('l') => self.hover_next(),
            KeyCode::Enter => self.select_hovered(),
            KeyCode::Esc => self.back(),
            KeyCode::Char('b') | KeyCode::Char('s') => self.toggle_burndown(),
            KeyCode::Char('f') => self.toggle_fullscreen(),
            KeyCode::Char('p') => self.toggle_feed(),
            _ => {}
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let in_orb = self
                    .orb_viewport
                    .is_some_and(|vp| vp.contains(mouse.column, mouse.row));
                if !in_orb {
                    return;
                }

                let now = Instant::now();
                let double = self
                    .last_click
                    .is_some_and(|t| now.duration_since(t) <= DOUBLE_CLICK);
                self.last_click = if double { None } else { Some(now) };

                match self.pick(mouse.column, mouse.row) {
                    Some(OrbPick::Sun) => self.toggle_burndown(),
                    Some(OrbPick::Segment(id)) => {
                        let _ = self.select(Some(id));
                    }
                    None => {}
                }
                if double {
                    self.toggle_fullscreen();
                }
            }
            MouseEventKind::Moved => {
                if let Some(OrbPick::Segment(id)) = self.pick(mouse.column, mouse.row) {
                    self.hovered = self.store.features().iter().position(|f| f.id == id);
                } else if self
                    .orb_viewport
                    .is_some_and(|vp| vp.contains(mouse.column, mouse.row))
                {
                    self.hovered = None;
                }
            }
            _ => {}
        }
    }

    /// Resolve a terminal cell to the sun or a ring segment, using the
    /// viewport from the last render.
    pub fn pick(&self, column: u16, row: u16) -> Option<OrbPick> {
        let viewport = self.orb_viewport?;
        let (x, y) = viewport.to_world(column, row)?;
        let display = &self.config.display;

        let sun_y = display.segment_height / 2.0 * self.projection.lift;
        let sun_radius = display.orb_radius * SUN_RADIUS_FACTOR * self.sun.pulse().glow_scale;
        if x.hypot(y - sun_y) <= sun_radius {
            return Some(OrbPick::Sun);
        }

        let ground_y = y - sun_y;
        let radius = x.hypot(ground_y / self.projection.tilt);
        let inner = display.orb_radius * geometry::BOTTOM_RADIUS_FACTOR * 0.7;
        let outer = display.orb_radius * 1.25;
        if radius < inner || radius > outer {
            return None;
        }

        let angle = self.projection.unproject_angle(x, ground_y);
        geometry::hit_test(&self.segments, self.rotation.angle(), angle)
            .map(|segment| OrbPick::Segment(segment.feature_id))
    }

    // -- Actions ------------------------------------------------------------

    pub fn hover_next(&mut self) {
        let n = self.store.features().len();
        self.hovered = match (n, self.hovered) {
            (0, _) => None,
            (_, None) => Some(0),
            (_, Some(i)) => Some((i + 1) % n),
        };
    }

    pub fn hover_prev(&mut self) {
        let n = self.store.features().len();
        self.hovered = match (n, self.hovered) {
            (0, _) => None,
            (_, None) => Some(n - 1),
            (_, Some(i)) => Some((i + n - 1) % n),
        };
    }

    pub fn select_hovered(&mut self) {
        if let Some(id) = self.hovered_feature().map(|f| f.id) {
            let _ = self.select(Some(id));
        }
    }

    pub fn select(&mut self, id: Option<u32>) -> Result<(), StoreError> {
        self.apply(StoreCommand::SelectFeature(id))
    }

    /// Esc: close the drawer first, then full screen, then the selection.
    pub fn back(&mut self) {
        if self.show_burndown {
            self.show_burndown = false;
        } else if self.fullscreen {
            self.fullscreen = false;
        } else {
            let _ = self.select(None);
        }
    }

    pub fn toggle_burndown(&mut self) {
        self.show_burndown = !self.show_burndown;
        if self.show_burndown {
            self.queue_fx(PendingFx::DrawerOpened);
        }
        tracing::debug!(open = self.show_burndown, "burndown drawer toggled");
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
        // Every region moves; running effects would play over stale areas.
        self.effects.remove_all();
        self.sun_label_area = None;
        tracing::debug!(fullscreen = self.fullscreen, "full-screen toggled");
    }

    pub fn toggle_feed(&mut self) {
        if self.feed.is_none() {
            self.toasts
                .push(Toast::new("Live feed is disabled", ToastLevel::Info));
            return;
        }
        self.feed_paused = !self.feed_paused;
        let message = if self.feed_paused {
            "Live feed paused"
        } else {
            "Live feed resumed"
        };
        self.log_activity(message.to_string());
    }

    /// Apply a store command, surfacing rejections as a toast.
    pub fn apply(&mut self, command: StoreCommand) -> Result<(), StoreError> {
        let result = self.store.apply(command);
        if let Err(ref e) = result {
            self.toasts.push(Toast::new(e.to_string(), ToastLevel::Error));
        }
        self.drain_events();
        result
    }

    // -- Ticks --------------------------------------------------------------

    /// Advance animations by `dt`.
    pub fn on_frame(&mut self, dt: Duration) {
        self.rotation.advance(dt);
        self.sun.advance(dt);
        self.toasts.tick();
        self.frame_delta += dt;
        self.drain_events();
    }

    /// One live-feed step. No-op when the feed is off or paused.
    pub fn on_feed_tick(&mut self) {
        if self.feed_paused {
            return;
        }
        let command = match self.feed.as_mut() {
            Some(feed) => feed.next_command(self.store.features()),
            None => return,
        };
        if let Some(command) = command {
            let _ = self.apply(command);
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                StoreEvent::HoursUpdated {
                    feature_id,
                    previous,
                    burned_hours,
                    at,
                } => self.on_hours_updated(feature_id, previous, burned_hours, at),
                StoreEvent::SelectionChanged { selected } => {
                    if let Some(feature) = selected.and_then(|id| self.store.feature(id)) {
                        let message = format!("Selected {}", feature.name);
                        self.queue_fx(PendingFx::DetailsOpened);
                        self.log_activity(message);
                    }
                }
            }
        }
    }

    fn on_hours_updated(&mut self, feature_id: u32, previous: f64, burned: f64, at: DateTime<Utc>) {
        self.segments = geometry::layout_segments(
            self.store.features(),
            self.config.display.orb_radius,
            self.config.display.segment_height,
        );

        let Some(feature) = self.store.feature(feature_id) else {
            return;
        };
        let name = feature.name.clone();
        let status = feature.status(self.store.rules());
        let delta = burned - previous;

        self.push_activity(ActivityEntry {
            timestamp: at,
            message: format!("{}: {:+.1}h, now {:.1}h", name, delta, burned),
        });

        let toast = match self.statuses.insert(feature_id, status) {
            Some(before) if before != status && status == FeatureStatus::OnTrack => {
                Toast::new(format!("{} is back on track", name), ToastLevel::Success)
            }
            Some(before) if before != status => Toast::new(
                format!("{} is now {}", name, status.label()),
                ToastLevel::Warning,
            ),
            _ => Toast::new(format!("{} {:+.1}h", name, delta), ToastLevel::Info),
        };
        self.toasts.push(toast);
        self.queue_fx(PendingFx::HoursSpark);

        let budget_status = self.store.budget_status();
        if budget_status != self.budget_status {
            tracing::info!(from = ?self.budget_status, to = ?budget_status, "budget status changed");
            self.budget_status = budget_status;
            self.queue_fx(PendingFx::BudgetFlash);
            self.toasts.push(Toast::new(
                format!("Budget status: {}", budget_status.label()),
                ToastLevel::Warning,
            ));
        }
    }

    /// One pending entry per kind: a repeat would replay the same effect.
    fn queue_fx(&mut self, fx: PendingFx) {
        if self.effects_enabled && !self.pending_fx.contains(&fx) {
            self.pending_fx.push(fx);
        }
    }

    fn log_activity(&mut self, message: String) {
        self.push_activity(ActivityEntry {
            timestamp: Utc::now(),
            message,
        });
    }

    fn push_activity(&mut self, entry: ActivityEntry) {
        self.activity.push_front(entry);
        self.activity.truncate(ACTIVITY_LIMIT);
    }
}
