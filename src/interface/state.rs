use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, TryRecvError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ratatui::widgets::TableState;

use crate::analysis::census::Census;
use crate::core::config;
use crate::core::domain::{Params, ReactionRule};
use crate::engine::world::World;
use crate::interface::store::{Action, EditorField, ReactionStore};
use crate::reactions::bonds::toggle_bonds;
use crate::reactions::momentum::MomentumLedger;
use crate::reactions::reactor::Reactor;
use crate::reactions::{ReactionEvent, ReactionStats};

// --- Constants ---
const HISTORY_CAPACITY: usize = 300;
const LOG_CAPACITY: usize = 200;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Simulation,
    Rules,
    Help,
}

/// Keyboard input, decoupled from the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
}

// --- Telemetry ---

#[derive(Debug, Clone)]
pub struct Telemetry {
    /// Reactions fired per tick, for the sparkline.
    pub reaction_history: VecDeque<u64>,
    /// Bond count sampled once per tick.
    pub bond_history: VecDeque<u64>,
}

impl Telemetry {
    pub fn new() -> Self {
        Self {
            reaction_history: VecDeque::with_capacity(HISTORY_CAPACITY),
            bond_history: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    pub fn ingest(&mut self, reactions: usize, bonds: usize) {
        if self.reaction_history.len() >= HISTORY_CAPACITY {
            self.reaction_history.pop_front();
            self.bond_history.pop_front();
        }
        self.reaction_history.push_back(reactions as u64);
        self.bond_history.push_back(bonds as u64);
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}

// --- The Master State ---

pub struct AppState {
    // System
    pub should_quit: bool,
    pub mode: AppMode,
    pub params: Params,
    pub paused: bool,

    // Simulation
    pub world: World,
    pub ledger: MomentumLedger,
    pub store: ReactionStore,
    rng: ChaCha8Rng,

    // Analytics
    pub stats: ReactionStats,
    pub telemetry: Telemetry,
    pub census: Census,
    pub logs: VecDeque<String>,
    log_rx: Option<Receiver<String>>,

    // UI Elements
    pub editor_field: EditorField,
    pub rule_state: TableState,
    pub rules_path: Option<PathBuf>,

    // Performance Metrics
    pub steps_per_second: f64,
    steps_counter: usize,
    last_rate_check: Instant,
}

impl AppState {
    pub fn new(params: Params, rules: Vec<ReactionRule>) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let world = World::populate(&params, &mut rng);
        let census = Census::take(&world);

        let mut rule_state = TableState::default();
        if !rules.is_empty() {
            rule_state.select(Some(0));
        }

        Self {
            should_quit: false,
            mode: AppMode::Simulation,
            params,
            paused: false,
            world,
            ledger: MomentumLedger::new(),
            store: ReactionStore::new(rules),
            rng,
            stats: ReactionStats::default(),
            telemetry: Telemetry::new(),
            census,
            logs: VecDeque::with_capacity(LOG_CAPACITY),
            log_rx: None,
            editor_field: EditorField::FirstReactantKind,
            rule_state,
            rules_path: None,
            steps_per_second: 0.0,
            steps_counter: 0,
            last_rate_check: Instant::now(),
        }
    }

    pub fn set_log_channel(&mut self, rx: Receiver<String>) {
        self.log_rx = Some(rx);
    }

    /// One UI tick: drain logs, advance the world unless paused, refresh analytics.
    pub fn tick(&mut self) {
        self.drain_logs();

        let mut reactions = 0;
        if !self.paused {
            for _ in 0..self.params.steps_per_tick.max(1) {
                reactions += self.step();
            }
        }

        self.census = Census::take(&self.world);
        self.telemetry.ingest(reactions, self.census.bonds);
        self.calc_metrics();
    }

    /// Advances the world one step with the active rules.
    /// Returns how many reactions fired.
    pub fn step(&mut self) -> usize {
        let mut reactor = Reactor::new(self.store.rules(), &mut self.ledger);
        self.world.step(&mut reactor);
        let events = reactor.into_events();

        let mut reactions = 0;
        for event in events {
            if matches!(event, ReactionEvent::Reacted { .. }) {
                reactions += 1;
            }
            self.handle_event(event);
        }
        self.steps_counter += 1;
        reactions
    }

    fn handle_event(&mut self, event: ReactionEvent) {
        self.stats.ingest(&event);
        match event {
            ReactionEvent::Reacted { body_a, body_b, products, bonded, .. } => {
                let link = if bonded { "-" } else { " + " };
                self.log(format!("{} {} -> {}{}{}", body_a, body_b, products.0, link, products.1));
            }
            ReactionEvent::BondsToggled { rule, transformed, removed } => {
                self.log(format!(">>> [{}] transformed {} bond(s), broke {}", rule, transformed, removed));
            }
            // Emitted every step for bonded pairs; counted, not logged.
            ReactionEvent::MomentumCorrected { .. } | ReactionEvent::MomentumDrift { .. } => {}
        }
    }

    // --- Rule Actions ---

    /// Confirms the draft rule and runs the bond toggle with it.
    pub fn submit_rule(&mut self) {
        let Some(rule) = self.store.dispatch(Action::Submit) else { return };
        if self.rule_state.selected().is_none() {
            self.rule_state.select(Some(0));
        }

        if rule.bonded_before {
            let report = toggle_bonds(&mut self.world, &rule);
            self.handle_event(ReactionEvent::BondsToggled {
                rule,
                transformed: report.transformed,
                removed: report.removed,
            });
        }
        self.census = Census::take(&self.world);
    }

    pub fn remove_selected_rule(&mut self) {
        let Some(i) = self.rule_state.selected() else { return };
        self.store.dispatch(Action::RemoveRule(i));
        let len = self.store.rules().len();
        self.rule_state.select(if len == 0 { None } else { Some(i.min(len - 1)) });
    }

    pub fn clear_rules(&mut self) {
        self.store.dispatch(Action::ClearRules);
        self.rule_state.select(None);
    }

    pub fn save_rules(&mut self) {
        let Some(path) = self.rules_path.clone() else {
            self.log("No rule file configured (start with --rules <file>).");
            return;
        };
        if let Err(e) = config::save_rules(&path, self.store.rules()) {
            self.log(format!("Save failed: {}", e));
        }
    }

    /// Respawns all atoms from the seeded generator. Rules are kept.
    pub fn reset_world(&mut self) {
        self.world = World::populate(&self.params, &mut self.rng);
        self.ledger.clear();
        self.stats = ReactionStats::default();
        self.telemetry = Telemetry::new();
        self.census = Census::take(&self.world);
        self.log("World reset.");
    }

    // --- Logs & Metrics ---

    fn drain_logs(&mut self) {
        let Some(rx) = self.log_rx.clone() else { return };
        for _ in 0..100 {
            match rx.try_recv() {
                Ok(line) => self.log(line),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.log_rx = None;
                    break;
                }
            }
        }
    }

    /// Logs a message to the internal buffer.
    pub fn log(&mut self, msg: impl Into<String>) {
        if self.logs.len() >= LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(msg.into());
    }

    fn calc_metrics(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_rate_check);
        if elapsed >= Duration::from_secs(1) {
            self.steps_per_second = self.steps_counter as f64 / elapsed.as_secs_f64();
            self.steps_counter = 0;
            self.last_rate_check = now;
        }
    }

    // --- Input Handling ---

    pub fn on_input(&mut self, input: Input) {
        match input {
            Input::Esc => self.should_quit = true,
            Input::Enter => self.submit_rule(),
            Input::Up => self.editor_field = self.editor_field.prev(),
            Input::Down => self.editor_field = self.editor_field.next(),
            Input::Left => self.adjust_field(false),
            Input::Right => self.adjust_field(true),
            Input::Char(c) => self.on_key(c),
        }
    }

    pub fn on_key(&mut self, key: char) {
        match key {
            'q' => self.should_quit = true,
            '1' => self.mode = AppMode::Simulation,
            '2' => self.mode = AppMode::Rules,
            '3' | '?' => self.mode = AppMode::Help,
            ' ' => self.toggle_pause(),
            'n' => {
                if self.paused {
                    self.step();
                    self.census = Census::take(&self.world);
                }
            }
            'r' => self.reset_world(),
            'k' => self.editor_field = self.editor_field.prev(),
            'j' => self.editor_field = self.editor_field.next(),
            'h' | '-' => self.adjust_field(false),
            'l' | '+' => self.adjust_field(true),
            ']' => self.select_next_rule(),
            '[' => self.select_prev_rule(),
            'd' => self.remove_selected_rule(),
            'c' => self.clear_rules(),
            'w' => self.save_rules(),
            _ => {}
        }
    }

    fn adjust_field(&mut self, forward: bool) {
        let action = self.editor_field.step(self.store.current(), forward);
        self.store.dispatch(action);
    }

    fn select_next_rule(&mut self) {
        let len = self.store.rules().len();
        if len == 0 { return; }
        let i = match self.rule_state.selected() {
            Some(i) => if i >= len - 1 { 0 } else { i + 1 },
            None => 0,
        };
        self.rule_state.select(Some(i));
    }

    fn select_prev_rule(&mut self) {
        let len = self.store.rules().len();
        if len == 0 { return; }
        let i = match self.rule_state.selected() {
            Some(i) => if i == 0 { len - 1 } else { i - 1 },
            None => 0,
        };
        self.rule_state.select(Some(i));
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.log(if self.paused { "Paused." } else { "Resumed." });
    }
}
