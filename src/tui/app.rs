use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::command::{Command, DoorPosition};
use crate::dispatch::{Dispatcher, Mutation, TickReport};
use crate::error::Result;
use crate::notify::{self, VehicleNotifier, VehicleSection};
use crate::queue::{CommandQueue, QueueStats};
use crate::scene::{PropertyStore, SceneProperties, node};

/// Entries of the media list shown on the infotainment panel.
pub const MEDIA_ITEMS: [&str; 6] = [
    "Morning Drive",
    "Coastal Road",
    "Night Shift",
    "Traffic Report",
    "Podcast: Engines",
    "Quiet Cabin",
];

/// How many applied commands the history panel keeps.
const HISTORY_LEN: usize = 64;

/// How long an error stays on screen.
pub const ERROR_TTL: Duration = Duration::from_secs(3);

/// UI-thread state: the scene, the dispatcher feeding it, and the reverse path.
pub struct App<N: VehicleNotifier> {
    pub scene: PropertyStore,
    pub history: VecDeque<String>,
    pub last_tick: TickReport,
    pub last_error: Option<String>,
    pub should_quit: bool,

    error_since: Option<Instant>,
    queue: Arc<CommandQueue>,
    dispatcher: Dispatcher,
    notifier: N,
}

impl<N: VehicleNotifier> App<N> {
    pub fn new(queue: Arc<CommandQueue>, dispatcher: Dispatcher, notifier: N) -> Self {
        Self {
            scene: PropertyStore::dashboard(),
            history: VecDeque::with_capacity(HISTORY_LEN),
            last_tick: TickReport::default(),
            last_error: None,
            should_quit: false,
            error_since: None,
            queue,
            dispatcher,
            notifier,
        }
    }

    /// One UI update: drain everything the vehicle thread queued and apply it.
    pub fn on_tick(&mut self) {
        self.expire_error(Instant::now());

        let commands = self.queue.drain();
        let history = &mut self.history;
        let record = |cmd: &Command, outcome: &Result<Mutation>| {
            let entry = match outcome {
                Ok(_) => cmd.to_string(),
                Err(e) => format!("{cmd} (dropped: {e})"),
            };
            push_bounded(history, entry);
        };
        self.last_tick = self
            .dispatcher
            .dispatch_with(commands, &mut self.scene, record);

        if self.last_tick.dropped > 0 {
            self.set_error(format!(
                "{} command(s) dropped this tick",
                self.last_tick.dropped
            ));
        }
    }

    /// Clear the error line once it has been shown for `ERROR_TTL`.
    pub fn expire_error(&mut self, now: Instant) {
        if let Some(since) = self.error_since {
            if now.saturating_duration_since(since) >= ERROR_TTL {
                self.last_error = None;
                self.error_since = None;
            }
        }
    }

    fn set_error(&mut self, message: String) {
        self.last_error = Some(message);
        self.error_since = Some(Instant::now());
    }

    pub fn totals(&self) -> TickReport {
        self.dispatcher.totals()
    }

    pub fn queue_stats(&self) -> QueueStats {
        self.queue.stats()
    }

    pub fn media_focus(&self) -> usize {
        self.scene
            .int_property(node::MEDIA_FOCUSED_INDEX)
            .ok()
            .and_then(|i| usize::try_from(i).ok())
            .unwrap_or(0)
    }

    /// Handle a key event.
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        let result = match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                Ok(())
            }
            KeyCode::Char(c @ '1'..='8') => {
                let idx = (c as u8 - b'1') as usize;
                let pos = DoorPosition::ALL[idx % 4];
                let section = if idx < 4 {
                    VehicleSection::Door(pos)
                } else {
                    VehicleSection::Window(pos)
                };
                self.tap(section)
            }
            KeyCode::Char('b') | KeyCode::Char('B') => self.tap(VehicleSection::BackDoor),
            KeyCode::Up => self.move_media_focus(-1),
            KeyCode::Down => self.move_media_focus(1),
            KeyCode::Enter => {
                let index = self.media_focus();
                notify::click_media_item(&mut self.scene, &self.notifier, index)
            }
            _ => Ok(()),
        };

        if let Err(e) = result {
            self.set_error(e.to_string());
        }
    }

    fn tap(&mut self, section: VehicleSection) -> Result<()> {
        let opened = notify::tap_section(&mut self.scene, &self.notifier, section)?;
        let state = if opened { "opened" } else { "closed" };
        self.push_history(format!("tap: {section} {state}"));
        Ok(())
    }

    fn move_media_focus(&mut self, delta: isize) -> Result<()> {
        let len = MEDIA_ITEMS.len() as isize;
        let next = (self.media_focus() as isize + delta).rem_euclid(len) as usize;
        notify::focus_media_item(&mut self.scene, &self.notifier, next)
    }

    fn push_history(&mut self, entry: String) {
        push_bounded(&mut self.history, entry);
    }
}

fn push_bounded(history: &mut VecDeque<String>, entry: String) {
    if history.len() == HISTORY_LEN {
        history.pop_front();
    }
    history.push_back(entry);
}
