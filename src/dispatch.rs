use std::sync::Arc;

use log::{debug, warn};

use crate::command::{Command, PropertyEnum, TunerBand};
use crate::error::Result;
use crate::published::PublishedUiState;
use crate::queue::CommandQueue;
use crate::scene::{SceneProperties, node};

/// A concrete property write derived from a command and the current scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mutation {
    Bool(&'static str, bool),
    Int(&'static str, i32),
    Float(&'static str, f32),
    Str(&'static str, &'static str),
}

impl Mutation {
    pub fn node(&self) -> &'static str {
        match *self {
            Self::Bool(n, _) | Self::Int(n, _) | Self::Float(n, _) | Self::Str(n, _) => n,
        }
    }
}

/// Map `cmd` to the write it implies, given the scene as it is now.
///
/// Toggles read the node's current value and resolve to its negation; the
/// AM/FM toggle reads the band from the scene. Nothing is remembered between
/// calls.
pub fn resolve<S: SceneProperties + ?Sized>(scene: &S, cmd: &Command) -> Result<Mutation> {
    let flip = |node: &'static str| -> Result<Mutation> {
        Ok(Mutation::Bool(node, !scene.bool_property(node)?))
    };

    match *cmd {
        Command::ToggleDoor(pos) => flip(node::door_open(pos)),
        Command::ToggleWindow(pos) => flip(node::window_open(pos)),
        Command::ToggleBackDoor => flip(node::BACK_DOOR_OPEN),
        Command::ToggleMiscOnOff => flip(node::MISC_ON),
        Command::ToggleAccessory => flip(node::ACCESSORY_ON),
        Command::ToggleAmFm => {
            let band = TunerBand::parse(&scene.string_property(node::RADIO_BAND)?)?;
            Ok(Mutation::Str(node::RADIO_BAND, band.toggle().as_str()))
        }
        Command::SetUiScreen(screen) => Ok(Mutation::Int(node::UI_SCREEN, screen.index())),
        Command::SetUiStyle(style) => Ok(Mutation::Int(node::UI_STYLE, style.index())),
        Command::SetLightState(state) => Ok(Mutation::Int(node::LIGHT_STATE, state.index())),
        Command::SetClimateState(state) => {
            Ok(Mutation::Int(node::CLIMATE_STATE, state.index()))
        }
        Command::SetSeatOffset(axis, value) => {
            Ok(Mutation::Float(node::seat_offset(axis), value))
        }
        Command::SetTunerFrequency(freq) => Ok(Mutation::Float(node::RADIO_FREQUENCY, freq)),
        Command::SetSeekPosition(pos) => Ok(Mutation::Float(node::MEDIA_SEEK_POSITION, pos)),
    }
}

/// Write `mutation` to the scene.
pub fn apply<S: SceneProperties + ?Sized>(scene: &mut S, mutation: &Mutation) -> Result<()> {
    match *mutation {
        Mutation::Bool(node, v) => scene.set_bool_property(node, v),
        Mutation::Int(node, v) => scene.set_int_property(node, v),
        Mutation::Float(node, v) => scene.set_float_property(node, v),
        Mutation::Str(node, v) => scene.set_string_property(node, v),
    }
}

/// Outcome of one dispatcher tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub drained: usize,
    pub applied: usize,
    pub dropped: usize,
}

/// Drains the command queue once per UI tick and applies each command.
///
/// Runs on the UI thread. Also the single writer of `PublishedUiState`.
pub struct Dispatcher {
    published: Arc<PublishedUiState>,
    totals: TickReport,
}

impl Dispatcher {
    pub fn new(published: Arc<PublishedUiState>) -> Self {
        Self {
            published,
            totals: TickReport::default(),
        }
    }

    /// Cumulative counts over every tick so far.
    pub fn totals(&self) -> TickReport {
        self.totals
    }

    /// Drain `queue` and apply everything it held, in order.
    pub fn tick<S: SceneProperties + ?Sized>(
        &mut self,
        queue: &CommandQueue,
        scene: &mut S,
    ) -> TickReport {
        let commands = queue.drain();
        self.dispatch(commands, scene)
    }

    /// Apply an already-drained batch. Commands are consumed as they are applied.
    pub fn dispatch<S: SceneProperties + ?Sized>(
        &mut self,
        commands: Vec<Command>,
        scene: &mut S,
    ) -> TickReport {
        self.dispatch_with(commands, scene, |_, _| {})
    }

    /// Like `dispatch`, but reports each command's outcome to `observe` right
    /// after it is applied or dropped.
    pub fn dispatch_with<S, F>(
        &mut self,
        commands: Vec<Command>,
        scene: &mut S,
        mut observe: F,
    ) -> TickReport
    where
        S: SceneProperties + ?Sized,
        F: FnMut(&Command, &Result<Mutation>),
    {
        let mut report = TickReport {
            drained: commands.len(),
            ..TickReport::default()
        };

        for cmd in commands {
            let outcome = self.apply_one(scene, &cmd);
            match &outcome {
                Ok(mutation) => {
                    debug!("applied {cmd} -> {mutation:?}");
                    report.applied += 1;
                }
                Err(e) => {
                    warn!("dropping {cmd}: {e}");
                    report.dropped += 1;
                }
            }
            observe(&cmd, &outcome);
        }

        self.totals.drained += report.drained;
        self.totals.applied += report.applied;
        self.totals.dropped += report.dropped;
        report
    }

    fn apply_one<S: SceneProperties + ?Sized>(
        &self,
        scene: &mut S,
        cmd: &Command,
    ) -> Result<Mutation> {
        let mutation = resolve(scene, cmd)?;
        apply(scene, &mutation)?;

        // Publish only after the scene write, so readers never see a mode
        // the scene has not reached.
        match *cmd {
            Command::SetUiScreen(screen) => self.published.publish_screen(screen),
            Command::SetUiStyle(style) => self.published.publish_style(style),
            _ => {}
        }
        Ok(mutation)
    }
}
