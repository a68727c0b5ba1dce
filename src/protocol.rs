use crate::game::{self, Action, ActionResult, Event, Game, Position};
use crate::model::UnitModelId;
use serde::{Deserialize, Serialize};

pub const VERSION: &str = "0.1";

/// A player request as recorded for replays.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Command {
    Start,
    Perform(Action),
    Build(Position, UnitModelId),
    ActivateAbility(String),
    EndTurn,
}

/// Ordered events of one game, consumed by renderers and loggers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EventLog {
    pub version: String,
    pub seed: u64,
    pub events: Vec<Event>,
}

/// Commands that reproduce a game from its initial state and seed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Replay {
    pub version: String,
    pub seed: u64,
    pub commands: Vec<Command>,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Text parse error")]
    TextError(#[from] serde_json::Error),
    #[error("Binary parse error")]
    BinaryError(#[from] postcard::Error),
}

impl Command {
    pub fn apply(&self, game: &mut Game) -> ActionResult<Vec<Event>> {
        match self {
            Command::Start => game::start(game),
            Command::Perform(action) => game::perform(game, action),
            Command::Build(position, model) => game::build(game, *position, *model),
            Command::ActivateAbility(id) => game::activate_ability(game, id),
            Command::EndTurn => game::end_turn(game),
        }
    }
}

impl EventLog {
    pub fn new(seed: u64) -> EventLog {
        EventLog { version: VERSION.into(), seed, events: Vec::new() }
    }
    pub fn record(&mut self, events: impl IntoIterator<Item = Event>) {
        self.events.extend(events);
    }

    pub fn from_text(text: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(text)?)
    }
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(postcard::from_bytes(bytes)?)
    }
    pub fn as_text(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
    pub fn as_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(postcard::to_allocvec(self)?)
    }
}

impl Replay {
    pub fn new(seed: u64) -> Replay {
        Replay { version: VERSION.into(), seed, commands: Vec::new() }
    }

    /// Applies a command and records it when it succeeds.
    pub fn apply(&mut self, game: &mut Game, command: Command) -> ActionResult<Vec<Event>> {
        let events = command.apply(game)?;
        self.commands.push(command);
        Ok(events)
    }

    /// Replays every command on `game`, which must be in the recorded
    /// initial state.
    pub fn play(&self, game: &mut Game) -> EventLog {
        let mut log = EventLog::new(self.seed);
        for command in &self.commands {
            match command.apply(game) {
                Ok(events) => log.record(events),
                Err(error) => tracing::warn!(?command, %error, "replayed command was rejected"),
            }
        }
        log
    }

    pub fn from_text(text: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(text)?)
    }
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(postcard::from_bytes(bytes)?)
    }
    pub fn as_text(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
    pub fn as_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(postcard::to_allocvec(self)?)
    }
}
