use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use crate::config::Rules;
use crate::model::{self, Catalog, Terrain, UnitModelId, Weapon, Weather};

mod game;
mod unit;
mod tile;
mod map;
mod path;
mod options;
mod modifier;
mod commander;
mod combat;
mod action;
pub use self::map::*;
pub use self::path::*;
pub use self::modifier::*;
pub use self::commander::*;
pub use self::combat::*;
pub use self::action::*;

pub type UnitId = usize;
pub type PlayerNumber = u32;
pub type TeamId = u32;
pub type Rect = (i32, i32, i32, i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState { Pregame, InProgress, Finished }

#[derive(Clone, Debug, PartialEq)]
pub struct Tiles {
    width: i32,
    height: i32,
    cells: Vec<Tile>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Units(BTreeMap<UnitId, Unit>);

#[derive(Clone, Debug, Default)]
pub struct Players(Vec<Player>);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position(pub i32, pub i32);

#[derive(Clone)]
pub struct Game {
    pub state: GameState,
    pub catalog: Arc<Catalog>,
    pub abilities: Arc<AbilityRegistry>,
    pub rules: Rules,
    pub tiles: Tiles,
    pub units: Units,
    pub players: Players,
    pub in_turn_index: usize,
    pub round_count: u32,
    pub turn_count: u32,
    pub next_unit_id: UnitId,
    pub rng: fastrand::Rng,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub number: PlayerNumber,
    pub team: TeamId,
    pub funds: u32,
    pub defeated: bool,
    pub commander: Commander,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub terrain: Terrain,
    pub owner: Option<PlayerNumber>,
    pub unit: Option<UnitId>,
    pub weather: Weather,
    /// Upcoming weather, front is next turn.
    pub forecast: VecDeque<Weather>,
    pub durability: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capture {
    pub target: Position,
    pub progress: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    pub model: UnitModelId,
    pub owner: PlayerNumber,
    pub health: f64,
    pub fuel: u32,
    /// Remaining ammo per weapon in model order, `None` for unlimited.
    pub ammo: Vec<Option<u32>>,
    /// `None` while carried by a transport.
    pub position: Option<Position>,
    pub carried: Vec<UnitId>,
    pub moved: bool,
    pub capture: Option<Capture>,
}

pub struct Map {
    pub name: String,
    pub tiles: Tiles,
    pub units: Units,
    pub funds: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Path {
    pub waypoints: Vec<Position>,
    pub fuel_cost: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Wait(UnitId, Path),
    Attack(UnitId, Path, Position),
    Capture(UnitId, Path),
    Load(UnitId, Path),
    Unload(UnitId, Path, UnitId, Position),
    Resupply(UnitId, Path),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionSet {
    pub kind: model::ActionKind,
    pub actions: Vec<Action>,
}

#[derive(Debug, PartialEq, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum ActionError {
    #[error("unit not found")]
    UnitNotFound,
    #[error("unit owner is not in turn")]
    OwnerNotInTurn,
    #[error("unit has already moved")]
    UnitAlreadyMoved,
    #[error("game is not in progress")]
    GameNotInProgress,
    #[error("game has already started")]
    GameAlreadyStarted,
    #[error("invalid path")]
    InvalidPath,
    #[error("action is not available from this tile")]
    ActionNotAvailable,
    #[error("cannot build here")]
    CannotBuild,
    #[error("insufficient funds")]
    InsufficientFunds,
    #[error("ability is not ready")]
    AbilityNotReady,
    #[error("internal error")]
    InternalError,
}

pub type ActionResult<T> = Result<T, ActionError>;

#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum GameUpdateError {
    #[error("invalid unit")]
    InvalidUnit,
    #[error("invalid position")]
    InvalidPosition,
    #[error("invalid player")]
    InvalidPlayer,
    #[error("invalid state transition")]
    InvalidState,
}

pub type GameUpdateResult<T> = Result<T, GameUpdateError>;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum Event {
    StartTurn(PlayerNumber),
    EndTurn(PlayerNumber),
    Funds(PlayerNumber, u32),
    UnitRepair(UnitId, u32),
    Move(UnitId, Vec<Position>),
    Wait(UnitId),
    Fire(UnitId, Weapon),
    Attack(UnitId, UnitId, f64),
    Counterattack(UnitId, UnitId, f64),
    Demolish(UnitId, Position, u32),
    TerrainDestroyed(Position, Terrain),
    UnitDie(UnitId),
    Capture(UnitId, Position, u32),
    Captured(UnitId, Position),
    Load(UnitId, UnitId),
    Unload(UnitId, UnitId, Position),
    Resupply(UnitId, UnitId),
    Build(Position, UnitId, UnitModelId, u32),
    AbilityActivated(PlayerNumber, String),
    ArmyDefeat(PlayerNumber),
    WinGame(TeamId),
}
