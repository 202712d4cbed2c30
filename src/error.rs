//! Error types

use glam::IVec2;
use thiserror::Error;

use crate::sim::UnitId;

/// Why a player or AI action was rejected.
///
/// Rejections never mutate the mission; the UI treats them as a no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("not the player's turn")]
    NotPlayerPhase,
    #[error("mission is over")]
    MissionOver,
    #[error("unknown unit {0:?}")]
    UnknownUnit(UnitId),
    #[error("unit {0:?} is dead")]
    UnitDead(UnitId),
    #[error("unit {0:?} cannot be controlled this phase")]
    NotControllable(UnitId),
    #[error("tile ({}, {}) is out of bounds", .0.x, .0.y)]
    OutOfBounds(IVec2),
    #[error("tile ({}, {}) is not walkable", .0.x, .0.y)]
    Blocked(IVec2),
    #[error("tile ({}, {}) is occupied", .0.x, .0.y)]
    Occupied(IVec2),
    #[error("no path to ({}, {})", .0.x, .0.y)]
    NoPath(IVec2),
    #[error("needs {needed} TU, has {available}")]
    InsufficientTimeUnits { needed: u32, available: u32 },
    #[error("unit carries no weapon")]
    NoWeapon,
    #[error("weapon has no such fire mode")]
    ModeUnavailable,
    #[error("out of ammo")]
    OutOfAmmo,
    #[error("magazine already full")]
    MagazineFull,
    #[error("no valid target")]
    NoTarget,
    #[error("target not visible")]
    TargetNotVisible,
    #[error("unit already in that stance")]
    AlreadyInStance,
}

/// Storage and (de)serialization failures
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage write rejected for key {0}")]
    WriteFailed(String),
}
