use blockworld_common::{BlockKind, TileId};

/// Why a block was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockFault {
    #[error("{0} is not diggable")]
    NotDiggable(BlockKind),
    #[error("{0} is not moveable")]
    NotMoveable(BlockKind),
    #[error("{0} is not carryable")]
    NotCarryable(BlockKind),
    #[error("inventory index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Why an exit could not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExitFault {
    #[error("exit name is empty")]
    EmptyName,
    #[error("no exit named {0:?}")]
    Unknown(String),
    #[error("exit target {0} does not exist")]
    DanglingTarget(TileId),
    #[error("{0} cannot be entered from here")]
    Unreachable(TileId),
}

/// Errors from tile, world and builder operations.
///
/// Every variant is a caller-correctable precondition failure. The operation
/// that returned it made no change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockWorldError {
    #[error("too high: height {height} reached ceiling {ceiling}")]
    TooHigh { height: usize, ceiling: usize },
    #[error("too low: tile has no blocks")]
    TooLow,
    #[error("invalid block: {0}")]
    InvalidBlock(BlockFault),
    #[error("no exit: {0}")]
    NoExit(ExitFault),
    #[error("{0} not found")]
    UnknownTile(TileId),
}

/// Coarse classification of a `BlockWorldError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TooHigh,
    TooLow,
    InvalidBlock,
    NoExit,
    UnknownTile,
}

impl BlockWorldError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TooHigh { .. } => ErrorKind::TooHigh,
            Self::TooLow => ErrorKind::TooLow,
            Self::InvalidBlock(_) => ErrorKind::InvalidBlock,
            Self::NoExit(_) => ErrorKind::NoExit,
            Self::UnknownTile(_) => ErrorKind::UnknownTile,
        }
    }
}
