use crate::types::BlockId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ground blocks: the closed set of kinds that may only sit in the lowest
/// positions of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroundKind {
    Grass,
    Soil,
}

/// Every kind of block the world knows about.
///
/// Ground capabilities are answered by the `Ground` arm as a whole, so no
/// ground kind can be diggable-false or moveable-true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Ground(GroundKind),
    Stone,
    Wood,
}

impl BlockKind {
    pub const GRASS: Self = Self::Ground(GroundKind::Grass);
    pub const SOIL: Self = Self::Ground(GroundKind::Soil);

    pub fn colour(self) -> &'static str {
        match self {
            Self::Ground(GroundKind::Grass) => "green",
            Self::Ground(GroundKind::Soil) => "black",
            Self::Stone => "gray",
            Self::Wood => "brown",
        }
    }

    /// Type name, also accepted by `FromStr`.
    pub fn block_type(self) -> &'static str {
        match self {
            Self::Ground(GroundKind::Grass) => "grass",
            Self::Ground(GroundKind::Soil) => "soil",
            Self::Stone => "stone",
            Self::Wood => "wood",
        }
    }

    pub fn is_ground(self) -> bool {
        matches!(self, Self::Ground(_))
    }

    pub fn is_diggable(self) -> bool {
        match self {
            Self::Ground(_) => true,
            Self::Stone => false,
            Self::Wood => true,
        }
    }

    pub fn is_moveable(self) -> bool {
        match self {
            Self::Ground(_) => false,
            Self::Stone => false,
            Self::Wood => true,
        }
    }

    pub fn is_carryable(self) -> bool {
        match self {
            Self::Ground(GroundKind::Grass) => false,
            Self::Ground(GroundKind::Soil) => true,
            Self::Stone => false,
            Self::Wood => true,
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.block_type())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown block type {0:?} (expected grass, soil, stone or wood)")]
pub struct ParseBlockKindError(pub String);

impl FromStr for BlockKind {
    type Err = ParseBlockKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grass" => Ok(Self::GRASS),
            "soil" => Ok(Self::SOIL),
            "stone" => Ok(Self::Stone),
            "wood" => Ok(Self::Wood),
            _ => Err(ParseBlockKindError(s.to_string())),
        }
    }
}

/// A single block. Carries no mutable state; its identity is its id.
///
/// Equality compares identity, so two separately built wood blocks are not
/// equal. A clone denotes the same block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    id: BlockId,
    kind: BlockKind,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: BlockId::new(),
            kind,
        }
    }

    pub fn grass() -> Self {
        Self::new(BlockKind::GRASS)
    }

    pub fn soil() -> Self {
        Self::new(BlockKind::SOIL)
    }

    pub fn stone() -> Self {
        Self::new(BlockKind::Stone)
    }

    pub fn wood() -> Self {
        Self::new(BlockKind::Wood)
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn colour(&self) -> &'static str {
        self.kind.colour()
    }

    pub fn block_type(&self) -> &'static str {
        self.kind.block_type()
    }

    pub fn is_ground(&self) -> bool {
        self.kind.is_ground()
    }

    pub fn is_diggable(&self) -> bool {
        self.kind.is_diggable()
    }

    pub fn is_moveable(&self) -> bool {
        self.kind.is_moveable()
    }

    pub fn is_carryable(&self) -> bool {
        self.kind.is_carryable()
    }
}
