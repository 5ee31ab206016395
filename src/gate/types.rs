use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Stable identifier for a player, online or offline
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Numeric item/block type id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ItemType(pub u16);

impl ItemType {
    /// Primed-explosive block
    pub const TNT: ItemType = ItemType(46);
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stack held in the actor's hand at interaction time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemStack {
    pub item: ItemType,
    pub amount: u8,
}

impl ItemStack {
    pub fn new(item: ItemType, amount: u8) -> Self {
        Self { item, amount }
    }
}

/// Block coordinates in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.x, self.y, self.z)
    }
}

/// Face of the target block that was clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFace {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl BlockFace {
    /// Map the wire index (0-5) to a face
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Down),
            1 => Some(Self::Up),
            2 => Some(Self::North),
            3 => Some(Self::South),
            4 => Some(Self::West),
            5 => Some(Self::East),
            _ => None,
        }
    }
}

/// One attempted gated action, built and dropped inside a single intercept call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatedActionRequest {
    pub actor: PlayerId,
    pub item: ItemType,
    pub target: BlockPos,
}

/// Outcome of an eligibility evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    pub allowed: bool,
    /// Playtime still needed; zero when allowed
    pub remaining: Duration,
}

impl Eligibility {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            remaining: Duration::ZERO,
        }
    }

    pub fn deny(remaining: Duration) -> Self {
        Self {
            allowed: false,
            remaining,
        }
    }

    /// Remaining time in whole minutes, truncated toward zero
    pub fn remaining_minutes(&self) -> u64 {
        whole_minutes(self.remaining)
    }
}

/// Convert a duration to whole minutes, dropping any partial minute
pub fn whole_minutes(duration: Duration) -> u64 {
    duration.as_secs() / 60
}

/// Build a duration from a minute count
pub fn minutes(count: u64) -> Duration {
    Duration::from_secs(count.saturating_mul(60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_minutes_truncates() {
        assert_eq!(whole_minutes(Duration::from_secs(59)), 0);
        assert_eq!(whole_minutes(Duration::from_secs(60)), 1);
        assert_eq!(whole_minutes(Duration::from_millis(1_799_999)), 29);
    }

    #[test]
    fn test_block_face_from_index() {
        assert_eq!(BlockFace::from_index(1), Some(BlockFace::Up));
        assert_eq!(BlockFace::from_index(5), Some(BlockFace::East));
        assert_eq!(BlockFace::from_index(6), None);
    }

    #[test]
    fn test_block_pos_display() {
        assert_eq!(BlockPos::new(10, 64, -3).to_string(), "10, 64, -3");
    }
}
