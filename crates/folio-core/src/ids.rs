//! Block identity generation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a block.
///
/// Identifiers always start with [`BlockId::PREFIX`] so they can be used
/// directly in `#id` selectors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Prefix shared by every generated identifier.
    pub const PREFIX: &'static str = "block_";

    /// Wrap an existing identifier string (e.g. read back from the visual tree).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build an identifier from a generated suffix.
    fn with_suffix(suffix: impl fmt::Display) -> Self {
        Self(format!("{}{}", Self::PREFIX, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Source of block identifiers.
pub trait IdGenerator {
    /// Produce an identifier that has not been returned before.
    fn next_id(&mut self) -> BlockId;
}

/// Random identifiers backed by UUID v4 (`block_<32 hex digits>`).
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> BlockId {
        BlockId::with_suffix(Uuid::new_v4().simple())
    }
}

/// Deterministic identifiers (`block_1`, `block_2`, ...).
///
/// Useful for tests and for replaying scripts with stable output.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> BlockId {
        let id = BlockId::with_suffix(self.next);
        self.next += 1;
        id
    }
}
