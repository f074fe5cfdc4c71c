//! World-facing collaborator traits.
//!
//! The engine never materializes anything itself. The host implements
//! [`WorldView`] for reads and [`Materializer`] for the few mutations the
//! engine needs, against whatever world representation it owns.

use crate::location::*;
use crate::resource::*;
use serde::{Deserialize, Serialize};

/// Identity of the world (dimension, level) a batch was placed in.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct WorldId(String);

impl WorldId {
    pub fn new(name: impl Into<String>) -> Self {
        WorldId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Type of the block occupying a cell.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct BlockId(String);

impl BlockId {
    pub const AIR: &'static str = "air";

    pub fn new(name: impl Into<String>) -> Self {
        BlockId(name.into())
    }

    pub fn air() -> Self {
        BlockId(Self::AIR.to_string())
    }

    pub fn is_air(&self) -> bool {
        self.0 == Self::AIR
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A colored connector sitting inside a shared host cell.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct ConnectorPart {
    pub color: Color,
    pub key: ResourceKey,
}

/// Everything needed to put a cell back the way it was.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct CellState {
    pub block: BlockId,
    /// Connector held by a host cell, if any.
    #[serde(default)]
    pub connector: Option<ConnectorPart>,
    /// Other components sharing a host cell with the connector.
    #[serde(default)]
    pub attachments: Vec<String>,
}

impl CellState {
    pub fn empty() -> Self {
        CellState {
            block: BlockId::air(),
            connector: None,
            attachments: Vec::new(),
        }
    }

    pub fn block(block: BlockId) -> Self {
        CellState {
            block,
            connector: None,
            attachments: Vec::new(),
        }
    }
}

/// What kind of thing a unit materializes as.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum UnitKind {
    /// A whole cell.
    Block,
    /// A connector inside a (possibly shared) host cell.
    Connector { color: Color },
}

/// One unit the executor asks the world to materialize.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct PlacementUnit {
    pub key: ResourceKey,
    pub kind: UnitKind,
}

/// Read-only access to the world.
///
/// Implementations must not mutate anything; previews call these from
/// outside the simulation thread.
pub trait WorldView {
    /// True if the cell is empty or otherwise replaceable.
    fn is_placeable(&self, position: Position) -> bool;

    /// Type of the block occupying the cell.
    fn occupant(&self, position: Position) -> BlockId;

    /// Full restorable state of the cell.
    fn cell_state(&self, position: Position) -> CellState;

    /// True if a unit of `kind` could be materialized at `position` right now.
    fn accepts(&self, position: Position, kind: &UnitKind) -> bool {
        let _ = kind;
        self.is_placeable(position)
    }
}

/// World mutations used by the executor and by undo.
pub trait Materializer: WorldView {
    /// Materialize one unit. Returns false if nothing was placed.
    fn place(&mut self, position: Position, unit: &PlacementUnit) -> bool;

    /// Put the whole cell back to `prior`.
    fn revert(&mut self, position: Position, prior: &CellState);

    /// Take the connector out of a host cell, leaving other components
    /// alone. A host left with nothing in it goes back to `prior`.
    fn remove_connector(&mut self, position: Position, prior: &CellState);
}
