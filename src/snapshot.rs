//! Records of placed units, sufficient to reverse them.

use crate::location::*;
use crate::resource::*;
use crate::world::*;
use serde::{Deserialize, Serialize};

/// How a placed unit is taken back out of the world.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum SnapshotKind {
    /// The unit filled the whole cell; undo reverts the cell.
    Generic { placed: BlockId },
    /// The unit is a connector in a shared host; undo removes only the
    /// connector.
    Connector(ConnectorMeta),
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct ConnectorMeta {
    /// Color the connector was placed in (may differ from the debited key).
    pub color: Color,
}

/// One successfully placed and debited unit.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct PlacementSnapshot {
    pub position: Position,
    pub prior: CellState,
    /// Resource actually debited for this unit.
    pub key: ResourceKey,
    pub amount: u64,
    pub kind: SnapshotKind,
}

impl PlacementSnapshot {
    /// Capture a snapshot right after `world` materialized a unit at
    /// `position`, given the cell state from just before.
    pub fn capture<W: WorldView + ?Sized>(
        world: &W,
        position: Position,
        prior: CellState,
        key: ResourceKey,
        amount: u64,
        unit: &UnitKind,
    ) -> Self {
        let kind = match unit {
            UnitKind::Block => SnapshotKind::Generic {
                placed: world.occupant(position),
            },
            UnitKind::Connector { color } => SnapshotKind::Connector(ConnectorMeta { color: *color }),
        };

        PlacementSnapshot {
            position,
            prior,
            key,
            amount,
            kind,
        }
    }

    /// True if the world still holds what this snapshot placed.
    pub fn is_restorable<W: WorldView + ?Sized>(&self, world: &W) -> bool {
        match &self.kind {
            SnapshotKind::Generic { placed } => world.occupant(self.position) == *placed,
            SnapshotKind::Connector(meta) => world
                .cell_state(self.position)
                .connector
                .map(|c| c.color == meta.color)
                .unwrap_or(false),
        }
    }

    /// Put the cell back to its prior state.
    pub fn restore<W: Materializer + ?Sized>(&self, world: &mut W) {
        match &self.kind {
            SnapshotKind::Generic { .. } => world.revert(self.position, &self.prior),
            SnapshotKind::Connector(_) => world.remove_connector(self.position, &self.prior),
        }
    }
}

/// Ordered snapshots from one execution.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Batch {
    snapshots: Vec<PlacementSnapshot>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: PlacementSnapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[PlacementSnapshot] {
        &self.snapshots
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.snapshots.iter().map(|s| s.position)
    }

    /// Total amount debited across all snapshots.
    pub fn total_debited(&self) -> u64 {
        self.snapshots.iter().map(|s| s.amount).sum()
    }

    /// True if `position` is one of the snapshot positions or within
    /// `radius` (Chebyshev) of one.
    pub fn is_near(&self, position: Position, radius: u32) -> bool {
        self.positions().any(|p| p.distance_to(position) <= radius)
    }
}
