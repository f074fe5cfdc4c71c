//! Sparse in-memory world for offline runs and tests.

use crate::location::*;
use crate::world::*;
use fnv::{FnvHashMap, FnvHashSet};

/// Block id used for cells hosting connectors and attachments.
pub const CONNECTOR_HOST: &str = "connector_host";

/// Unbounded sparse grid. Cells never written are air.
#[derive(Clone, Debug, Default)]
pub struct GridWorld {
    cells: FnvHashMap<Position, CellState>,
    replaceable: FnvHashSet<BlockId>,
}

impl GridWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `block` as replaceable (like tall grass or snow layers).
    pub fn with_replaceable(mut self, block: BlockId) -> Self {
        self.replaceable.insert(block);
        self
    }

    pub fn set_block(&mut self, position: Position, block: BlockId) {
        self.set_cell(position, CellState::block(block));
    }

    pub fn set_cell(&mut self, position: Position, state: CellState) {
        if state.block.is_air() {
            self.cells.remove(&position);
        } else {
            self.cells.insert(position, state);
        }
    }

    /// Add a non-connector component to a host cell, creating the host if
    /// the cell is empty.
    pub fn attach(&mut self, position: Position, attachment: impl Into<String>) {
        let cell = self
            .cells
            .entry(position)
            .or_insert_with(|| CellState::block(BlockId::new(CONNECTOR_HOST)));
        cell.attachments.push(attachment.into());
    }

    pub fn cell(&self, position: Position) -> Option<&CellState> {
        self.cells.get(&position)
    }

    /// Number of non-air cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.len()
    }

    fn is_host(&self, position: Position) -> bool {
        self.cells
            .get(&position)
            .map(|c| c.block.as_str() == CONNECTOR_HOST)
            .unwrap_or(false)
    }
}

impl WorldView for GridWorld {
    fn is_placeable(&self, position: Position) -> bool {
        match self.cells.get(&position) {
            None => true,
            Some(cell) => self.replaceable.contains(&cell.block),
        }
    }

    fn occupant(&self, position: Position) -> BlockId {
        self.cells
            .get(&position)
            .map(|c| c.block.clone())
            .unwrap_or_else(BlockId::air)
    }

    fn cell_state(&self, position: Position) -> CellState {
        self.cells
            .get(&position)
            .cloned()
            .unwrap_or_else(CellState::empty)
    }

    fn accepts(&self, position: Position, kind: &UnitKind) -> bool {
        match kind {
            UnitKind::Block => self.is_placeable(position),
            UnitKind::Connector { .. } => {
                self.is_placeable(position)
                    || (self.is_host(position)
                        && self
                            .cells
                            .get(&position)
                            .map(|c| c.connector.is_none())
                            .unwrap_or(false))
            }
        }
    }
}

impl Materializer for GridWorld {
    fn place(&mut self, position: Position, unit: &PlacementUnit) -> bool {
        if !self.accepts(position, &unit.kind) {
            return false;
        }

        match unit.kind {
            UnitKind::Block => {
                self.set_block(position, BlockId::new(unit.key.id()));
            }
            UnitKind::Connector { color } => {
                let part = ConnectorPart {
                    color,
                    key: unit.key.clone(),
                };
                if self.is_host(position) {
                    if let Some(cell) = self.cells.get_mut(&position) {
                        cell.connector = Some(part);
                    }
                } else {
                    let mut cell = CellState::block(BlockId::new(CONNECTOR_HOST));
                    cell.connector = Some(part);
                    self.cells.insert(position, cell);
                }
            }
        }
        true
    }

    fn revert(&mut self, position: Position, prior: &CellState) {
        self.set_cell(position, prior.clone());
    }

    fn remove_connector(&mut self, position: Position, prior: &CellState) {
        let now_empty = match self.cells.get_mut(&position) {
            Some(cell) if cell.block.as_str() == CONNECTOR_HOST => {
                cell.connector = None;
                cell.attachments.is_empty()
            }
            _ => false,
        };

        if now_empty {
            self.set_cell(position, prior.clone());
        }
    }
}
