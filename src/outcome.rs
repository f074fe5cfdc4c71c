//! Reported outcomes of batches and undo requests. None of these are
//! fatal; the caller decides what to tell the actor.

use crate::location::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a batch placed nothing, or stopped early.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PlacementFailure {
    /// Geometry or search produced no placeable positions.
    NoValidCandidates,
    /// Not enough energy for the whole batch. Nothing was touched.
    InsufficientEnergy { required: f64 },
    /// The pool could not cover the whole batch. Nothing was touched.
    InsufficientResource { required: u64, available: u64 },
    /// A commit-extract under-delivered mid-batch. Units placed before
    /// `position` were kept.
    PartialRace { placed: usize, position: Position },
    /// Every candidate failed.
    CannotPlace,
}

impl fmt::Display for PlacementFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementFailure::NoValidCandidates => write!(f, "no valid positions to place at"),
            PlacementFailure::InsufficientEnergy { required } => {
                write!(f, "not enough energy, {:.1} required", required)
            }
            PlacementFailure::InsufficientResource {
                required,
                available,
            } => write!(
                f,
                "not enough resources, {} required but {} available",
                required, available
            ),
            PlacementFailure::PartialRace { placed, position } => write!(
                f,
                "resources ran out at {} after placing {}",
                position, placed
            ),
            PlacementFailure::CannotPlace => write!(f, "nothing could be placed"),
        }
    }
}

impl std::error::Error for PlacementFailure {}

/// Result of one execution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub placed: usize,
    pub failure: Option<PlacementFailure>,
}

impl BatchResult {
    pub fn placed(placed: usize) -> Self {
        BatchResult {
            placed,
            failure: None,
        }
    }

    pub fn failed(failure: PlacementFailure) -> Self {
        BatchResult {
            placed: 0,
            failure: Some(failure),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UndoOutcome {
    /// Every snapshot was restored.
    Undone { restored: usize },
    /// Nothing to undo for this actor.
    NoHistory,
    /// Wrong world, or too far from the batch.
    OutOfRange,
    /// A non-undoable side effect was applied to the batch.
    SideEffectApplied,
    /// The world changed under a snapshot; nothing was restored.
    Failed { position: Position },
}

impl UndoOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UndoOutcome::Undone { .. })
    }
}

impl fmt::Display for UndoOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UndoOutcome::Undone { restored } => write!(f, "undid {} placements", restored),
            UndoOutcome::NoHistory => write!(f, "nothing to undo"),
            UndoOutcome::OutOfRange => write!(f, "too far from the last placement to undo"),
            UndoOutcome::SideEffectApplied => {
                write!(f, "cannot undo, settings were applied to the placement")
            }
            UndoOutcome::Failed { position } => {
                write!(f, "cannot undo, the world changed at {}", position)
            }
        }
    }
}
