//! Single-slot undo history, one entry per actor.
//!
//! Committing a batch replaces whatever the actor had pending. Undo is
//! all-or-nothing: every snapshot is checked before any is restored.

use crate::actor::*;
use crate::ledger::*;
use crate::location::*;
use crate::outcome::*;
use crate::snapshot::*;
use crate::world::*;
use fnv::FnvHashMap;
use log::*;

/// The pending batch of one actor.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    batch: Batch,
    world: WorldId,
    inert: bool,
}

impl HistoryEntry {
    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    pub fn world(&self) -> &WorldId {
        &self.world
    }

    /// True once a non-undoable side effect touched the batch.
    pub fn is_inert(&self) -> bool {
        self.inert
    }
}

#[derive(Default)]
pub struct UndoHistory {
    entries: FnvHashMap<ActorId, HistoryEntry>,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `batch` as the actor's only pending batch.
    pub fn commit(&mut self, actor: ActorId, world: WorldId, batch: Batch) {
        if let Some(previous) = self.entries.get(&actor) {
            trace!(
                "History: discarding previous batch of {} for {:?}",
                previous.batch.len(),
                actor
            );
        }
        self.entries.insert(
            actor,
            HistoryEntry {
                batch,
                world,
                inert: false,
            },
        );
    }

    /// Flag the pending batch as carrying a side effect that must not be
    /// undone. Returns false if there is no pending batch.
    pub fn mark_inert(&mut self, actor: &ActorId) -> bool {
        match self.entries.get_mut(actor) {
            Some(entry) => {
                entry.inert = true;
                true
            }
            None => false,
        }
    }

    pub fn pending(&self, actor: &ActorId) -> Option<&HistoryEntry> {
        self.entries.get(actor)
    }

    /// Drop the actor's entry (on disconnect).
    pub fn forget(&mut self, actor: &ActorId) -> Option<HistoryEntry> {
        self.entries.remove(actor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reverse the actor's pending batch.
    ///
    /// `reference` must lie within `radius` of a placed unit, in the same
    /// world the batch was placed in. Resources go back to `ledger` unless
    /// the actor is unlimited.
    pub fn undo<W: Materializer + ?Sized>(
        &mut self,
        actor: &Actor,
        reference: Position,
        radius: u32,
        world: &mut W,
        ledger: &mut dyn Ledger,
    ) -> UndoOutcome {
        let entry = match self.entries.get(&actor.id) {
            Some(entry) => entry,
            None => return UndoOutcome::NoHistory,
        };

        if entry.world != actor.world || !entry.batch.is_near(reference, radius) {
            return UndoOutcome::OutOfRange;
        }

        if entry.inert {
            return UndoOutcome::SideEffectApplied;
        }

        if let Some(blocked) = entry
            .batch
            .snapshots()
            .iter()
            .find(|snapshot| !snapshot.is_restorable(&*world))
        {
            debug!(
                "History: undo for {:?} blocked at {}",
                actor.id, blocked.position
            );
            return UndoOutcome::Failed {
                position: blocked.position,
            };
        }

        let entry = match self.entries.remove(&actor.id) {
            Some(entry) => entry,
            None => return UndoOutcome::NoHistory,
        };

        for snapshot in entry.batch.snapshots() {
            snapshot.restore(&mut *world);
            if !actor.unlimited && snapshot.amount > 0 {
                ledger.insert(&snapshot.key, snapshot.amount);
            }
        }

        let restored = entry.batch.len();
        debug!(
            "History: undid {} placements for {:?}, returned {}",
            restored,
            actor.id,
            if actor.unlimited { 0 } else { entry.batch.total_debited() }
        );

        UndoOutcome::Undone { restored }
    }
}
