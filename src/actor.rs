use crate::world::WorldId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of the player driving a tool.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(Uuid);

impl ActorId {
    pub fn new(uuid: Uuid) -> Self {
        ActorId(uuid)
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for ActorId {
    fn from(uuid: Uuid) -> Self {
        ActorId(uuid)
    }
}

/// The actor as seen by one request: who, where, and whether resources are
/// charged at all.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub world: WorldId,
    /// Creative-style mode: nothing is drawn from the ledger or energy
    /// account, and undo returns nothing.
    #[serde(default)]
    pub unlimited: bool,
}

impl Actor {
    pub fn new(id: ActorId, world: WorldId) -> Self {
        Actor {
            id,
            world,
            unlimited: false,
        }
    }

    pub fn unlimited(mut self) -> Self {
        self.unlimited = true;
        self
    }
}
