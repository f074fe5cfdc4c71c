//! Public API for the placement engine.
//!
//! `EngineBuilder` configures a `PlacementEngine`, the context object the
//! host owns. The engine turns a request into candidates, runs the
//! transactional executor against the host's collaborators, and keeps the
//! per-actor undo history.

use crate::actor::*;
use crate::config::PlacementConfig;
use crate::dye::*;
use crate::executor::*;
use crate::history::*;
use crate::ledger::Ledger;
use crate::location::*;
use crate::outcome::*;
use crate::resolve::*;
use crate::resource::ConnectorFamily;
use crate::search::search_surface;
use crate::tool::AnchorSet;
use crate::world::*;
use log::*;

/// What to place.
#[derive(Clone, Debug)]
pub enum PlacementAction {
    /// Connectors along the geometry of a complete anchor set.
    Connectors {
        anchors: AnchorSet,
        family: ConnectorFamily,
        colors: ColorInputs,
    },
    /// Identical units across the surface of the clicked block.
    Contiguous {
        clicked: Position,
        face: Direction,
        max_count: usize,
        item: VariantResolver,
    },
}

#[derive(Clone, Debug)]
pub struct PlacementRequest {
    pub actor: Actor,
    pub action: PlacementAction,
}

/// Append-only builder for engine settings.
pub struct EngineBuilder {
    config: PlacementConfig,
}

impl EngineBuilder {
    /// Start from the default settings.
    pub fn new() -> Self {
        EngineBuilder {
            config: PlacementConfig::default(),
        }
    }

    /// Start from a loaded configuration.
    pub fn from_config(config: PlacementConfig) -> Self {
        EngineBuilder { config }
    }

    /// Set the energy charged per placed unit (default: 10.0).
    pub fn energy_per_unit(mut self, energy: f64) -> Self {
        self.config.energy_per_unit = energy;
        self
    }

    /// Set the resource amount debited per unit (default: 1).
    pub fn unit_quantity(mut self, quantity: u64) -> Self {
        self.config.unit_quantity = quantity;
        self
    }

    /// Set the cap on contiguous requests (default: 256).
    /// Larger `max_count` values in a request are clamped to this.
    pub fn max_contiguous(mut self, max: usize) -> Self {
        self.config.max_contiguous = max;
        self
    }

    /// Set the undo radius (default: 3).
    /// An undo is honored within this Chebyshev distance of a placed unit.
    pub fn undo_radius(mut self, radius: i32) -> Self {
        self.config.undo_radius = radius;
        self
    }

    /// Set the recolors bought by one dye (default: 8).
    pub fn dye_ratio(mut self, ratio: u32) -> Self {
        self.config.dye_ratio = ratio;
        self
    }

    /// Build the engine with an empty undo history.
    pub fn build(self) -> PlacementEngine {
        PlacementEngine {
            config: self.config,
            history: UndoHistory::new(),
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Engine context: settings plus every actor's undo slot.
pub struct PlacementEngine {
    config: PlacementConfig,
    history: UndoHistory,
}

impl PlacementEngine {
    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    /// Candidate positions for `action`, in placement order. Read-only.
    pub fn candidates<W: WorldView + ?Sized>(&self, action: &PlacementAction, world: &W) -> Vec<Position> {
        match action {
            PlacementAction::Connectors { anchors, .. } => anchors.candidates(),
            PlacementAction::Contiguous {
                clicked,
                face,
                max_count,
                ..
            } => {
                let limit = (*max_count).min(self.config.max_contiguous);
                search_surface(world, *clicked, *face, limit)
            }
        }
    }

    /// Candidates the world would currently accept, for preview rendering.
    pub fn preview<W: WorldView + ?Sized>(&self, action: &PlacementAction, world: &W) -> Vec<Position> {
        let kind = unit_kind(action);
        self.candidates(action, world)
            .into_iter()
            .filter(|p| world.accepts(*p, &kind))
            .collect()
    }

    /// Run one batch and, if anything was placed, make it the actor's
    /// pending undo.
    pub fn execute<W: Materializer + ?Sized>(
        &mut self,
        request: PlacementRequest,
        ctx: &mut PlacementContext<'_, W>,
    ) -> BatchResult {
        let candidates = self.candidates(&request.action, &*ctx.world);
        let mut resolver: Box<dyn KeyResolver> = match request.action {
            PlacementAction::Connectors { family, colors, .. } => {
                Box::new(ConnectorResolver::new(family, colors))
            }
            PlacementAction::Contiguous { item, .. } => Box::new(item),
        };

        let settings = ExecutionSettings {
            energy_per_unit: self.config.energy_per_unit,
            unit_quantity: self.config.unit_quantity,
            dye_ratio: self.config.dye_ratio,
            unlimited: request.actor.unlimited,
        };

        let report = execute(&candidates, resolver.as_mut(), &settings, ctx);

        if !report.batch.is_empty() {
            debug!(
                "Engine: {:?} placed {} in {}",
                request.actor.id,
                report.batch.len(),
                request.actor.world.as_str()
            );
            self.history
                .commit(request.actor.id, request.actor.world.clone(), report.batch);
        }

        report.result
    }

    /// Undo the actor's pending batch from `position`.
    pub fn undo<W: Materializer + ?Sized>(
        &mut self,
        actor: &Actor,
        position: Position,
        world: &mut W,
        ledger: &mut dyn Ledger,
    ) -> UndoOutcome {
        let radius = self.config.undo_radius.max(0) as u32;
        self.history.undo(actor, position, radius, world, ledger)
    }

    /// Record that a non-undoable side effect touched the actor's pending
    /// batch.
    pub fn mark_inert(&mut self, actor: &ActorId) -> bool {
        self.history.mark_inert(actor)
    }

    /// Drop the actor's history (on disconnect).
    pub fn forget(&mut self, actor: &ActorId) {
        self.history.forget(actor);
    }
}

fn unit_kind(action: &PlacementAction) -> UnitKind {
    match action {
        PlacementAction::Connectors { colors, .. } => UnitKind::Connector {
            color: decide_color(colors).color,
        },
        PlacementAction::Contiguous { .. } => UnitKind::Block,
    }
}
