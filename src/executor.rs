//! Transactional placement against the remote ledger.
//!
//! A batch is checked before anything is touched: energy first, then the
//! ledger simulation for the whole demand. Units are then placed one at a
//! time and each is debited right after it materializes. A unit the world
//! refuses is skipped; a unit whose commit-extract comes up short is
//! reverted and ends the batch. The ledger is never debited for a unit that
//! is not in the world, and no unit stays in the world undebited.
//! Dye for a recolor is only checked up front; it is bought after the
//! unit's own debit went through.

use crate::dye::*;
use crate::energy::*;
use crate::ledger::*;
use crate::location::*;
use crate::outcome::*;
use crate::resolve::*;
use crate::snapshot::*;
use crate::world::*;
use log::*;

/// Collaborators for one execution.
pub struct PlacementContext<'a, W: ?Sized> {
    pub world: &'a mut W,
    pub ledger: &'a mut dyn Ledger,
    pub energy: &'a mut dyn EnergyAccount,
    /// The actor's own stores, drawn on for dye after the pool.
    pub carried: Option<CarriedSupply<'a>>,
}

impl<'a, W: ?Sized> PlacementContext<'a, W> {
    pub fn new(world: &'a mut W, ledger: &'a mut dyn Ledger, energy: &'a mut dyn EnergyAccount) -> Self {
        PlacementContext {
            world,
            ledger,
            energy,
            carried: None,
        }
    }

    pub fn with_carried(mut self, carried: CarriedSupply<'a>) -> Self {
        self.carried = Some(carried);
        self
    }
}

/// Per-batch charging rules.
#[derive(Copy, Clone, Debug)]
pub struct ExecutionSettings {
    pub energy_per_unit: f64,
    pub unit_quantity: u64,
    pub dye_ratio: u32,
    /// Skip the ledger and energy account entirely.
    pub unlimited: bool,
}

/// Result of one execution together with the snapshots it produced.
#[derive(Debug)]
pub struct ExecutionReport {
    pub result: BatchResult,
    pub batch: Batch,
}

impl ExecutionReport {
    fn failed(failure: PlacementFailure) -> Self {
        ExecutionReport {
            result: BatchResult::failed(failure),
            batch: Batch::new(),
        }
    }
}

/// Place `candidates` in order, paying for each with the key chosen by
/// `resolver`.
pub fn execute<W: Materializer + ?Sized>(
    candidates: &[Position],
    resolver: &mut dyn KeyResolver,
    settings: &ExecutionSettings,
    ctx: &mut PlacementContext<'_, W>,
) -> ExecutionReport {
    let kind = resolver.unit_kind();
    let targets: Vec<Position> = candidates
        .iter()
        .copied()
        .filter(|p| ctx.world.accepts(*p, &kind))
        .collect();

    if targets.is_empty() {
        return ExecutionReport::failed(PlacementFailure::NoValidCandidates);
    }

    let quantity = settings.unit_quantity.max(1);

    if !settings.unlimited {
        let energy_required = settings.energy_per_unit * targets.len() as f64;
        if !ctx.energy.has(energy_required) {
            debug!("Batch: insufficient energy, {} required", energy_required);
            return ExecutionReport::failed(PlacementFailure::InsufficientEnergy {
                required: energy_required,
            });
        }

        let demand = targets.len() as u64 * quantity;
        let available = resolver.available(&*ctx.ledger, demand);
        if available < demand {
            debug!(
                "Batch: insufficient resources, {} required, {} available",
                demand, available
            );
            return ExecutionReport::failed(PlacementFailure::InsufficientResource {
                required: demand,
                available,
            });
        }
    }

    let mut batch = Batch::new();
    let mut credit = DyeCredit::new(settings.dye_ratio);
    let mut stopped_at: Option<Position> = None;

    for &position in &targets {
        if !ctx.world.accepts(position, &kind) {
            trace!("Batch: {} no longer accepts a unit, skipping", position);
            continue;
        }

        let resolution = if settings.unlimited {
            resolver.nominal()
        } else {
            match resolver.resolve(&*ctx.ledger, quantity) {
                Some(resolution) => resolution,
                None => {
                    warn!("Batch: no resource left for {}, stopping", position);
                    stopped_at = Some(position);
                    break;
                }
            }
        };

        let mut unit = resolution.unit();
        let mut dyed = None;
        if let Some(color) = resolution.recolor {
            if credit.can_cover(color, &mut *ctx.ledger, ctx.carried.as_mut()) {
                unit.kind = UnitKind::Connector { color };
                dyed = Some(color);
            }
        }

        let prior = ctx.world.cell_state(position);
        if !ctx.world.place(position, &unit) {
            trace!("Batch: world refused {} at {}, skipping", unit.key, position);
            continue;
        }

        let amount = if settings.unlimited { 0 } else { quantity };
        let snapshot =
            PlacementSnapshot::capture(&*ctx.world, position, prior, unit.key.clone(), amount, &unit.kind);

        if !settings.unlimited {
            let granted = ctx.ledger.extract(&unit.key, quantity, true);
            if granted < quantity {
                if granted > 0 {
                    ctx.ledger.insert(&unit.key, granted);
                }
                snapshot.restore(&mut *ctx.world);
                warn!(
                    "Batch: commit of {} x{} granted {} at {}, reverted and stopping",
                    unit.key, quantity, granted, position
                );
                stopped_at = Some(position);
                break;
            }
        }

        if let Some(color) = dyed {
            if !credit.spend(color, &mut *ctx.ledger, ctx.carried.as_mut()) {
                if !settings.unlimited {
                    ctx.ledger.insert(&unit.key, quantity);
                }
                snapshot.restore(&mut *ctx.world);
                warn!("Batch: dye for {:?} gone at {}, reverted and stopping", color, position);
                stopped_at = Some(position);
                break;
            }
        }

        batch.push(snapshot);
    }

    if batch.is_empty() {
        debug!("Batch: nothing placed out of {} targets", targets.len());
        return ExecutionReport::failed(PlacementFailure::CannotPlace);
    }

    let placed = batch.len();
    if !settings.unlimited {
        let cost = settings.energy_per_unit * placed as f64;
        if !ctx.energy.debit(cost) {
            warn!("Batch: energy debit of {} refused after placing {}", cost, placed);
        }
    }

    debug!(
        "Batch: placed {}/{} units, debited {}, dye used {}",
        placed,
        targets.len(),
        batch.total_debited(),
        credit.spent_units()
    );

    ExecutionReport {
        result: BatchResult {
            placed,
            failure: stopped_at.map(|position| PlacementFailure::PartialRace { placed, position }),
        },
        batch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridWorld;
    use crate::resource::*;

    fn settings() -> ExecutionSettings {
        ExecutionSettings {
            energy_per_unit: 1.0,
            unit_quantity: 1,
            dye_ratio: 8,
            unlimited: false,
        }
    }

    fn row(n: i32) -> Vec<Position> {
        (0..n).map(|x| Position::new(x, 0, 0)).collect()
    }

    /// Ledger whose commit-extracts start granting nothing after a set
    /// number of successful commits.
    struct FlakyLedger {
        inner: MemoryLedger,
        commits_left: usize,
    }

    impl Ledger for FlakyLedger {
        fn simulate(&self, key: &ResourceKey, amount: u64) -> u64 {
            self.inner.simulate(key, amount)
        }

        fn extract(&mut self, key: &ResourceKey, amount: u64, commit: bool) -> u64 {
            if commit {
                if self.commits_left == 0 {
                    return 0;
                }
                self.commits_left -= 1;
            }
            self.inner.extract(key, amount, commit)
        }

        fn insert(&mut self, key: &ResourceKey, amount: u64) {
            self.inner.insert(key, amount)
        }
    }

    #[test]
    fn test_places_and_debits_each_unit() {
        let stone = ResourceKey::item("stone");
        let mut world = GridWorld::new();
        let mut ledger = MemoryLedger::new().with_stock(stone.clone(), 10);
        let mut energy = EnergyBuffer::full(100.0);
        let mut resolver = VariantResolver::new(stone.clone());

        let report = {
            let mut ctx = PlacementContext::new(&mut world, &mut ledger, &mut energy);
            execute(&row(4), &mut resolver, &settings(), &mut ctx)
        };

        assert_eq!(report.result, BatchResult::placed(4));
        assert_eq!(report.batch.total_debited(), 4);
        assert_eq!(ledger.amount(&stone), 6);
        assert_eq!(energy.stored(), 96.0);
        assert_eq!(world.occupied_count(), 4);
    }

    #[test]
    fn test_insufficient_resource_touches_nothing() {
        let stone = ResourceKey::item("stone");
        let mut world = GridWorld::new();
        let mut ledger = MemoryLedger::new().with_stock(stone.clone(), 3);
        let mut energy = EnergyBuffer::full(100.0);
        let mut resolver = VariantResolver::new(stone.clone());

        let report = {
            let mut ctx = PlacementContext::new(&mut world, &mut ledger, &mut energy);
            execute(&row(4), &mut resolver, &settings(), &mut ctx)
        };

        assert_eq!(
            report.result.failure,
            Some(PlacementFailure::InsufficientResource {
                required: 4,
                available: 3
            })
        );
        assert_eq!(ledger.amount(&stone), 3);
        assert_eq!(energy.stored(), 100.0);
        assert_eq!(world.occupied_count(), 0);
    }

    #[test]
    fn test_insufficient_energy_checked_before_ledger() {
        let stone = ResourceKey::item("stone");
        let mut world = GridWorld::new();
        let mut ledger = MemoryLedger::new();
        let mut energy = EnergyBuffer::full(3.0);
        let mut resolver = VariantResolver::new(stone);

        let report = {
            let mut ctx = PlacementContext::new(&mut world, &mut ledger, &mut energy);
            execute(&row(4), &mut resolver, &settings(), &mut ctx)
        };

        assert_eq!(
            report.result.failure,
            Some(PlacementFailure::InsufficientEnergy { required: 4.0 })
        );
    }

    #[test]
    fn test_no_valid_candidates() {
        let stone = ResourceKey::item("stone");
        let mut world = GridWorld::new();
        world.set_block(Position::new(0, 0, 0), BlockId::new("dirt"));
        let mut ledger = MemoryLedger::new().with_stock(stone.clone(), 5);
        let mut energy = EnergyBuffer::full(100.0);
        let mut resolver = VariantResolver::new(stone);

        let report = {
            let mut ctx = PlacementContext::new(&mut world, &mut ledger, &mut energy);
            execute(&row(1), &mut resolver, &settings(), &mut ctx)
        };

        assert_eq!(report.result.failure, Some(PlacementFailure::NoValidCandidates));
        assert!(report.batch.is_empty());
    }

    #[test]
    fn test_race_reverts_unit_and_stops() {
        let stone = ResourceKey::item("stone");
        let mut world = GridWorld::new();
        let mut ledger = FlakyLedger {
            inner: MemoryLedger::new().with_stock(stone.clone(), 10),
            commits_left: 2,
        };
        let mut energy = EnergyBuffer::full(100.0);
        let mut resolver = VariantResolver::new(stone.clone());

        let report = {
            let mut ctx = PlacementContext::new(&mut world, &mut ledger, &mut energy);
            execute(&row(5), &mut resolver, &settings(), &mut ctx)
        };

        assert_eq!(report.batch.len(), 2);
        assert_eq!(
            report.result.failure,
            Some(PlacementFailure::PartialRace {
                placed: 2,
                position: Position::new(2, 0, 0)
            })
        );
        assert_eq!(ledger.inner.amount(&stone), 8);
        assert!(world.occupant(Position::new(2, 0, 0)).is_air());
        assert_eq!(world.occupied_count(), 2);
        assert_eq!(energy.stored(), 98.0);
    }

    #[test]
    fn test_race_on_first_unit_cannot_place() {
        let stone = ResourceKey::item("stone");
        let mut world = GridWorld::new();
        let mut ledger = FlakyLedger {
            inner: MemoryLedger::new().with_stock(stone.clone(), 10),
            commits_left: 0,
        };
        let mut energy = EnergyBuffer::full(100.0);
        let mut resolver = VariantResolver::new(stone.clone());

        let report = {
            let mut ctx = PlacementContext::new(&mut world, &mut ledger, &mut energy);
            execute(&row(3), &mut resolver, &settings(), &mut ctx)
        };

        assert_eq!(report.result.failure, Some(PlacementFailure::CannotPlace));
        assert_eq!(world.occupied_count(), 0);
        assert_eq!(energy.stored(), 100.0);
    }

    #[test]
    fn test_partial_grant_is_returned() {
        let stone = ResourceKey::item("stone");
        let mut world = GridWorld::new();
        // Enough for the simulated total of 2 x 3, but the second commit
        // only finds 2 left after a concurrent withdrawal.
        struct Shrinking {
            inner: MemoryLedger,
            commits: usize,
        }
        impl Ledger for Shrinking {
            fn simulate(&self, key: &ResourceKey, amount: u64) -> u64 {
                self.inner.simulate(key, amount)
            }
            fn extract(&mut self, key: &ResourceKey, amount: u64, commit: bool) -> u64 {
                if commit {
                    self.commits += 1;
                    if self.commits == 2 {
                        let stock = self.inner.amount(key);
                        self.inner.extract(key, stock - 2, true);
                    }
                }
                self.inner.extract(key, amount, commit)
            }
            fn insert(&mut self, key: &ResourceKey, amount: u64) {
                self.inner.insert(key, amount)
            }
        }

        let mut ledger = Shrinking {
            inner: MemoryLedger::new().with_stock(stone.clone(), 6),
            commits: 0,
        };
        let mut energy = EnergyBuffer::full(100.0);
        let mut resolver = VariantResolver::new(stone.clone());
        let mut s = settings();
        s.unit_quantity = 3;

        let report = {
            let mut ctx = PlacementContext::new(&mut world, &mut ledger, &mut energy);
            execute(&row(2), &mut resolver, &s, &mut ctx)
        };

        assert_eq!(report.batch.len(), 1);
        assert_eq!(report.batch.total_debited(), 3);
        assert_eq!(ledger.inner.amount(&stone), 2);
    }

    #[test]
    fn test_skips_cells_the_world_refuses() {
        struct Picky {
            grid: GridWorld,
            refuse: Position,
        }
        impl WorldView for Picky {
            fn is_placeable(&self, position: Position) -> bool {
                self.grid.is_placeable(position)
            }
            fn occupant(&self, position: Position) -> BlockId {
                self.grid.occupant(position)
            }
            fn cell_state(&self, position: Position) -> CellState {
                self.grid.cell_state(position)
            }
        }
        impl Materializer for Picky {
            fn place(&mut self, position: Position, unit: &PlacementUnit) -> bool {
                position != self.refuse && self.grid.place(position, unit)
            }
            fn revert(&mut self, position: Position, prior: &CellState) {
                self.grid.revert(position, prior)
            }
            fn remove_connector(&mut self, position: Position, prior: &CellState) {
                self.grid.remove_connector(position, prior)
            }
        }

        let stone = ResourceKey::item("stone");
        let mut world = Picky {
            grid: GridWorld::new(),
            refuse: Position::new(1, 0, 0),
        };
        let mut ledger = MemoryLedger::new().with_stock(stone.clone(), 3);
        let mut energy = EnergyBuffer::full(100.0);
        let mut resolver = VariantResolver::new(stone.clone());

        let report = {
            let mut ctx = PlacementContext::new(&mut world, &mut ledger, &mut energy);
            execute(&row(3), &mut resolver, &settings(), &mut ctx)
        };

        assert_eq!(report.result, BatchResult::placed(2));
        assert_eq!(ledger.amount(&stone), 1);
        assert!(world.grid.occupant(Position::new(1, 0, 0)).is_air());
    }

    #[test]
    fn test_unlimited_skips_ledger_and_energy() {
        let stone = ResourceKey::item("stone");
        let mut world = GridWorld::new();
        let mut ledger = MemoryLedger::new();
        let mut energy = EnergyBuffer::new(0.0);
        let mut resolver = VariantResolver::new(stone.clone());
        let mut s = settings();
        s.unlimited = true;

        let report = {
            let mut ctx = PlacementContext::new(&mut world, &mut ledger, &mut energy);
            execute(&row(3), &mut resolver, &s, &mut ctx)
        };

        assert_eq!(report.result, BatchResult::placed(3));
        assert_eq!(report.batch.total_debited(), 0);
        assert_eq!(world.occupant(Position::new(2, 0, 0)), BlockId::new("stone"));
    }

    #[test]
    fn test_connectors_recolored_with_dye_from_carried_inventory() {
        let family = ConnectorFamily::new("cable");
        let dye = Color::Red.dye_key().unwrap();
        let mut world = GridWorld::new();
        let mut ledger = MemoryLedger::new().with_stock(family.key(Color::Neutral), 10);
        let mut inventory = MemoryLedger::new().with_stock(dye.clone(), 1);
        let mut energy = EnergyBuffer::full(100.0);
        let mut resolver = ConnectorResolver::new(
            family.clone(),
            ColorInputs {
                held_dye: Some(Color::Red),
                upgrade_installed: false,
                selected: Color::Neutral,
            },
        );

        let report = {
            let carried = CarriedSupply::new().then(&mut inventory);
            let mut ctx = PlacementContext::new(&mut world, &mut ledger, &mut energy).with_carried(carried);
            execute(&row(10), &mut resolver, &settings(), &mut ctx)
        };

        assert_eq!(report.result, BatchResult::placed(10));
        assert_eq!(inventory.amount(&dye), 0);
        assert_eq!(ledger.amount(&family.key(Color::Neutral)), 0);

        let colors: Vec<Color> = (0..10)
            .map(|x| {
                world
                    .cell_state(Position::new(x, 0, 0))
                    .connector
                    .map(|c| c.color)
                    .unwrap_or(Color::Neutral)
            })
            .collect();
        // One dye covers eight connectors; the rest keep their own color.
        assert!(colors[..8].iter().all(|c| *c == Color::Red));
        assert!(colors[8..].iter().all(|c| *c == Color::Neutral));
        assert!(report
            .batch
            .snapshots()
            .iter()
            .all(|s| s.key == family.key(Color::Neutral)));
    }

    fn held_red() -> ColorInputs {
        ColorInputs {
            held_dye: Some(Color::Red),
            upgrade_installed: false,
            selected: Color::Neutral,
        }
    }

    #[test]
    fn test_refused_units_leave_dye_alone() {
        struct Refusing(GridWorld);
        impl WorldView for Refusing {
            fn is_placeable(&self, position: Position) -> bool {
                self.0.is_placeable(position)
            }
            fn occupant(&self, position: Position) -> BlockId {
                self.0.occupant(position)
            }
            fn cell_state(&self, position: Position) -> CellState {
                self.0.cell_state(position)
            }
        }
        impl Materializer for Refusing {
            fn place(&mut self, _position: Position, _unit: &PlacementUnit) -> bool {
                false
            }
            fn revert(&mut self, position: Position, prior: &CellState) {
                self.0.revert(position, prior)
            }
            fn remove_connector(&mut self, position: Position, prior: &CellState) {
                self.0.remove_connector(position, prior)
            }
        }

        let family = ConnectorFamily::new("cable");
        let dye = Color::Red.dye_key().unwrap();
        let mut world = Refusing(GridWorld::new());
        let mut ledger = MemoryLedger::new()
            .with_stock(family.key(Color::Neutral), 10)
            .with_stock(dye.clone(), 3);
        let mut energy = EnergyBuffer::full(100.0);
        let mut resolver = ConnectorResolver::new(family.clone(), held_red());

        let report = {
            let mut ctx = PlacementContext::new(&mut world, &mut ledger, &mut energy);
            execute(&row(4), &mut resolver, &settings(), &mut ctx)
        };

        assert_eq!(report.result.failure, Some(PlacementFailure::CannotPlace));
        assert_eq!(ledger.amount(&dye), 3);
        assert_eq!(ledger.amount(&family.key(Color::Neutral)), 10);
        assert_eq!(energy.stored(), 100.0);
    }

    #[test]
    fn test_race_on_dyed_unit_keeps_dye() {
        let family = ConnectorFamily::new("cable");
        let dye = Color::Red.dye_key().unwrap();
        let mut world = GridWorld::new();
        let mut ledger = FlakyLedger {
            inner: MemoryLedger::new()
                .with_stock(family.key(Color::Neutral), 10)
                .with_stock(dye.clone(), 1),
            commits_left: 0,
        };
        let mut energy = EnergyBuffer::full(100.0);
        let mut resolver = ConnectorResolver::new(family.clone(), held_red());

        let report = {
            let mut ctx = PlacementContext::new(&mut world, &mut ledger, &mut energy);
            execute(&row(2), &mut resolver, &settings(), &mut ctx)
        };

        assert_eq!(report.result.failure, Some(PlacementFailure::CannotPlace));
        assert_eq!(ledger.inner.amount(&dye), 1);
        assert_eq!(world.occupied_count(), 0);
    }

    #[test]
    fn test_vanished_dye_reverts_unit_and_refunds_it() {
        let family = ConnectorFamily::new("cable");
        let dye = Color::Red.dye_key().unwrap();
        let mut world = GridWorld::new();
        let mut ledger = MemoryLedger::new().with_stock(family.key(Color::Neutral), 10);
        // Simulates one dye but hands out nothing on commit.
        let mut inventory = FlakyLedger {
            inner: MemoryLedger::new().with_stock(dye.clone(), 1),
            commits_left: 0,
        };
        let mut energy = EnergyBuffer::full(100.0);
        let mut resolver = ConnectorResolver::new(family.clone(), held_red());

        let report = {
            let carried = CarriedSupply::new().then(&mut inventory);
            let mut ctx = PlacementContext::new(&mut world, &mut ledger, &mut energy).with_carried(carried);
            execute(&row(3), &mut resolver, &settings(), &mut ctx)
        };

        assert_eq!(report.result.failure, Some(PlacementFailure::CannotPlace));
        assert_eq!(ledger.amount(&family.key(Color::Neutral)), 10);
        assert_eq!(inventory.inner.amount(&dye), 1);
        assert_eq!(world.occupied_count(), 0);
    }
}
