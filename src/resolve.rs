//! Choosing which resource key pays for each unit.

use crate::dye::*;
use crate::ledger::*;
use crate::resource::*;
use crate::world::*;
use log::*;

/// Resource choice for one unit.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Resolution {
    /// Key to debit.
    pub key: ResourceKey,
    /// What gets placed when no paid recolor applies.
    pub kind: UnitKind,
    /// Recolor to apply if one secondary-resource credit can be spent.
    pub recolor: Option<Color>,
}

impl Resolution {
    pub fn unit(&self) -> PlacementUnit {
        PlacementUnit {
            key: self.key.clone(),
            kind: self.kind.clone(),
        }
    }
}

/// Priority rule for picking the key a unit is paid with.
pub trait KeyResolver {
    /// Unit kind used to pre-check candidates against the world.
    fn unit_kind(&self) -> UnitKind;

    /// How much of `amount` the ledger could cover from every key this
    /// resolver may draw on. Used for the pre-batch check.
    fn available(&self, ledger: &dyn Ledger, amount: u64) -> u64;

    /// Pick the key for the next unit of `amount`, or `None` if nothing
    /// this resolver accepts is available any more.
    fn resolve(&mut self, ledger: &dyn Ledger, amount: u64) -> Option<Resolution>;

    /// The choice made when nothing is charged (unlimited-resource actors).
    fn nominal(&self) -> Resolution;
}

/// Prefer one key; fall back to alternates in order.
#[derive(Clone, Debug)]
pub struct VariantResolver {
    preferred: ResourceKey,
    fallbacks: Vec<ResourceKey>,
}

impl VariantResolver {
    pub fn new(preferred: ResourceKey) -> Self {
        VariantResolver {
            preferred,
            fallbacks: Vec::new(),
        }
    }

    pub fn with_fallbacks(mut self, fallbacks: Vec<ResourceKey>) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    pub fn preferred(&self) -> &ResourceKey {
        &self.preferred
    }

    fn keys(&self) -> impl Iterator<Item = &ResourceKey> {
        std::iter::once(&self.preferred).chain(self.fallbacks.iter())
    }
}

impl KeyResolver for VariantResolver {
    fn unit_kind(&self) -> UnitKind {
        UnitKind::Block
    }

    fn available(&self, ledger: &dyn Ledger, amount: u64) -> u64 {
        self.keys()
            .map(|key| ledger.simulate(key, amount))
            .fold(0u64, |acc, n| acc.saturating_add(n))
    }

    fn resolve(&mut self, ledger: &dyn Ledger, amount: u64) -> Option<Resolution> {
        let key = self.keys().find(|key| ledger.simulate(key, amount) >= amount)?;
        Some(Resolution {
            key: key.clone(),
            kind: UnitKind::Block,
            recolor: None,
        })
    }

    fn nominal(&self) -> Resolution {
        Resolution {
            key: self.preferred.clone(),
            kind: UnitKind::Block,
            recolor: None,
        }
    }
}

/// Connector keys: the effective color first, then any color of the same
/// family in palette order.
#[derive(Clone, Debug)]
pub struct ConnectorResolver {
    family: ConnectorFamily,
    inputs: ColorInputs,
    decision: ColorDecision,
}

impl ConnectorResolver {
    pub fn new(family: ConnectorFamily, inputs: ColorInputs) -> Self {
        let decision = decide_color(&inputs);
        ConnectorResolver {
            family,
            inputs,
            decision,
        }
    }

    pub fn decision(&self) -> ColorDecision {
        self.decision
    }

    fn priority(&self) -> impl Iterator<Item = (Color, ResourceKey)> + '_ {
        let effective = self.decision.color;
        std::iter::once((effective, self.family.key(effective))).chain(
            self.family
                .keys()
                .filter(move |(color, _)| *color != effective),
        )
    }

    /// Color a connector paid with `key_color` ends up in, and the paid
    /// recolor it needs, if any.
    fn placement_color(&self, key_color: Color) -> (Color, Option<Color>) {
        let effective = self.decision.color;
        if key_color == effective {
            (key_color, None)
        } else if self.inputs.upgrade_installed {
            (effective, None)
        } else if self.decision.consumes_secondary {
            (key_color, Some(effective))
        } else {
            (key_color, None)
        }
    }
}

impl KeyResolver for ConnectorResolver {
    fn unit_kind(&self) -> UnitKind {
        UnitKind::Connector {
            color: self.decision.color,
        }
    }

    fn available(&self, ledger: &dyn Ledger, amount: u64) -> u64 {
        self.family
            .keys()
            .map(|(_, key)| ledger.simulate(&key, amount))
            .fold(0u64, |acc, n| acc.saturating_add(n))
    }

    fn resolve(&mut self, ledger: &dyn Ledger, amount: u64) -> Option<Resolution> {
        let (key_color, key) = self
            .priority()
            .find(|(_, key)| ledger.simulate(key, amount) >= amount)?;
        let (color, recolor) = self.placement_color(key_color);

        if key_color != self.decision.color {
            trace!(
                "Connector: {} unavailable, paying with {}",
                self.family.key(self.decision.color),
                key
            );
        }

        Some(Resolution {
            key,
            kind: UnitKind::Connector { color },
            recolor,
        })
    }

    fn nominal(&self) -> Resolution {
        let color = self.decision.color;
        Resolution {
            key: self.family.key(color),
            kind: UnitKind::Connector { color },
            recolor: None,
        }
    }
}
