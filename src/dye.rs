//! Connector color selection and secondary (dye) sourcing.

use crate::ledger::*;
use crate::resource::*;
use log::*;
use serde::{Deserialize, Serialize};

/// Inputs to the color decision for one connector batch.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct ColorInputs {
    /// Color of the dye held in the auxiliary hand, if any.
    pub held_dye: Option<Color>,
    /// Tool carries the free-recolor upgrade.
    pub upgrade_installed: bool,
    /// Color stored on the tool.
    pub selected: Color,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ColorDecision {
    pub color: Color,
    /// Recoloring a connector to `color` costs secondary resource.
    pub consumes_secondary: bool,
}

/// Pick the effective color and whether recoloring consumes dye.
///
/// | held dye | upgrade | color          | consumes |
/// |----------|---------|----------------|----------|
/// | yes      | yes     | dye color      | no       |
/// | yes      | no      | dye color      | yes      |
/// | no       | yes     | stored choice  | no       |
/// | no       | no      | neutral        | no       |
pub fn decide_color(inputs: &ColorInputs) -> ColorDecision {
    match (inputs.held_dye, inputs.upgrade_installed) {
        (Some(dye), true) => ColorDecision {
            color: dye,
            consumes_secondary: false,
        },
        (Some(dye), false) => ColorDecision {
            color: dye,
            consumes_secondary: true,
        },
        (None, true) => ColorDecision {
            color: inputs.selected,
            consumes_secondary: false,
        },
        (None, false) => ColorDecision {
            color: Color::Neutral,
            consumes_secondary: false,
        },
    }
}

/// The actor's own stores, asked for secondary resources after the pool:
/// carried inventory first, then the auxiliary hand.
#[derive(Default)]
pub struct CarriedSupply<'a> {
    phases: Vec<&'a mut dyn Ledger>,
}

impl<'a> CarriedSupply<'a> {
    pub fn new() -> Self {
        CarriedSupply { phases: Vec::new() }
    }

    /// Append a store to the fallback order.
    pub fn then(mut self, store: &'a mut dyn Ledger) -> Self {
        self.phases.push(store);
        self
    }
}

/// Extract `amount` of `key`, trying `pool` first and then each carried
/// store. Every phase is asked only for what is still missing.
pub fn extract_with_fallback(
    pool: &mut dyn Ledger,
    carried: Option<&mut CarriedSupply<'_>>,
    key: &ResourceKey,
    amount: u64,
    commit: bool,
) -> u64 {
    let mut granted = pool.extract(key, amount, commit);

    if let Some(carried) = carried {
        for phase in carried.phases.iter_mut() {
            if granted >= amount {
                break;
            }
            granted += phase.extract(key, amount - granted, commit);
        }
    }

    granted
}

/// Recolors paid for but not yet used within the current batch.
///
/// One secondary unit buys `ratio` recolors; credit left at the end of a
/// batch is discarded.
#[derive(Clone, Debug)]
pub struct DyeCredit {
    ratio: u32,
    remaining: u32,
    spent_units: u64,
}

impl DyeCredit {
    pub fn new(ratio: u32) -> Self {
        DyeCredit {
            ratio: ratio.max(1),
            remaining: 0,
            spent_units: 0,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Secondary units debited so far.
    pub fn spent_units(&self) -> u64 {
        self.spent_units
    }

    /// True if one more recolor of `color` can be paid for, from credit on
    /// hand or a simulated dye purchase. Nothing is debited.
    pub fn can_cover(
        &self,
        color: Color,
        pool: &mut dyn Ledger,
        carried: Option<&mut CarriedSupply<'_>>,
    ) -> bool {
        let key = match color.dye_key() {
            Some(key) => key,
            None => return false,
        };
        self.remaining > 0 || extract_with_fallback(pool, carried, &key, 1, false) > 0
    }

    /// Consume one recolor of `color`, buying a fresh unit of dye if the
    /// credit is used up. Returns false if no dye could be sourced.
    pub fn spend(
        &mut self,
        color: Color,
        pool: &mut dyn Ledger,
        carried: Option<&mut CarriedSupply<'_>>,
    ) -> bool {
        let key = match color.dye_key() {
            Some(key) => key,
            None => return false,
        };

        if self.remaining == 0 {
            if extract_with_fallback(pool, carried, &key, 1, true) == 0 {
                debug!("Dye: no {} available for recolor", key);
                return false;
            }
            self.spent_units += 1;
            self.remaining = self.ratio;
        }

        self.remaining -= 1;
        true
    }
}
