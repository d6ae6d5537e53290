//! Derived price calculator - Computes per-unit sale prices for a product.
//!
//! Given a cost basis and a tier's profit percentage, produces a sale price
//! for the product's base unit and for every active destination unit in its
//! conversion table, respecting manual overrides. The calculator is a pure
//! function over its inputs: override state is an explicit value held by the
//! caller and passed in, so recomputation never drifts and never clobbers an
//! operator-edited price.

use crate::{
    core::conversion::ConversionTable,
    errors::{Error, Result},
    models::{PriceTier, TierId, UnitId, UnitPrice},
};
use std::collections::HashMap;

/// Rounds to 2 decimal places, half away from zero.
///
/// One fixed rule for every derived price so repeated computations produce
/// reproducible totals.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Manual price overrides held by the editing session, keyed by
/// `(tier, unit)`.
///
/// Once a pair is marked manual, [`compute_unit_prices`] returns the stored
/// amount unchanged until the override is cleared. Overrides for a tier are
/// cleared as a whole when the tier is deselected.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverrideMap {
    overrides: HashMap<(TierId, UnitId), f64>,
}

impl OverrideMap {
    /// Creates an empty override map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `(tier_id, unit_id)` as manually set to `amount`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAmount`] when `amount` is negative or not
    /// finite; the map is left unmodified.
    pub fn mark_manual(&mut self, tier_id: TierId, unit_id: UnitId, amount: f64) -> Result<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidAmount { amount });
        }
        self.overrides.insert((tier_id, unit_id), amount);
        Ok(())
    }

    /// Removes the manual flag for `(tier_id, unit_id)`, allowing
    /// recomputation on the next call.
    pub fn clear(&mut self, tier_id: TierId, unit_id: UnitId) {
        self.overrides.remove(&(tier_id, unit_id));
    }

    /// Removes every override belonging to `tier_id`; called when the owning
    /// price entry is deselected.
    pub fn clear_tier(&mut self, tier_id: TierId) {
        self.overrides.retain(|(t, _), _| *t != tier_id);
    }

    /// Returns the stored amount for `(tier_id, unit_id)` when it is manual.
    #[must_use]
    pub fn get(&self, tier_id: TierId, unit_id: UnitId) -> Option<f64> {
        self.overrides.get(&(tier_id, unit_id)).copied()
    }

    /// Returns true when `(tier_id, unit_id)` has been manually edited.
    #[must_use]
    pub fn is_manual(&self, tier_id: TierId, unit_id: UnitId) -> bool {
        self.overrides.contains_key(&(tier_id, unit_id))
    }

    /// Returns true when no override is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

/// Computes the sale price for the product's base (storage) unit.
///
/// `base_unit_price = round2(cost * (1 + profit_percent / 100))`; a cost of
/// zero yields a zero price.
///
/// # Errors
/// Returns [`Error::NegativeCost`] when `cost < 0` and
/// [`Error::InvalidAmount`] when either input is not finite. Negative costs
/// are surfaced, never silently clamped to zero.
pub fn base_unit_price(cost: f64, profit_percent: f64) -> Result<f64> {
    if !cost.is_finite() {
        return Err(Error::InvalidAmount { amount: cost });
    }
    if !profit_percent.is_finite() {
        return Err(Error::InvalidAmount {
            amount: profit_percent,
        });
    }
    if cost < 0.0 {
        return Err(Error::NegativeCost { cost });
    }
    if cost == 0.0 {
        return Ok(0.0);
    }
    Ok(round2(cost * (1.0 + profit_percent / 100.0)))
}

/// Computes the sale price for every configured unit of a fractional product.
///
/// The base unit gets [`base_unit_price`]; each active conversion with factor
/// `f` gets `round2(base_price / f)`. Inactive conversions produce no entry.
/// Units with a manual override return the stored amount with
/// `manual = true`, regardless of the current cost or profit percentage.
///
/// Invalid factors never reach this function: the conversion table rejects
/// them at mutation time.
///
/// # Errors
/// Returns [`Error::NegativeCost`] or [`Error::InvalidAmount`] for invalid
/// cost inputs, as in [`base_unit_price`].
pub fn compute_unit_prices(
    cost: f64,
    tier: &PriceTier,
    base_unit_id: UnitId,
    conversions: &ConversionTable,
    overrides: &OverrideMap,
) -> Result<HashMap<UnitId, UnitPrice>> {
    let base_price = base_unit_price(cost, tier.profit_percent)?;

    let mut prices = HashMap::with_capacity(conversions.len() + 1);

    let base_entry = match overrides.get(tier.id, base_unit_id) {
        Some(amount) => UnitPrice {
            amount,
            manual: true,
        },
        None => UnitPrice {
            amount: base_price,
            manual: false,
        },
    };
    prices.insert(base_unit_id, base_entry);

    for conversion in conversions.active_entries() {
        let unit_id = conversion.destination_unit_id;
        let entry = match overrides.get(tier.id, unit_id) {
            Some(amount) => UnitPrice {
                amount,
                manual: true,
            },
            None => UnitPrice {
                amount: round2(base_price / conversion.factor),
                manual: false,
            },
        };
        prices.insert(unit_id, entry);
    }

    Ok(prices)
}
