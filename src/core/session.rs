//! Wizard session - The draft product being composed by one operator.
//!
//! One session owns the in-memory state of one open product form: the draft
//! fields, the conversion table, the selected price tiers, and the manual
//! override map. All mutation funnels through here so derived prices are
//! recomputed exactly when an input they depend on changes, and so override
//! lifecycle (created on first manual edit, cleared when the owning tier is
//! deselected) has a single owner. State is confined to one session; there
//! is no concurrent mutation of the same product from this module.

use crate::{
    api::types::SaveProductRequest,
    core::{
        conversion::ConversionTable,
        pricing::{self, OverrideMap},
    },
    errors::{Error, Result},
    models::{ConversionDraft, PriceEntry, PriceTier, TierId, UnitId},
};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use tracing::{debug, info};

/// The product being composed, before it is ever persisted.
#[derive(Clone, Debug)]
pub struct ProductDraft {
    /// Server id when editing an existing product, `None` when creating
    pub id: Option<i64>,
    /// Product display name
    pub name: String,
    /// Decoded barcode payload, when one was captured
    pub barcode: Option<String>,
    base_unit_id: UnitId,
    cost: f64,
    /// Whether the product can be sold in destination units
    pub fractional: bool,
    conversions: ConversionTable,
    selected_tiers: HashMap<TierId, PriceTier>,
    entries: HashMap<TierId, PriceEntry>,
    overrides: OverrideMap,
    updated_at: NaiveDateTime,
}

impl ProductDraft {
    /// Starts a fresh draft for a new product tracked in `base_unit_id`.
    #[must_use]
    pub fn new(name: String, base_unit_id: UnitId) -> Self {
        Self {
            id: None,
            name,
            barcode: None,
            base_unit_id,
            cost: 0.0,
            fractional: false,
            conversions: ConversionTable::new(),
            selected_tiers: HashMap::new(),
            entries: HashMap::new(),
            overrides: OverrideMap::new(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Returns the unit the product's stock is tracked in.
    #[must_use]
    pub const fn base_unit_id(&self) -> UnitId {
        self.base_unit_id
    }

    /// Returns the current cost basis.
    #[must_use]
    pub const fn cost(&self) -> f64 {
        self.cost
    }

    /// Returns the conversion table as composed so far.
    #[must_use]
    pub const fn conversions(&self) -> &ConversionTable {
        &self.conversions
    }

    /// Returns the price entry for `tier_id`, when that tier is selected.
    #[must_use]
    pub fn price_entry(&self, tier_id: TierId) -> Option<&PriceEntry> {
        self.entries.get(&tier_id)
    }

    /// Returns the override map held by this session.
    #[must_use]
    pub const fn overrides(&self) -> &OverrideMap {
        &self.overrides
    }

    /// Returns the last local modification time (naive UTC).
    #[must_use]
    pub const fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().naive_utc();
    }

    /// Sets the cost basis and recomputes every selected tier, respecting
    /// manual overrides.
    ///
    /// # Errors
    /// Returns [`Error::NegativeCost`] or [`Error::InvalidAmount`] for an
    /// invalid cost; the draft is left unmodified.
    pub fn set_cost(&mut self, cost: f64) -> Result<()> {
        if !cost.is_finite() {
            return Err(Error::InvalidAmount { amount: cost });
        }
        if cost < 0.0 {
            return Err(Error::NegativeCost { cost });
        }
        self.cost = cost;
        self.recompute()?;
        self.touch();
        debug!("Cost set to {cost}; {} tier(s) recomputed", self.entries.len());
        Ok(())
    }

    /// Selects a price tier, creating its entry with freshly computed prices.
    ///
    /// # Errors
    /// Returns a `Config` error when the tier is already selected.
    pub fn select_tier(&mut self, tier: &PriceTier) -> Result<()> {
        if self.selected_tiers.contains_key(&tier.id) {
            return Err(Error::Config {
                message: format!("Tier '{}' is already selected", tier.name),
            });
        }
        self.selected_tiers.insert(tier.id, tier.clone());
        self.entries
            .insert(tier.id, PriceEntry::new(tier.id, 0.0));
        self.recompute()?;
        self.touch();
        info!("Tier '{}' selected", tier.name);
        Ok(())
    }

    /// Deselects a tier, dropping its price entry and clearing its manual
    /// overrides so a later reselection starts from derived values.
    pub fn deselect_tier(&mut self, tier_id: TierId) {
        if self.selected_tiers.remove(&tier_id).is_some() {
            self.entries.remove(&tier_id);
            self.overrides.clear_tier(tier_id);
            self.touch();
            info!("Tier {tier_id} deselected, overrides cleared");
        }
    }

    /// Marks a per-unit price as manually set and re-derives the tier's
    /// entry so the override is reflected immediately.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAmount`] for a negative or non-finite amount,
    /// or a `Config` error when the tier is not selected.
    pub fn set_manual_price(
        &mut self,
        tier_id: TierId,
        unit_id: UnitId,
        amount: f64,
    ) -> Result<()> {
        if !self.selected_tiers.contains_key(&tier_id) {
            return Err(Error::Config {
                message: format!("Tier {tier_id} is not selected"),
            });
        }
        self.overrides.mark_manual(tier_id, unit_id, amount)?;
        self.recompute()?;
        self.touch();
        debug!("Manual price {amount} set for tier {tier_id}, unit {unit_id}");
        Ok(())
    }

    /// Clears a manual override, letting the next recomputation derive the
    /// price again.
    ///
    /// # Errors
    /// Returns a `Config` error when the tier is not selected.
    pub fn clear_manual_price(&mut self, tier_id: TierId, unit_id: UnitId) -> Result<()> {
        if !self.selected_tiers.contains_key(&tier_id) {
            return Err(Error::Config {
                message: format!("Tier {tier_id} is not selected"),
            });
        }
        self.overrides.clear(tier_id, unit_id);
        self.recompute()?;
        self.touch();
        Ok(())
    }

    /// Records the free-text reason for a tier's price change.
    ///
    /// # Errors
    /// Returns a `Config` error when the tier is not selected.
    pub fn set_change_reason(&mut self, tier_id: TierId, reason: String) -> Result<()> {
        let entry = self.entries.get_mut(&tier_id).ok_or_else(|| Error::Config {
            message: format!("Tier {tier_id} is not selected"),
        })?;
        entry.change_reason = Some(reason);
        self.touch();
        Ok(())
    }

    /// Adds or edits a conversion row and recomputes the selected tiers.
    ///
    /// # Errors
    /// Propagates the table manager's validation errors; the draft is left
    /// unmodified on failure.
    pub fn add_or_update_conversion(
        &mut self,
        draft: &ConversionDraft,
        edit_index: Option<usize>,
    ) -> Result<()> {
        self.conversions.add_or_update(draft, edit_index)?;
        self.recompute()?;
        self.touch();
        Ok(())
    }

    /// Removes a conversion row and recomputes the selected tiers.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] when `index` is out of bounds.
    pub fn remove_conversion(&mut self, index: usize) -> Result<()> {
        self.conversions.remove(index)?;
        self.recompute()?;
        self.touch();
        Ok(())
    }

    /// Re-derives every selected tier's entry from the current cost,
    /// conversion table, and override map.
    fn recompute(&mut self) -> Result<()> {
        for (tier_id, tier) in &self.selected_tiers {
            let prices = pricing::compute_unit_prices(
                self.cost,
                tier,
                self.base_unit_id,
                &self.conversions,
                &self.overrides,
            )?;
            if let Some(entry) = self.entries.get_mut(tier_id) {
                entry.amount = prices
                    .get(&self.base_unit_id)
                    .map_or(0.0, |price| price.amount);
                entry.unit_prices = if self.fractional { prices } else { HashMap::new() };
            }
        }
        Ok(())
    }

    /// Marks the product as fractional (or not) and recomputes so the
    /// per-unit price maps appear or disappear accordingly.
    pub fn set_fractional(&mut self, fractional: bool) -> Result<()> {
        self.fractional = fractional;
        self.recompute()?;
        self.touch();
        Ok(())
    }

    /// Assembles the save payload submitted to the server. The session never
    /// performs the network call itself.
    #[must_use]
    pub fn save_request(&self) -> SaveProductRequest {
        let mut prices: Vec<PriceEntry> = self.entries.values().cloned().collect();
        prices.sort_by_key(|entry| entry.tier_id);

        SaveProductRequest {
            id: self.id,
            name: self.name.clone(),
            barcode: self.barcode.clone(),
            base_unit_id: self.base_unit_id,
            cost: self.cost,
            fractional: self.fractional,
            conversions: self.conversions.entries().to_vec(),
            prices,
            updated_at: self.updated_at,
        }
    }
}
