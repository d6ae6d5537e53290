//! Shared domain types for the pricing engine.
//!
//! These are the in-memory shapes owned by one open editing session (one
//! operator composing one product). They exist independently of the wire
//! DTOs in [`crate::api::types`]; the session assembles the latter from the
//! former when the form is submitted.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of a measurement unit (box, tablet, blister, ...).
pub type UnitId = i64;

/// Identifier of a price tier ("tipo de precio": retail, wholesale, ...).
pub type TierId = i64;

/// Currency code used when a price entry does not specify one.
pub const DEFAULT_CURRENCY: &str = "BOB";

/// A declared equivalence between a product's storage unit and a sales unit.
///
/// `factor` is the number of destination units contained in one base unit
/// (e.g. base = box, destination = tablet, factor = 30).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversionUnit {
    /// Unit the product's stock is tracked in
    pub base_unit_id: UnitId,
    /// Unit the product may be sold in
    pub destination_unit_id: UnitId,
    /// Destination units per one base unit; always finite and positive
    pub factor: f64,
    /// Inactive conversions are kept in the table but produce no derived price
    pub active: bool,
    /// At most one conversion per product is principal
    pub is_principal: bool,
}

/// The authoring-form shape of a conversion, before validation.
///
/// Unit fields are optional because the operator fills the form field by
/// field; [`crate::core::conversion::ConversionTable::add_or_update`] turns a
/// draft into a [`ConversionUnit`] or rejects it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConversionDraft {
    /// Selected base unit, if any
    pub base_unit_id: Option<UnitId>,
    /// Selected destination unit, if any
    pub destination_unit_id: Option<UnitId>,
    /// Factor as typed by the operator
    pub factor: f64,
    /// Whether the conversion should produce a derived price
    pub active: bool,
    /// Whether this conversion should become the principal one
    pub is_principal: bool,
}

/// A named pricing category with its profit percentage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceTier {
    /// Unique identifier of the tier
    pub id: TierId,
    /// Display name (e.g. "retail", "wholesale")
    pub name: String,
    /// Profit margin applied on top of the cost, in percent
    pub profit_percent: f64,
}

/// A derived (or manually set) price for one unit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitPrice {
    /// Sale price for the unit, rounded to 2 decimal places
    pub amount: f64,
    /// True when the operator edited the value; survives recomputation
    pub manual: bool,
}

/// A sale price for a product under one price tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    /// Tier this price belongs to
    pub tier_id: TierId,
    /// Price for the product's base unit; never negative
    pub amount: f64,
    /// ISO currency code; [`DEFAULT_CURRENCY`] when the operator left it unset
    pub currency: String,
    /// Free-text reason recorded when a price is changed
    pub change_reason: Option<String>,
    /// Per-unit price map, populated when the product is fractional
    pub unit_prices: HashMap<UnitId, UnitPrice>,
}

impl PriceEntry {
    /// Creates an entry for `tier_id` with the default currency and no
    /// per-unit prices yet.
    #[must_use]
    pub fn new(tier_id: TierId, amount: f64) -> Self {
        Self {
            tier_id,
            amount,
            currency: DEFAULT_CURRENCY.to_string(),
            change_reason: None,
            unit_prices: HashMap::new(),
        }
    }
}
