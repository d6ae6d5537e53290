//! Shared test utilities for `Tarifador`.
//!
//! This module provides common helper functions for building conversion
//! tables, tiers, and save payloads with sensible defaults.

use crate::{
    api::types::SaveProductRequest,
    core::conversion::ConversionTable,
    models::{ConversionDraft, ConversionUnit, PriceEntry, PriceTier, UnitId},
};
use tracing_subscriber::EnvFilter;

/// Initializes test tracing once; later calls are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Builds an active, non-principal conversion draft.
pub fn conversion_draft(base: UnitId, destination: UnitId, factor: f64) -> ConversionDraft {
    ConversionDraft {
        base_unit_id: Some(base),
        destination_unit_id: Some(destination),
        factor,
        active: true,
        is_principal: false,
    }
}

/// Builds an active, non-principal conversion row.
pub fn conversion_unit(base: UnitId, destination: UnitId, factor: f64) -> ConversionUnit {
    ConversionUnit {
        base_unit_id: base,
        destination_unit_id: destination,
        factor,
        active: true,
        is_principal: false,
    }
}

/// Builds a table from `(base, destination, factor)` triples.
///
/// # Panics
/// Panics when a triple violates a table invariant; test fixtures are
/// expected to be valid.
#[allow(clippy::unwrap_used)]
pub fn table_with(rows: &[(UnitId, UnitId, f64)]) -> ConversionTable {
    let mut table = ConversionTable::new();
    for &(base, destination, factor) in rows {
        table
            .add_or_update(&conversion_draft(base, destination, factor), None)
            .unwrap();
    }
    table
}

/// Builds a price tier named after its id.
pub fn tier(id: i64, profit_percent: f64) -> PriceTier {
    PriceTier {
        id,
        name: format!("tier-{id}"),
        profit_percent,
    }
}

/// Builds a small but complete save payload for client tests.
pub fn sample_save_request(id: Option<i64>) -> SaveProductRequest {
    let mut entry = PriceEntry::new(1, 12.00);
    entry.unit_prices.insert(
        2,
        crate::models::UnitPrice {
            amount: 0.40,
            manual: false,
        },
    );

    SaveProductRequest {
        id,
        name: "Paracetamol 500mg".to_string(),
        barcode: Some("7750001234567".to_string()),
        base_unit_id: 1,
        cost: 10.0,
        fractional: true,
        conversions: vec![conversion_unit(1, 2, 30.0)],
        prices: vec![entry],
        updated_at: chrono::NaiveDateTime::default(),
    }
}
