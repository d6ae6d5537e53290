//! Wire DTOs exchanged with the back-office server.
//!
//! The server owns persistence; these shapes mirror its REST contract. The
//! editing session assembles a [`SaveProductRequest`] from its in-memory
//! state when the form is submitted, and the client deserializes the
//! server's responses back into these types.

use crate::models::{ConversionUnit, PriceEntry, UnitId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Payload for creating or updating a product.
///
/// When `id` is set the client issues an update, otherwise a create. The
/// conversion and price graphs are submitted as part of this one request;
/// they have no server-side existence of their own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveProductRequest {
    /// Server-assigned identifier; `None` for a new product
    pub id: Option<i64>,
    /// Product display name
    pub name: String,
    /// Decoded barcode payload, when one was captured
    pub barcode: Option<String>,
    /// Unit the product's stock is tracked in
    pub base_unit_id: UnitId,
    /// Cost basis the derived prices were computed from
    pub cost: f64,
    /// Whether the product can be sold in destination units
    pub fractional: bool,
    /// Conversion rows as composed in the wizard
    pub conversions: Vec<ConversionUnit>,
    /// One price entry per selected tier
    pub prices: Vec<PriceEntry>,
    /// Last local modification time (naive UTC)
    pub updated_at: NaiveDateTime,
}

/// Server acknowledgement of a saved product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedProduct {
    /// Server-assigned identifier
    pub id: i64,
    /// Name as persisted
    pub name: String,
}

/// A quantity-based price-range row owned by the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Server-assigned identifier; `None` when creating
    pub id: Option<i64>,
    /// Product the range belongs to
    pub product_id: i64,
    /// Minimum quantity for the range to apply
    pub min_quantity: f64,
    /// Sale price within the range
    pub price: f64,
}

/// One hit of a free-text product search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductHit {
    /// Server-assigned identifier
    pub id: i64,
    /// Product display name
    pub name: String,
    /// Barcode, when the product has one
    pub barcode: Option<String>,
}

/// One hit of a free-text provider search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProviderHit {
    /// Server-assigned identifier
    pub id: i64,
    /// Provider display name
    pub name: String,
}

/// Error body the server returns on a rejected request. Only the message is
/// surfaced to the operator; the payload is otherwise opaque to this crate.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable message from the server
    pub message: Option<String>,
}
