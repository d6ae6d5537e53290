/// Barcode resolution chain - ordered, capability-probed decode strategies
pub mod barcode;

/// Conversion table manager - per-product unit conversions with invariants
pub mod conversion;

/// Derived price calculator - per-unit sale prices with manual overrides
pub mod pricing;

/// Wizard session - the draft product being composed by one operator
pub mod session;
