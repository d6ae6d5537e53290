//! Conversion table manager - Maintains the list of unit conversions for a product.
//!
//! Every mutation validates its input before touching the table, so the
//! invariants hold at all times: units are distinct and present, factors are
//! finite and positive, `(base, destination)` pairs are unique, and at most
//! one conversion is principal. The derived price calculator and the
//! persistence layer can therefore assume well-formed rows.

use crate::{
    errors::{Error, Result},
    models::{ConversionDraft, ConversionUnit},
};

/// The list of [`ConversionUnit`] rows for one product.
///
/// Owned by the editing session; rows have no existence independent of the
/// product being composed and are persisted only when the form is submitted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConversionTable {
    entries: Vec<ConversionUnit>,
}

impl ConversionTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builds a table from rows loaded from the server, re-validating every
    /// invariant.
    ///
    /// Rows that were valid when saved can still conflict after edits made
    /// elsewhere, so loading goes through the same checks as authoring.
    ///
    /// # Errors
    /// Returns the first invariant violation found, leaving no partial table.
    pub fn with_entries(entries: Vec<ConversionUnit>) -> Result<Self> {
        let mut table = Self::new();
        for entry in entries {
            let draft = ConversionDraft {
                base_unit_id: Some(entry.base_unit_id),
                destination_unit_id: Some(entry.destination_unit_id),
                factor: entry.factor,
                active: entry.active,
                is_principal: entry.is_principal,
            };
            table.add_or_update(&draft, None)?;
        }
        Ok(table)
    }

    /// Returns all rows in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[ConversionUnit] {
        &self.entries
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the principal conversion, if one is set.
    #[must_use]
    pub fn principal(&self) -> Option<&ConversionUnit> {
        self.entries.iter().find(|e| e.is_principal)
    }

    /// Iterates over the active rows only; inactive rows produce no derived
    /// price.
    pub fn active_entries(&self) -> impl Iterator<Item = &ConversionUnit> {
        self.entries.iter().filter(|e| e.active)
    }

    /// Validates `draft` and inserts it (when `edit_index` is `None`) or
    /// replaces the row at `edit_index`.
    ///
    /// Validation order follows the authoring form: units present, factor
    /// finite and positive, base distinct from destination, no duplicate
    /// `(base, destination)` pair (ignoring the row being edited), and at
    /// most one principal row. Marking a row principal while a *different*
    /// row already is gets rejected; re-saving the principal row itself is
    /// allowed.
    ///
    /// # Errors
    /// Returns [`Error::MissingUnit`], [`Error::InvalidFactor`],
    /// [`Error::SelfConversion`], [`Error::DuplicateConversion`],
    /// [`Error::DuplicatePrincipal`], or [`Error::IndexOutOfRange`]; the
    /// table is left unmodified on failure.
    pub fn add_or_update(
        &mut self,
        draft: &ConversionDraft,
        edit_index: Option<usize>,
    ) -> Result<()> {
        let (Some(base_unit_id), Some(destination_unit_id)) =
            (draft.base_unit_id, draft.destination_unit_id)
        else {
            return Err(Error::MissingUnit);
        };

        if !(draft.factor.is_finite() && draft.factor > 0.0) {
            return Err(Error::InvalidFactor {
                factor: draft.factor,
            });
        }

        if base_unit_id == destination_unit_id {
            return Err(Error::SelfConversion {
                unit_id: base_unit_id,
            });
        }

        if let Some(index) = edit_index {
            if index >= self.entries.len() {
                return Err(Error::IndexOutOfRange { index });
            }
        }

        let duplicate = self.entries.iter().enumerate().any(|(i, e)| {
            Some(i) != edit_index
                && e.base_unit_id == base_unit_id
                && e.destination_unit_id == destination_unit_id
        });
        if duplicate {
            return Err(Error::DuplicateConversion {
                base_unit_id,
                destination_unit_id,
            });
        }

        if draft.is_principal {
            let other_principal = self
                .entries
                .iter()
                .enumerate()
                .any(|(i, e)| Some(i) != edit_index && e.is_principal);
            if other_principal {
                return Err(Error::DuplicatePrincipal);
            }
        }

        let entry = ConversionUnit {
            base_unit_id,
            destination_unit_id,
            factor: draft.factor,
            active: draft.active,
            is_principal: draft.is_principal,
        };

        match edit_index {
            Some(index) => self.entries[index] = entry,
            None => self.entries.push(entry),
        }
        Ok(())
    }

    /// Removes the row at `index` and returns it.
    ///
    /// No cascading checks are needed: every invariant is per-remaining-row.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] when `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Result<ConversionUnit> {
        if index >= self.entries.len() {
            return Err(Error::IndexOutOfRange { index });
        }
        Ok(self.entries.remove(index))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{conversion_draft, conversion_unit};

    #[test]
    fn test_add_conversion() -> Result<()> {
        let mut table = ConversionTable::new();
        table.add_or_update(&conversion_draft(1, 2, 30.0), None)?;

        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].base_unit_id, 1);
        assert_eq!(table.entries()[0].destination_unit_id, 2);
        assert_eq!(table.entries()[0].factor, 30.0);
        assert!(table.entries()[0].active);
        Ok(())
    }

    #[test]
    fn test_missing_unit_rejected() {
        let mut table = ConversionTable::new();

        let mut draft = conversion_draft(1, 2, 30.0);
        draft.base_unit_id = None;
        let result = table.add_or_update(&draft, None);
        assert!(matches!(result.unwrap_err(), Error::MissingUnit));

        let mut draft = conversion_draft(1, 2, 30.0);
        draft.destination_unit_id = None;
        let result = table.add_or_update(&draft, None);
        assert!(matches!(result.unwrap_err(), Error::MissingUnit));

        assert!(table.is_empty());
    }

    #[test]
    fn test_invalid_factor_rejected() {
        let mut table = ConversionTable::new();

        for factor in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = table.add_or_update(&conversion_draft(1, 2, factor), None);
            assert!(matches!(result.unwrap_err(), Error::InvalidFactor { .. }));
        }
        assert!(table.is_empty());
    }

    #[test]
    fn test_self_conversion_rejected_for_any_factor() {
        let mut table = ConversionTable::new();

        for factor in [1.0, 0.5, 30.0] {
            let result = table.add_or_update(&conversion_draft(7, 7, factor), None);
            assert!(matches!(
                result.unwrap_err(),
                Error::SelfConversion { unit_id: 7 }
            ));
        }
        assert!(table.is_empty());
    }

    #[test]
    fn test_duplicate_pair_rejected() -> Result<()> {
        let mut table = ConversionTable::new();
        table.add_or_update(&conversion_draft(1, 2, 30.0), None)?;

        let result = table.add_or_update(&conversion_draft(1, 2, 12.0), None);
        assert!(matches!(
            result.unwrap_err(),
            Error::DuplicateConversion {
                base_unit_id: 1,
                destination_unit_id: 2,
            }
        ));
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].factor, 30.0);
        Ok(())
    }

    #[test]
    fn test_editing_same_row_is_not_a_duplicate() -> Result<()> {
        let mut table = ConversionTable::new();
        table.add_or_update(&conversion_draft(1, 2, 30.0), None)?;

        // Re-saving the same pair at its own index changes the factor in place
        table.add_or_update(&conversion_draft(1, 2, 24.0), Some(0))?;
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].factor, 24.0);
        Ok(())
    }

    #[test]
    fn test_edit_index_out_of_range() {
        let mut table = ConversionTable::new();
        let result = table.add_or_update(&conversion_draft(1, 2, 30.0), Some(3));
        assert!(matches!(
            result.unwrap_err(),
            Error::IndexOutOfRange { index: 3 }
        ));
    }

    #[test]
    fn test_second_principal_rejected_table_unchanged() -> Result<()> {
        let mut table = ConversionTable::new();

        let mut first = conversion_draft(1, 2, 30.0);
        first.is_principal = true;
        table.add_or_update(&first, None)?;
        let before = table.clone();

        let mut second = conversion_draft(1, 3, 10.0);
        second.is_principal = true;
        let result = table.add_or_update(&second, None);

        assert!(matches!(result.unwrap_err(), Error::DuplicatePrincipal));
        assert_eq!(table, before);
        assert_eq!(table.principal().unwrap().destination_unit_id, 2);
        Ok(())
    }

    #[test]
    fn test_editing_the_principal_row_keeps_its_flag() -> Result<()> {
        let mut table = ConversionTable::new();

        let mut first = conversion_draft(1, 2, 30.0);
        first.is_principal = true;
        table.add_or_update(&first, None)?;

        // Re-saving the principal row itself is not a duplicate principal
        let mut edited = conversion_draft(1, 2, 24.0);
        edited.is_principal = true;
        table.add_or_update(&edited, Some(0))?;

        assert_eq!(table.principal().unwrap().factor, 24.0);
        Ok(())
    }

    #[test]
    fn test_single_principal_after_any_sequence() -> Result<()> {
        let mut table = ConversionTable::new();

        let mut a = conversion_draft(1, 2, 30.0);
        a.is_principal = true;
        table.add_or_update(&a, None)?;
        table.add_or_update(&conversion_draft(1, 3, 10.0), None)?;

        // Demote the principal through an edit, then promote the other row
        table.add_or_update(&conversion_draft(1, 2, 30.0), Some(0))?;
        let mut b = conversion_draft(1, 3, 10.0);
        b.is_principal = true;
        table.add_or_update(&b, Some(1))?;

        let principal_count = table.entries().iter().filter(|e| e.is_principal).count();
        assert_eq!(principal_count, 1);
        assert_eq!(table.principal().unwrap().destination_unit_id, 3);
        Ok(())
    }

    #[test]
    fn test_remove_conversion() -> Result<()> {
        let mut table = ConversionTable::new();
        table.add_or_update(&conversion_draft(1, 2, 30.0), None)?;
        table.add_or_update(&conversion_draft(1, 3, 10.0), None)?;

        let removed = table.remove(0)?;
        assert_eq!(removed.destination_unit_id, 2);
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].destination_unit_id, 3);

        let result = table.remove(5);
        assert!(matches!(
            result.unwrap_err(),
            Error::IndexOutOfRange { index: 5 }
        ));
        Ok(())
    }

    #[test]
    fn test_with_entries_revalidates() {
        // Two loaded principals must be rejected, not silently demoted
        let rows = vec![
            ConversionUnit {
                is_principal: true,
                ..conversion_unit(1, 2, 30.0)
            },
            ConversionUnit {
                is_principal: true,
                ..conversion_unit(1, 3, 10.0)
            },
        ];
        let result = ConversionTable::with_entries(rows);
        assert!(matches!(result.unwrap_err(), Error::DuplicatePrincipal));

        let rows = vec![conversion_unit(1, 2, 30.0), conversion_unit(1, 2, 12.0)];
        let result = ConversionTable::with_entries(rows);
        assert!(matches!(
            result.unwrap_err(),
            Error::DuplicateConversion { .. }
        ));
    }

    #[test]
    fn test_active_entries_filters_inactive() -> Result<()> {
        let mut table = ConversionTable::new();
        table.add_or_update(&conversion_draft(1, 2, 30.0), None)?;

        let mut inactive = conversion_draft(1, 3, 10.0);
        inactive.active = false;
        table.add_or_update(&inactive, None)?;

        let active: Vec<_> = table.active_entries().collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].destination_unit_id, 2);
        Ok(())
    }
}
