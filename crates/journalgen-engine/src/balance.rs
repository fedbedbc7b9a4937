//! Balance validation.

use rust_decimal::Decimal;

use crate::assemble::AssembledEntry;
use crate::error::UnbalancedEntryError;

/// Check that debits equal credits within `tolerance`.
///
/// # Errors
///
/// Returns [`UnbalancedEntryError`] when `|total_debit - total_credit|`
/// exceeds `tolerance`. The difference keeps its sign: positive when debits
/// are larger.
pub fn validate_balance(
    entry: &AssembledEntry,
    tolerance: Decimal,
) -> Result<(), UnbalancedEntryError> {
    let difference = entry.residual();
    if difference.abs() > tolerance {
        return Err(UnbalancedEntryError {
            total_debit: entry.total_debit,
            total_credit: entry.total_credit,
            difference,
        });
    }
    Ok(())
}
