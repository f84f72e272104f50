//! Quantity resolution for order lines at confirmation time.
//!
//! Lines carry raw counts exactly as entered at the desk. The number that
//! lands on a confirmed record is derived here, never stored on the line.
//! Resolution is total: absent counts are read as zero and arithmetic
//! saturates, so every line resolves to *some* quantity.

use shared::models::is_live_presentation;
use shared::order::OrderLine;

/// Result of resolving a line's raw counts into a final quantity.
///
/// `crate_count` and `units_per_crate` are populated only when crate
/// arithmetic produced the total, so downstream records can show the
/// breakdown (e.g. "5 x 8") without re-deriving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedQuantity {
    pub final_quantity: u32,
    pub crate_count: Option<u32>,
    pub units_per_crate: Option<u32>,
}

/// Resolve an order line into the quantity recorded at confirmation.
///
/// Precedence, fixed:
/// 1. Sex counts, when the line carries either one: male + female,
///    with the absent side read as zero. Crate fields are ignored.
/// 2. Crate arithmetic, when the presentation is live and a positive
///    units-per-crate is present: count * units_per_crate.
/// 3. Direct total: `total_or_crate_count` taken as a plain unit count.
pub fn resolve(line: &OrderLine) -> ResolvedQuantity {
    if line.has_sex_counts() {
        let male = line.male_count.unwrap_or(0);
        let female = line.female_count.unwrap_or(0);
        return ResolvedQuantity {
            final_quantity: male.saturating_add(female),
            crate_count: None,
            units_per_crate: None,
        };
    }

    let count = line.total_or_crate_count.unwrap_or(0);

    if let Some(units) = line.units_per_crate
        && units > 0
        && is_live_presentation(&line.presentation)
    {
        return ResolvedQuantity {
            final_quantity: count.saturating_mul(units),
            crate_count: Some(count),
            units_per_crate: Some(units),
        };
    }

    ResolvedQuantity {
        final_quantity: count,
        crate_count: None,
        units_per_crate: None,
    }
}
