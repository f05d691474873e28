//! Filter builder
//!
//! Builds partial-match selectors for filtered deletion: a contiguous run
//! of positional constraints starting at a field offset, with the
//! policy-type label always matched exactly.

use rulevault_common::error::PolicyError;
use rulevault_common::types::{PolicyFilter, PolicyRow, VALUE_SLOTS};

/// Build a selector constraining slots `field_index ..
/// field_index + values.len()` to `values`, in order. Slots outside the
/// range stay unconstrained. The range must fit the four value slots.
pub fn for_fields(
    ptype: &str,
    field_index: usize,
    values: &[String],
) -> Result<PolicyFilter, PolicyError> {
    if field_index + values.len() > VALUE_SLOTS {
        return Err(PolicyError::FilterOutOfRange {
            offset: field_index,
            len: values.len(),
        });
    }

    let mut filter = PolicyFilter::new(ptype);
    for slot in 0..VALUE_SLOTS {
        if field_index <= slot && slot < field_index + values.len() {
            filter.slots[slot] = Some(values[slot - field_index].clone());
        }
    }
    Ok(filter)
}

/// Build a selector matching `row` on all five fields, empty value fields
/// included. Used for exact-match removal.
pub fn exact_match(row: &PolicyRow) -> PolicyFilter {
    PolicyFilter {
        ptype: row.ptype.clone(),
        slots: row.values().map(|v| Some(v.to_string())),
    }
}
