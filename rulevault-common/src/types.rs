//! Common type definitions for RuleVault

use serde::{Deserialize, Serialize};

/// Number of positional value slots in a persisted policy row
pub const VALUE_SLOTS: usize = 4;

// ============================================================================
// Row Types
// ============================================================================

/// One persisted policy rule: a policy-type label plus four positional
/// value fields. Absent values are empty strings, never null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRow {
    /// Identifier assigned by the store, omitted on insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Policy-type label
    pub ptype: String,
    #[serde(default)]
    pub v1: String,
    #[serde(default)]
    pub v2: String,
    #[serde(default)]
    pub v3: String,
    #[serde(default)]
    pub v4: String,
}

impl PolicyRow {
    pub fn new(ptype: impl Into<String>) -> Self {
        Self {
            ptype: ptype.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The four positional value fields in order
    pub fn values(&self) -> [&str; VALUE_SLOTS] {
        [&self.v1, &self.v2, &self.v3, &self.v4]
    }

    /// Set the value field at `slot` (0-based). Slots past the last
    /// field are ignored.
    pub fn set_value(&mut self, slot: usize, value: impl Into<String>) {
        match slot {
            0 => self.v1 = value.into(),
            1 => self.v2 = value.into(),
            2 => self.v3 = value.into(),
            3 => self.v4 = value.into(),
            _ => {}
        }
    }
}

// ============================================================================
// Filter Types
// ============================================================================

/// Partial-match selector over the row schema. The policy-type label is
/// always matched exactly; each value slot is either constrained to an
/// exact string (empty included) or left unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyFilter {
    /// Exact-match policy-type label
    pub ptype: String,
    /// Per-slot constraints; `None` matches any value
    pub slots: [Option<String>; VALUE_SLOTS],
}

impl PolicyFilter {
    pub fn new(ptype: impl Into<String>) -> Self {
        Self {
            ptype: ptype.into(),
            ..Self::default()
        }
    }

    /// Whether `row` satisfies every constraint in this filter
    pub fn matches(&self, row: &PolicyRow) -> bool {
        if row.ptype != self.ptype {
            return false;
        }
        self.slots
            .iter()
            .zip(row.values())
            .all(|(want, have)| want.as_deref().map_or(true, |w| w == have))
    }
}
