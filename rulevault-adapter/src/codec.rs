//! Row codec
//!
//! Translates between policy rules (policy-type label plus up to four
//! ordered values) and the fixed-width persisted row representation.

use rulevault_common::error::PolicyError;
use rulevault_common::types::{PolicyRow, VALUE_SLOTS};

/// A rule recovered from a persisted row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRule {
    /// Section key, the first character of the policy-type label
    pub section: String,
    /// Policy-type label
    pub ptype: String,
    /// Ordered positional values, empties compacted away
    pub values: Vec<String>,
}

/// Encode a rule into a row: values are assigned positionally, unused
/// fields stay empty. Rules longer than four values are rejected before
/// any I/O is attempted.
pub fn encode(ptype: &str, values: &[String]) -> Result<PolicyRow, PolicyError> {
    if values.len() > VALUE_SLOTS {
        return Err(PolicyError::TooManyFields(values.len()));
    }

    let mut row = PolicyRow::new(ptype);
    for (slot, value) in values.iter().enumerate() {
        row.set_value(slot, value.clone());
    }
    Ok(row)
}

/// Decode a row back into a rule. Rows with an empty policy-type label are
/// sentinels carrying no rule and decode to `None`.
///
/// Each value field is appended only if non-empty, so trailing unset
/// fields are dropped. This also means a row whose earlier field is empty
/// while a later one is set compacts silently (`v1 = "", v2 = "x"` decodes
/// to `["x"]`); that shape is kept as-is for compatibility with existing
/// stored data.
pub fn decode(row: &PolicyRow) -> Option<DecodedRule> {
    let section = row.ptype.chars().next()?.to_string();

    let values = row
        .values()
        .iter()
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .collect();

    Some(DecodedRule {
        section,
        ptype: row.ptype.clone(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(fields: &[&str]) -> Vec<String> {
        fields.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn encode_assigns_values_positionally() {
        let row = encode("p", &values(&["alice", "data1", "read"])).unwrap();
        assert_eq!(row.ptype, "p");
        assert_eq!(row.values(), ["alice", "data1", "read", ""]);
        assert!(row.id.is_none());
    }

    #[test]
    fn encode_accepts_empty_rule() {
        let row = encode("g", &[]).unwrap();
        assert_eq!(row.values(), ["", "", "", ""]);
    }

    #[test]
    fn encode_rejects_more_than_four_values() {
        let err = encode("p", &values(&["a", "b", "c", "d", "e"])).unwrap_err();
        assert!(matches!(err, PolicyError::TooManyFields(5)));
    }

    #[test]
    fn decode_skips_empty_label_rows() {
        let row = PolicyRow::default();
        assert!(decode(&row).is_none());
    }

    #[test]
    fn decode_derives_section_from_label() {
        let row = encode("g2", &values(&["alice", "admin"])).unwrap();
        let rule = decode(&row).unwrap();
        assert_eq!(rule.section, "g");
        assert_eq!(rule.ptype, "g2");
    }

    #[test]
    fn two_value_rule_round_trips_exactly() {
        let original = values(&["a", "b"]);
        let row = encode("p", &original).unwrap();
        assert_eq!(row.values(), ["a", "b", "", ""]);

        let rule = decode(&row).unwrap();
        assert_eq!(rule.values, original);
    }

    #[test]
    fn full_width_rule_round_trips() {
        let original = values(&["a", "b", "c", "d"]);
        let row = encode("p", &original).unwrap();
        assert_eq!(decode(&row).unwrap().values, original);
    }

    #[test]
    fn embedded_empty_value_compacts() {
        // Known decode gap: an empty field before a set one cannot be
        // represented and collapses to the shorter rule.
        let row = encode("p", &values(&["", "x"])).unwrap();
        let rule = decode(&row).unwrap();
        assert_eq!(rule.values, values(&["x"]));
    }
}
