//! RuleVault Model - In-memory authorization policy model
//!
//! Holds policy rules grouped by section and policy-type label. Each rule
//! is an ordered sequence of positional string values. The persistence
//! adapter appends rules on load and iterates them on save; evaluation of
//! the rules is out of scope for this crate.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

/// One policy rule: ordered positional values (subject, object, action, ...)
pub type PolicyRule = Vec<String>;

/// Policy rules grouped by section key and policy-type label.
///
/// Sections are single-character keys derived from the first character of
/// the policy-type label (`p` for permission rules, `g` for role
/// inheritance). Rule order within a policy type is preserved as appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyModel {
    sections: HashMap<String, HashMap<String, Vec<PolicyRule>>>,
}

impl PolicyModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule under `sec`/`ptype`, creating the grouping on demand
    pub fn add_rule(&mut self, sec: &str, ptype: &str, rule: PolicyRule) {
        self.sections
            .entry(sec.to_string())
            .or_default()
            .entry(ptype.to_string())
            .or_default()
            .push(rule);
    }

    /// Rules stored under `sec`/`ptype`, in append order
    pub fn rules(&self, sec: &str, ptype: &str) -> &[PolicyRule] {
        self.sections
            .get(sec)
            .and_then(|ptypes| ptypes.get(ptype))
            .map_or(&[], Vec::as_slice)
    }

    /// Iterate every policy type and its rules within a section
    pub fn ptypes(&self, sec: &str) -> impl Iterator<Item = (&str, &[PolicyRule])> {
        self.sections
            .get(sec)
            .into_iter()
            .flat_map(|ptypes| ptypes.iter())
            .map(|(ptype, rules)| (ptype.as_str(), rules.as_slice()))
    }

    /// Whether the exact rule exists under `sec`/`ptype`
    pub fn has_rule(&self, sec: &str, ptype: &str, rule: &[String]) -> bool {
        self.rules(sec, ptype).iter().any(|r| r == rule)
    }

    /// Total number of rules across all sections
    pub fn len(&self) -> usize {
        self.sections
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every rule, keeping nothing
    pub fn clear(&mut self) {
        self.sections.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(values: &[&str]) -> PolicyRule {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn add_rule_creates_groupings_on_demand() {
        let mut model = PolicyModel::new();
        assert!(model.is_empty());

        model.add_rule("p", "p", rule(&["alice", "data1", "read"]));
        assert_eq!(model.len(), 1);
        assert!(model.has_rule("p", "p", &rule(&["alice", "data1", "read"])));
    }

    #[test]
    fn rules_preserve_append_order() {
        let mut model = PolicyModel::new();
        model.add_rule("p", "p", rule(&["alice", "data1", "read"]));
        model.add_rule("p", "p", rule(&["bob", "data2", "write"]));

        let rules = model.rules("p", "p");
        assert_eq!(rules[0], rule(&["alice", "data1", "read"]));
        assert_eq!(rules[1], rule(&["bob", "data2", "write"]));
    }

    #[test]
    fn ptypes_are_grouped_within_a_section() {
        let mut model = PolicyModel::new();
        model.add_rule("p", "p", rule(&["alice", "data1", "read"]));
        model.add_rule("p", "p2", rule(&["bob", "data2", "write"]));
        model.add_rule("g", "g", rule(&["alice", "data2_admin"]));

        let mut ptypes: Vec<&str> = model.ptypes("p").map(|(ptype, _)| ptype).collect();
        ptypes.sort_unstable();
        assert_eq!(ptypes, ["p", "p2"]);

        assert_eq!(model.ptypes("g").count(), 1);
        assert_eq!(model.ptypes("missing").count(), 0);
    }

    #[test]
    fn missing_groupings_yield_empty_slices() {
        let model = PolicyModel::new();
        assert!(model.rules("p", "p").is_empty());
        assert!(!model.has_rule("p", "p", &rule(&["alice"])));
    }

    #[test]
    fn clear_drops_everything() {
        let mut model = PolicyModel::new();
        model.add_rule("p", "p", rule(&["alice", "data1", "read"]));
        model.clear();
        assert!(model.is_empty());
    }
}
