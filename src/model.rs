//! In-memory policy model seam.
//!
//! The enforcement engine owns its model; the adapter only needs to add
//! rules to it when loading and to read rules from it when saving. [`Model`]
//! is that surface. [`PolicyModel`] is a plain implementation used by the
//! `casbin-rules` binary and by tests.

use std::collections::BTreeMap;

/// Sections persisted by the adapter, in save order.
pub const SECTIONS: [&str; 2] = ["p", "g"];

/// The part of an engine's policy model the adapter works with.
pub trait Model {
    /// Add a rule under `sec`/`ptype`.
    ///
    /// Returns `false` if the rule was not added (e.g. already present).
    fn add_policy(&mut self, sec: &str, ptype: &str, rule: Vec<String>) -> bool;

    /// Policy types present in a section.
    fn ptypes(&self, sec: &str) -> Vec<String>;

    /// Rules stored under `sec`/`ptype`.
    fn get_policy(&self, sec: &str, ptype: &str) -> Vec<Vec<String>>;

    /// Remove every rule, keeping sections and policy types.
    fn clear_policy(&mut self);
}

/// Parse one policy line and add it to the model.
///
/// The line is split on `,` and each token trimmed. The first token is the
/// `ptype`; its first character names the section. Empty lines and lines
/// starting with `#` are ignored. Returns whether a rule was added.
pub fn load_policy_line(line: &str, model: &mut dyn Model) -> bool {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return false;
    }

    let mut tokens = line.split(',').map(str::trim);
    let Some(ptype) = tokens.next() else {
        return false;
    };
    let Some(sec) = section_of(ptype) else {
        return false;
    };

    let rule = tokens.map(str::to_string).collect();
    model.add_policy(sec, ptype, rule)
}

/// Section a `ptype` belongs to: its first character.
///
/// Returns `None` only for an empty `ptype`.
pub fn section_of(ptype: &str) -> Option<&str> {
    let first = ptype.chars().next()?;
    Some(&ptype[..first.len_utf8()])
}

/// Section → ptype → rules, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyModel {
    sections: BTreeMap<String, BTreeMap<String, Vec<Vec<String>>>>,
}

impl PolicyModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from policy text, one policy line per line.
    pub fn from_text(text: &str) -> Self {
        let mut model = Self::new();
        for line in text.lines() {
            load_policy_line(line, &mut model);
        }
        model
    }

    /// Total number of rules across all sections.
    pub fn len(&self) -> usize {
        self.sections
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Whether the model holds no rules.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `sec`/`ptype` holds `rule`.
    pub fn has_policy(&self, sec: &str, ptype: &str, rule: &[String]) -> bool {
        self.sections
            .get(sec)
            .and_then(|ptypes| ptypes.get(ptype))
            .is_some_and(|rules| rules.iter().any(|r| r == rule))
    }
}

impl Model for PolicyModel {
    fn add_policy(&mut self, sec: &str, ptype: &str, rule: Vec<String>) -> bool {
        let rules = self
            .sections
            .entry(sec.to_string())
            .or_default()
            .entry(ptype.to_string())
            .or_default();

        if rules.contains(&rule) {
            return false;
        }
        rules.push(rule);
        true
    }

    fn ptypes(&self, sec: &str) -> Vec<String> {
        self.sections
            .get(sec)
            .map(|ptypes| ptypes.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn get_policy(&self, sec: &str, ptype: &str) -> Vec<Vec<String>> {
        self.sections
            .get(sec)
            .and_then(|ptypes| ptypes.get(ptype))
            .cloned()
            .unwrap_or_default()
    }

    fn clear_policy(&mut self) {
        for ptypes in self.sections.values_mut() {
            for rules in ptypes.values_mut() {
                rules.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_load_policy_line() {
        let mut model = PolicyModel::new();
        assert!(load_policy_line("p, alice, data1, read", &mut model));
        assert!(load_policy_line("g2,alice,admin", &mut model));

        assert_eq!(model.get_policy("p", "p"), vec![rule(&["alice", "data1", "read"])]);
        assert_eq!(model.get_policy("g", "g2"), vec![rule(&["alice", "admin"])]);
    }

    #[test]
    fn test_load_policy_line_skips_comments_and_blanks() {
        let mut model = PolicyModel::new();
        assert!(!load_policy_line("", &mut model));
        assert!(!load_policy_line("   ", &mut model));
        assert!(!load_policy_line("# p, alice, data1, read", &mut model));
        assert!(model.is_empty());
    }

    #[test]
    fn test_load_policy_line_ptype_only() {
        let mut model = PolicyModel::new();
        assert!(load_policy_line("p", &mut model));
        assert_eq!(model.get_policy("p", "p"), vec![Vec::<String>::new()]);
    }

    #[test]
    fn test_section_of() {
        assert_eq!(section_of("p"), Some("p"));
        assert_eq!(section_of("g2"), Some("g"));
        assert_eq!(section_of("ép"), Some("é"));
        assert_eq!(section_of(""), None);
    }

    #[test]
    fn test_load_policy_line_multibyte_ptype() {
        let mut model = PolicyModel::new();
        assert!(load_policy_line("ép, alice, data1", &mut model));
        assert_eq!(model.get_policy("é", "ép"), vec![rule(&["alice", "data1"])]);
    }

    #[test]
    fn test_load_policy_line_keeps_empty_fields() {
        let mut model = PolicyModel::new();
        load_policy_line("p, alice, , read", &mut model);
        assert_eq!(model.get_policy("p", "p"), vec![rule(&["alice", "", "read"])]);
    }

    #[test]
    fn test_add_policy_rejects_duplicates() {
        let mut model = PolicyModel::new();
        assert!(model.add_policy("p", "p", rule(&["alice", "data1", "read"])));
        assert!(!model.add_policy("p", "p", rule(&["alice", "data1", "read"])));
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_from_text_and_clear() {
        let mut model = PolicyModel::from_text(
            "p, alice, data1, read\n\
             p, bob, data2, write\n\
             \n\
             g, alice, data2_admin\n",
        );
        assert_eq!(model.len(), 3);
        assert_eq!(model.ptypes("p"), vec!["p".to_string()]);
        assert!(model.has_policy("g", "g", &rule(&["alice", "data2_admin"])));

        model.clear_policy();
        assert!(model.is_empty());
        assert_eq!(model.ptypes("g"), vec!["g".to_string()]);
    }
}
