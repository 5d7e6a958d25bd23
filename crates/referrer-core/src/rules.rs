//! Rule store
//!
//! Maps a match key (`host/path`, `domain.tld/path`, `host` or `domain.tld`)
//! to the [`Rule`] that classifies it. A `RuleSet` is assembled once from one
//! or more rule sources and is only read afterwards.

use std::collections::hash_map::{self, HashMap};

use crate::types::Rule;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: HashMap<String, Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rule under its own key, replacing any previous rule there.
    pub fn insert(&mut self, rule: Rule) -> Option<Rule> {
        self.rules.insert(rule.key.clone(), rule)
    }

    /// Look up a match key.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.rules.contains_key(key)
    }

    /// Copy every rule of `other` into this set.
    ///
    /// Rules from `other` replace existing rules with the same key, which is
    /// how custom rules override the stock ones.
    pub fn merge(&mut self, other: RuleSet) {
        let replaced = other
            .rules
            .into_iter()
            .filter_map(|(key, rule)| self.rules.insert(key, rule))
            .count();
        if replaced > 0 {
            log::debug!("Rule merge replaced {replaced} existing keys");
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> hash_map::Values<'_, String, Rule> {
        self.rules.values()
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<Rule> for RuleSet {
    fn extend<I: IntoIterator<Item = Rule>>(&mut self, iter: I) {
        for rule in iter {
            self.insert(rule);
        }
    }
}
