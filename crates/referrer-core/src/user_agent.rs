//! User-agent fallback table
//!
//! In-app browsers often send no referrer at all but announce themselves in
//! the user agent (`... Twitter for iPhone`, `[FB_IAB/FB4A;FBAV/...]`). This
//! table maps such substrings to a channel. It is consulted only when the
//! referrer URL is blank.

use serde::{Deserialize, Serialize};

use crate::types::ReferrerType;

/// One user-agent rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAgentRule {
    pub kind: ReferrerType,
    pub label: String,
    /// Domain the traffic is attributed to, e.g. `twitter.com`
    pub domain: String,
    /// Case-sensitive substrings, any of which selects this rule
    pub patterns: Vec<String>,
}

impl UserAgentRule {
    pub fn matches(&self, user_agent: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| !pattern.is_empty() && user_agent.contains(pattern.as_str()))
    }
}

/// Ordered user-agent rules; the first matching rule wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAgentRules {
    rules: Vec<UserAgentRule>,
}

impl UserAgentRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: UserAgentRule) {
        self.rules.push(rule);
    }

    /// Append `other` after the existing rules.
    pub fn merge(&mut self, other: UserAgentRules) {
        self.rules.extend(other.rules);
    }

    pub fn find(&self, user_agent: &str) -> Option<&UserAgentRule> {
        if user_agent.is_empty() {
            return None;
        }
        self.rules.iter().find(|rule| rule.matches(user_agent))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<UserAgentRule> for UserAgentRules {
    fn from_iter<I: IntoIterator<Item = UserAgentRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
