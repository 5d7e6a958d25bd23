//! Core type definitions for the referrer classifier
//!
//! These types are shared by the rule store, the classifier and the rule
//! loaders.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Referrer Types
// =============================================================================

/// Channel a referrer was classified into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferrerType {
    /// Malformed URL, empty host or a host without a registrable domain
    #[default]
    Invalid,
    /// Well-formed but unrecognized external referrer
    Indirect,
    /// Blank referrer, or one of the site's own domains
    Direct,
    /// Webmail provider
    Email,
    /// Search engine
    Search,
    /// Social network
    Social,
}

impl ReferrerType {
    /// Lowercase name, as used in rule documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Indirect => "indirect",
            Self::Direct => "direct",
            Self::Email => "email",
            Self::Search => "search",
            Self::Social => "social",
        }
    }
}

impl fmt::Display for ReferrerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Google Search Types
// =============================================================================

/// Google traffic split, only set on Google search referrers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoogleSearchType {
    #[default]
    NotGoogle,
    Organic,
    Adwords,
}

// =============================================================================
// Rule
// =============================================================================

/// A single classification rule.
///
/// Many rules may share a label (regional variants of one engine) but each one
/// lives under its own match key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub kind: ReferrerType,
    pub label: String,
    /// `host/path`, `domain.tld/path`, `host` or `domain.tld`
    pub key: String,
    /// Query parameter names holding the search term, in priority order
    #[serde(default)]
    pub parameters: Vec<String>,
}

impl Rule {
    pub fn new(kind: ReferrerType, label: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            key: key.into(),
            parameters: Vec::new(),
        }
    }

    /// Set the query parameter names, keeping their order.
    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }
}

// =============================================================================
// Referrer
// =============================================================================

/// Result of classifying a referrer.
///
/// The shape is the same for every outcome; fields that do not apply are left
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referrer {
    pub kind: ReferrerType,
    pub label: String,
    pub url: String,
    pub host: String,
    pub subdomain: String,
    pub domain: String,
    pub tld: String,
    pub path: String,
    /// Decoded search term
    pub query: String,
    pub google_type: GoogleSearchType,
}

impl Referrer {
    /// Blank referrer.
    pub fn direct() -> Self {
        Self {
            kind: ReferrerType::Direct,
            ..Self::default()
        }
    }

    /// Unparsable referrer, carrying the input as given.
    pub fn invalid(url: impl Into<String>) -> Self {
        Self {
            kind: ReferrerType::Invalid,
            url: url.into(),
            ..Self::default()
        }
    }

    /// `domain.tld`, or `None` when the host was never decomposed.
    pub fn registrable_domain(&self) -> Option<String> {
        if self.domain.is_empty() || self.tld.is_empty() {
            return None;
        }
        Some(format!("{}.{}", self.domain, self.tld))
    }

    pub fn is_invalid(&self) -> bool {
        self.kind == ReferrerType::Invalid
    }
}
