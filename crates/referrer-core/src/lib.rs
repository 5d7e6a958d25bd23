//! Referrer Core Library
//!
//! This crate classifies HTTP referrer URLs into marketing channels (direct,
//! indirect, search, social, email) and extracts the host parts, the matched
//! label and the search query term.
//!
//! # Architecture
//!
//! A [`Classifier`] owns an immutable [`RuleSet`] and an injected public
//! suffix lookup. Every call is a pure computation over one string: the URL is
//! parsed, its host is split into subdomain/domain/tld, the rule set is probed
//! with progressively coarser match keys and the query term is pulled from the
//! query string or fragment.
//!
//! # Modules
//!
//! - `types`: Result and rule type definitions
//! - `psl`: Public Suffix List lookup seam
//! - `url`: URL parsing and hostname decomposition
//! - `rules`: Rule store keyed by match key
//! - `user_agent`: User-agent fallback table
//! - `matcher`: The classifier

pub mod matcher;
pub mod psl;
pub mod rules;
pub mod types;
pub mod url;
pub mod user_agent;

// Re-export commonly used types
pub use matcher::{Classifier, ClassifierOptions};
pub use psl::{load_list, load_list_file, PslError, SuffixLookup};
pub use rules::RuleSet;
pub use types::{GoogleSearchType, Referrer, ReferrerType, Rule};
pub use url::{decompose_host, HostParts, ParsedUrl, UrlError};
pub use user_agent::{UserAgentRule, UserAgentRules};
