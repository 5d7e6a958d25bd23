//! Referrer Classifier
//!
//! Every referrer goes through here. The classifier is immutable once built
//! and holds no locks, so one instance can be shared by any number of threads.
//!
//! Matching order, first hit wins:
//!
//! 1. `host/path`
//! 2. `domain.tld/path`
//! 3. `host`
//! 4. `domain.tld`
//!
//! Nothing matched means the referrer is Indirect.

use publicsuffix::List;
use serde::{Deserialize, Serialize};

use crate::psl::{parent_domain, SuffixLookup};
use crate::rules::RuleSet;
use crate::types::{GoogleSearchType, Referrer, ReferrerType, Rule};
use crate::url::{decompose_host, join_key, ParsedUrl};
use crate::user_agent::UserAgentRules;

/// Characters stripped from both ends of a raw referrer.
const TRIM_CHARS: &[char] = &[' ', '\t', '\r', '\n'];

// =============================================================================
// Options
// =============================================================================

/// Classifier settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierOptions {
    /// Retry hosts with a two-letter leftmost label (`es.reddit.com`) without
    /// that label, accepting only Social rules from the retry. The retry runs
    /// after the `host` key and before the `domain.tld` key.
    pub locale_subdomains: bool,
}

// =============================================================================
// Classifier
// =============================================================================

/// The referrer classification engine.
pub struct Classifier<L = List> {
    rules: RuleSet,
    suffixes: L,
    user_agents: UserAgentRules,
    options: ClassifierOptions,
}

impl<L: SuffixLookup> Classifier<L> {
    /// Create a classifier over a finished rule set and a suffix lookup.
    pub fn new(rules: RuleSet, suffixes: L) -> Self {
        log::debug!("Classifier ready with {} rules", rules.len());
        Self {
            rules,
            suffixes,
            user_agents: UserAgentRules::new(),
            options: ClassifierOptions::default(),
        }
    }

    pub fn with_user_agents(mut self, user_agents: UserAgentRules) -> Self {
        self.user_agents = user_agents;
        self
    }

    pub fn with_options(mut self, options: ClassifierOptions) -> Self {
        self.options = options;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn options(&self) -> &ClassifierOptions {
        &self.options
    }

    /// Classify a referrer URL.
    pub fn parse(&self, url: &str) -> Referrer {
        self.parse_with::<&str>(url, &[], None)
    }

    /// Classify a referrer URL, treating the given hosts as the site itself.
    ///
    /// A direct domain must equal the referrer's host exactly. Parsed hosts
    /// are lower-case without a trailing dot, so `Example.com` never matches.
    pub fn parse_with_direct<S: AsRef<str>>(&self, url: &str, direct_domains: &[S]) -> Referrer {
        self.parse_with(url, direct_domains, None)
    }

    /// Classify a referrer URL with direct domains and a user agent.
    ///
    /// The user agent only matters when the URL is blank.
    pub fn parse_with<S: AsRef<str>>(
        &self,
        url: &str,
        direct_domains: &[S],
        user_agent: Option<&str>,
    ) -> Referrer {
        let trimmed = url.trim_matches(TRIM_CHARS);
        if trimmed.is_empty() {
            return user_agent
                .and_then(|ua| self.parse_user_agent(ua))
                .unwrap_or_else(Referrer::direct);
        }

        let parsed = match ParsedUrl::parse(trimmed, &self.suffixes) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::trace!("Invalid referrer {trimmed:?}: {e}");
                return Referrer::invalid(url);
            }
        };

        let is_direct = direct_domains
            .iter()
            .any(|domain| domain.as_ref() == parsed.host());
        if is_direct {
            return referrer_from(ReferrerType::Direct, String::new(), trimmed, &parsed);
        }

        self.classify(trimmed, &parsed)
    }

    fn classify(&self, url: &str, parsed: &ParsedUrl) -> Referrer {
        let rule = match self.match_rule(parsed) {
            Some(rule) => rule,
            None => {
                let label = title_case(&parsed.parts().domain);
                return referrer_from(ReferrerType::Indirect, label, url, parsed);
            }
        };

        let mut referrer = referrer_from(rule.kind, rule.label.clone(), url, parsed);
        referrer.query = parsed.search_term(&rule.parameters).unwrap_or_default();
        referrer.google_type = google_search_type(rule, parsed.path());
        referrer
    }

    fn match_rule(&self, parsed: &ParsedUrl) -> Option<&Rule> {
        let host = parsed.host();
        let path = parsed.path();
        let registrable = parsed.registrable_domain();

        self.lookup(&join_key(host, path))
            .or_else(|| self.lookup(&join_key(&registrable, path)))
            .or_else(|| self.lookup(host))
            .or_else(|| self.match_locale_subdomain(parsed))
            .or_else(|| self.lookup(&registrable))
    }

    #[inline]
    fn lookup(&self, key: &str) -> Option<&Rule> {
        let rule = self.rules.get(key)?;
        log::trace!("Matched key {key:?} -> {} ({})", rule.label, rule.kind);
        Some(rule)
    }

    fn match_locale_subdomain(&self, parsed: &ParsedUrl) -> Option<&Rule> {
        if !self.options.locale_subdomains {
            return None;
        }

        let locale = parsed.parts().subdomain.split('.').next()?;
        if locale.len() != 2 || !locale.bytes().all(|b| b.is_ascii_alphabetic()) {
            return None;
        }

        let host = parent_domain(parsed.host())?;
        self.lookup(&join_key(host, parsed.path()))
            .or_else(|| self.lookup(host))
            .filter(|rule| rule.kind == ReferrerType::Social)
    }

    fn parse_user_agent(&self, user_agent: &str) -> Option<Referrer> {
        let rule = self.user_agents.find(user_agent)?;
        let host = rule.domain.to_ascii_lowercase();
        let parts = match decompose_host(&host, &self.suffixes) {
            Some(parts) => parts,
            None => {
                log::warn!("User-agent rule {} has no registrable domain: {:?}", rule.label, rule.domain);
                return None;
            }
        };

        Some(Referrer {
            kind: rule.kind,
            label: rule.label.clone(),
            url: format!("{}://{}", parts.domain, host),
            host,
            subdomain: parts.subdomain,
            domain: parts.domain,
            tld: parts.tld,
            ..Referrer::default()
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn referrer_from(kind: ReferrerType, label: String, url: &str, parsed: &ParsedUrl) -> Referrer {
    let parts = parsed.parts();
    Referrer {
        kind,
        label,
        url: url.to_string(),
        host: parsed.host().to_string(),
        subdomain: parts.subdomain.clone(),
        domain: parts.domain.clone(),
        tld: parts.tld.clone(),
        path: parsed.path().to_string(),
        ..Referrer::default()
    }
}

fn google_search_type(rule: &Rule, path: &str) -> GoogleSearchType {
    if rule.kind != ReferrerType::Search || !rule.label.contains("Google") {
        return GoogleSearchType::NotGoogle;
    }

    if path.starts_with("/aclk") || path.starts_with("/pagead/aclk") {
        GoogleSearchType::Adwords
    } else {
        GoogleSearchType::Organic
    }
}

/// Uppercase the first letter of every word (`walrus` -> `Walrus`,
/// `my-site` -> `My-Site`).
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;
    for c in s.chars() {
        if word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}
