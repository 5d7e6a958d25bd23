//! Rule definition parsers
//!
//! Turns rule documents into the core's [`RuleSet`] and [`UserAgentRules`].
//! Two formats are understood:
//!
//! - a JSON document grouping labels by channel:
//!   `{"search": {"Bing": {"domains": ["bing.com"], "parameters": ["q"]}}}`
//! - the older line-oriented lists, `Label:domain:param1,param2` for search
//!   engines and `Label:domain1,domain2` for social sites.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use referrer_core::types::{ReferrerType, Rule};
use referrer_core::url::join_key;
use referrer_core::{RuleSet, UserAgentRule, UserAgentRules};

/// Error type for rule loading.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("Failed to read rules: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid rule document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed line {line}: {reason}")]
    MalformedLine { line: usize, reason: &'static str },
    #[error("Rule {label:?} has an empty domain")]
    EmptyDomain { label: String },
}

// =============================================================================
// JSON Rules
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct JsonRule {
    #[serde(default)]
    domains: Vec<String>,
    #[serde(default)]
    parameters: Vec<String>,
}

/// Sections keep labels sorted so that two labels claiming one domain resolve
/// the same way on every load.
#[derive(Debug, Default, Deserialize)]
struct JsonRules {
    #[serde(default, alias = "Email")]
    email: BTreeMap<String, JsonRule>,
    #[serde(default, alias = "Search")]
    search: BTreeMap<String, JsonRule>,
    #[serde(default, alias = "Social")]
    social: BTreeMap<String, JsonRule>,
}

/// Load a JSON rule document.
///
/// Sections are merged email, then search, then social; a later section wins
/// when two of them claim the same key.
pub fn load_json_rules<R: Read>(reader: R) -> Result<RuleSet, RulesError> {
    let decoded: JsonRules = serde_json::from_reader(reader)?;
    build_rule_set(decoded)
}

/// Parse a JSON rule document held in memory.
pub fn parse_json_rules(text: &str) -> Result<RuleSet, RulesError> {
    let decoded: JsonRules = serde_json::from_str(text)?;
    build_rule_set(decoded)
}

/// Read a JSON rule document from disk.
pub fn load_json_rules_file<P: AsRef<Path>>(path: P) -> Result<RuleSet, RulesError> {
    let file = File::open(path.as_ref())?;
    load_json_rules(BufReader::new(file))
}

fn build_rule_set(decoded: JsonRules) -> Result<RuleSet, RulesError> {
    let mut rules = RuleSet::new();
    rules.merge(extract_rules(decoded.email, ReferrerType::Email)?);
    rules.merge(extract_rules(decoded.search, ReferrerType::Search)?);
    rules.merge(extract_rules(decoded.social, ReferrerType::Social)?);
    log::debug!("Loaded {} referrer rules", rules.len());
    Ok(rules)
}

fn extract_rules(section: BTreeMap<String, JsonRule>, kind: ReferrerType) -> Result<RuleSet, RulesError> {
    let mut rules = RuleSet::new();
    for (label, json_rule) in section {
        for domain in &json_rule.domains {
            let key = match_key(domain).ok_or_else(|| RulesError::EmptyDomain { label: label.clone() })?;
            rules.insert(Rule::new(kind, label.as_str(), key).with_parameters(json_rule.parameters.iter().cloned()));
        }
    }
    Ok(rules)
}

/// Normalize a rule domain into the key form the classifier probes:
/// lowercase host, path joined with duplicate and trailing slashes removed.
pub fn match_key(domain: &str) -> Option<String> {
    let domain = domain.trim();
    let (host, path) = match domain.find('/') {
        Some(pos) => domain.split_at(pos),
        None => (domain, ""),
    };
    if host.is_empty() {
        return None;
    }
    Some(join_key(&host.to_ascii_lowercase(), path))
}

// =============================================================================
// Line-Oriented Lists
// =============================================================================

/// Iterate over meaningful lines with their 1-based line numbers.
fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a search engine list: `Label:domain:param1,param2` per line.
pub fn parse_engines_csv(text: &str) -> Result<RuleSet, RulesError> {
    let mut rules = RuleSet::new();
    for (line_no, line) in content_lines(text) {
        let mut tokens = line.splitn(3, ':');
        let (label, domain, params) = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(label), Some(domain), Some(params)) => (label.trim(), domain, params),
            _ => {
                return Err(RulesError::MalformedLine {
                    line: line_no,
                    reason: "expected Label:domain:parameters",
                })
            }
        };
        if label.is_empty() {
            return Err(RulesError::MalformedLine { line: line_no, reason: "empty label" });
        }
        let key = match_key(domain).ok_or(RulesError::MalformedLine { line: line_no, reason: "empty domain" })?;
        rules.insert(Rule::new(ReferrerType::Search, label, key).with_parameters(split_list(params)));
    }
    log::debug!("Parsed {} search engine rules", rules.len());
    Ok(rules)
}

/// Parse a social site list: `Label:domain1,domain2` per line.
pub fn parse_socials_csv(text: &str) -> Result<RuleSet, RulesError> {
    let mut rules = RuleSet::new();
    for (line_no, line) in content_lines(text) {
        let (label, domains) = match line.split_once(':') {
            Some((label, domains)) => (label.trim(), split_list(domains)),
            None => {
                return Err(RulesError::MalformedLine {
                    line: line_no,
                    reason: "expected Label:domains",
                })
            }
        };
        if label.is_empty() || domains.is_empty() {
            return Err(RulesError::MalformedLine {
                line: line_no,
                reason: "empty label or domain list",
            });
        }
        for domain in &domains {
            let key = match_key(domain).ok_or(RulesError::MalformedLine { line: line_no, reason: "empty domain" })?;
            rules.insert(Rule::new(ReferrerType::Social, label, key));
        }
    }
    log::debug!("Parsed {} social rules", rules.len());
    Ok(rules)
}

// =============================================================================
// User Agents
// =============================================================================

#[derive(Debug, Deserialize)]
struct JsonUserAgent {
    domain: String,
    #[serde(default)]
    patterns: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct JsonUserAgents {
    #[serde(default, alias = "Email")]
    email: BTreeMap<String, JsonUserAgent>,
    #[serde(default, alias = "Search")]
    search: BTreeMap<String, JsonUserAgent>,
    #[serde(default, alias = "Social")]
    social: BTreeMap<String, JsonUserAgent>,
}

/// Load a JSON user-agent document:
/// `{"social": {"Twitter": {"domain": "twitter.com", "patterns": ["Twitter for iPhone"]}}}`.
///
/// Rules are kept in section order (email, search, social), labels sorted
/// within a section.
pub fn load_json_user_agents<R: Read>(reader: R) -> Result<UserAgentRules, RulesError> {
    let decoded: JsonUserAgents = serde_json::from_reader(reader)?;
    build_user_agents(decoded)
}

/// Parse a JSON user-agent document held in memory.
pub fn parse_json_user_agents(text: &str) -> Result<UserAgentRules, RulesError> {
    let decoded: JsonUserAgents = serde_json::from_str(text)?;
    build_user_agents(decoded)
}

fn build_user_agents(decoded: JsonUserAgents) -> Result<UserAgentRules, RulesError> {
    let sections = [
        (ReferrerType::Email, decoded.email),
        (ReferrerType::Search, decoded.search),
        (ReferrerType::Social, decoded.social),
    ];

    let mut rules = UserAgentRules::new();
    for (kind, section) in sections {
        for (label, agent) in section {
            let domain = agent.domain.trim();
            if domain.is_empty() {
                return Err(RulesError::EmptyDomain { label });
            }
            rules.push(UserAgentRule {
                kind,
                domain: domain.to_ascii_lowercase(),
                label,
                patterns: agent.patterns,
            });
        }
    }
    log::debug!("Loaded {} user-agent rules", rules.len());
    Ok(rules)
}
