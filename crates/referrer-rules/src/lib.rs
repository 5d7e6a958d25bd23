//! Referrer Rule Loader
//!
//! This crate turns rule documents (JSON, or the older line-oriented engine
//! and social lists) into a [`referrer_core::RuleSet`], and ships a stock
//! rule set covering the common search engines, social networks and webmail
//! providers.

pub mod defaults;
pub mod parser;

pub use defaults::{default_rules, default_user_agents};
pub use parser::{
    load_json_rules, load_json_rules_file, load_json_user_agents, match_key, parse_engines_csv,
    parse_json_rules, parse_json_user_agents, parse_socials_csv, RulesError,
};
