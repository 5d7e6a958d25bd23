//! Stock rule data
//!
//! The bundled rule and user-agent documents are compiled into the binary.

use referrer_core::{RuleSet, UserAgentRules};

use crate::parser::{parse_json_rules, parse_json_user_agents, RulesError};

const REFERRERS_JSON: &str = include_str!("../data/referrers.json");
const USER_AGENTS_JSON: &str = include_str!("../data/user_agents.json");

/// Decode the bundled referrer rules.
pub fn default_rules() -> Result<RuleSet, RulesError> {
    parse_json_rules(REFERRERS_JSON)
}

/// Decode the bundled user-agent rules.
pub fn default_user_agents() -> Result<UserAgentRules, RulesError> {
    parse_json_user_agents(USER_AGENTS_JSON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use referrer_core::{load_list, Classifier, ClassifierOptions, GoogleSearchType, ReferrerType};

    const SUFFIXES: &str = include_str!("../../referrer-core/tests/data/public_suffix_list.dat");

    fn classifier() -> Classifier {
        let suffixes = load_list(SUFFIXES).expect("fixture list should parse");
        let rules = default_rules().expect("bundled rules should parse");
        let agents = default_user_agents().expect("bundled user agents should parse");
        Classifier::new(rules, suffixes).with_user_agents(agents)
    }

    #[test]
    fn test_bundled_data_decodes() {
        let rules = default_rules().unwrap();
        assert!(rules.len() > 50);
        assert!(rules.iter().all(|r| r.key == r.key.to_ascii_lowercase()));
        assert!(!default_user_agents().unwrap().is_empty());
    }

    #[test]
    fn test_yahoo_country_hosts() {
        let c = classifier();

        let r = c.parse("https://uk.search.yahoo.com/search?p=hello+world");
        assert_eq!(r.kind, ReferrerType::Search);
        assert_eq!(r.label, "Yahoo!");
        assert_eq!(r.query, "hello world");
        assert_eq!(r.subdomain, "uk.search");
        assert_eq!(r.domain, "yahoo");
        assert_eq!(r.tld, "com");

        let r = c.parse("http://search.yahoo.co.jp/search;_ylt=A2RA?p=ramen");
        assert_eq!(r.label, "Yahoo!");
        assert_eq!(r.path, "/search");
        assert_eq!(r.tld, "co.jp");
        assert_eq!(r.query, "ramen");
    }

    #[test]
    fn test_bing_uppercase_parameter() {
        let r = classifier().parse("https://www.bing.com/search?Q=rust&form=QBLH");
        assert_eq!(r.kind, ReferrerType::Search);
        assert_eq!(r.label, "Bing");
        assert_eq!(r.query, "rust");
        assert_eq!(r.google_type, GoogleSearchType::NotGoogle);
    }

    #[test]
    fn test_yandex_decodes_query() {
        let r = classifier().parse("https://yandex.ru/search/?text=%D0%BF%D1%80%D0%B8%D0%B2%D0%B5%D1%82");
        assert_eq!(r.label, "Yandex");
        assert_eq!(r.tld, "ru");
        assert_eq!(r.query, "привет");
    }

    #[test]
    fn test_duckduckgo_plus_encoding() {
        let r = classifier().parse("https://duckduckgo.com/?q=rust+lang");
        assert_eq!(r.label, "DuckDuckGo");
        assert_eq!(r.query, "rust lang");
    }

    #[test]
    fn test_google_organic_and_adwords() {
        let c = classifier();

        let r = c.parse("https://www.google.co.uk/search?q=walrus");
        assert_eq!(r.label, "Google");
        assert_eq!(r.query, "walrus");
        assert_eq!(r.google_type, GoogleSearchType::Organic);

        let r = c.parse("https://www.googleadservices.com/pagead/aclk?sa=L&q=boots");
        assert_eq!(r.label, "Google");
        assert_eq!(r.google_type, GoogleSearchType::Adwords);

        let r = c.parse("https://www.google.ca/imgres?imgurl=http://example.com/a.png");
        assert_eq!(r.label, "Google Images");
        assert_eq!(r.kind, ReferrerType::Search);
    }

    #[test]
    fn test_facebook_link_shims() {
        let c = classifier();
        for url in [
            "https://l.facebook.com/l.php?u=https%3A%2F%2Fexample.com%2F",
            "https://lm.facebook.com/l.php?u=https%3A%2F%2Fexample.com%2F",
        ] {
            let r = c.parse(url);
            assert_eq!(r.kind, ReferrerType::Social, "{url}");
            assert_eq!(r.label, "Facebook", "{url}");
            assert_eq!(r.domain, "facebook");
        }
    }

    #[test]
    fn test_social_with_url_in_parameter() {
        let r = classifier().parse("https://t.co/AbC123?amp=1&url=https://www.google.com/search?q=x");
        assert_eq!(r.kind, ReferrerType::Social);
        assert_eq!(r.label, "Twitter");
        assert!(r.query.is_empty());
    }

    #[test]
    fn test_webmail_and_unknown_sites() {
        let c = classifier();

        let r = c.parse("https://mail.google.com/mail/u/0/");
        assert_eq!(r.kind, ReferrerType::Email);
        assert_eq!(r.label, "Gmail");

        let r = c.parse("https://blog.walrus-cafe.org/posts/1");
        assert_eq!(r.kind, ReferrerType::Indirect);
        assert_eq!(r.label, "Walrus-Cafe");
    }

    #[test]
    fn test_user_agent_fallback() {
        let c = classifier();

        let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 9_2 like Mac OS X) Mobile/13C75 Twitter for iPhone";
        let r = c.parse_with::<&str>("", &[], Some(ua));
        assert_eq!(r.kind, ReferrerType::Social);
        assert_eq!(r.label, "Twitter");
        assert_eq!(r.url, "twitter://twitter.com");
        assert_eq!(r.host, "twitter.com");
        assert_eq!(r.domain, "twitter");
        assert_eq!(r.tld, "com");

        let again = c.parse(&r.url);
        assert_eq!(again.label, "Twitter");

        let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 11_0 like Mac OS X) Instagram 10.26.0 (iPhone8,1)";
        assert_eq!(c.parse_with::<&str>(" ", &[], Some(ua)).label, "Instagram");

        let ua = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_6) Safari/604.1";
        assert_eq!(c.parse_with::<&str>("", &[], Some(ua)).kind, ReferrerType::Direct);

        let ua = "Mozilla/5.0 Twitter for iPhone";
        let r = c.parse_with::<&str>("https://www.bing.com/search?q=x", &[], Some(ua));
        assert_eq!(r.label, "Bing");
    }

    #[test]
    fn test_locale_subdomains_option() {
        let url = "https://es.plus.google.com/u/0/";

        let r = classifier().parse(url);
        assert_eq!(r.kind, ReferrerType::Search);
        assert_eq!(r.label, "Google");

        let options: ClassifierOptions = serde_json::from_str(r#"{"locale_subdomains": true}"#).unwrap();
        let r = classifier().with_options(options).parse(url);
        assert_eq!(r.kind, ReferrerType::Social);
        assert_eq!(r.label, "Google+");
    }

    #[test]
    fn test_options_default_when_absent() {
        let options: ClassifierOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ClassifierOptions::default());
        assert!(!options.locale_subdomains);
    }
}
