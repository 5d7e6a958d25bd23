//! URL parsing and hostname decomposition
//!
//! A referrer is parsed once into a [`ParsedUrl`]: the syntactic parse is
//! delegated to the `url` crate, the host is split into
//! subdomain/domain/tld with the injected [`SuffixLookup`], and the path is
//! stripped of `;` matrix parameters.

use std::borrow::Cow;

use ::url::{form_urlencoded, Host, Url};

use crate::psl::SuffixLookup;

/// Error type for referrers that cannot be classified.
#[derive(Debug, thiserror::Error)]
pub enum UrlError {
    #[error("Invalid URL: {0}")]
    Syntax(#[from] ::url::ParseError),
    #[error("URL has no host")]
    MissingHost,
    #[error("IP address host has no public suffix: {0}")]
    IpHost(String),
    #[error("No registrable domain in host: {0}")]
    NoPublicSuffix(String),
}

// =============================================================================
// Hostname Decomposition
// =============================================================================

/// Host split around its public suffix.
///
/// `www.example.co.uk` becomes `www` / `example` / `co.uk`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostParts {
    pub subdomain: String,
    pub domain: String,
    pub tld: String,
}

impl HostParts {
    /// `domain.tld`
    pub fn registrable_domain(&self) -> String {
        format!("{}.{}", self.domain, self.tld)
    }
}

/// Split a normalized hostname into subdomain, domain and public suffix.
///
/// Returns `None` when the lookup finds no suffix, or when nothing but the
/// suffix (and at most one stray character) is left, e.g. `com` or `.com`.
pub fn decompose_host<L: SuffixLookup + ?Sized>(host: &str, lookup: &L) -> Option<HostParts> {
    let tld = lookup.public_suffix(host)?;
    if tld.is_empty() || host.len().checked_sub(tld.len())? < 2 {
        return None;
    }

    let rest = host.get(..host.len() - tld.len())?.strip_suffix('.')?;
    let (subdomain, domain) = match rest.rfind('.') {
        Some(dot) => (&rest[..dot], &rest[dot + 1..]),
        None => ("", rest),
    };
    if domain.is_empty() {
        return None;
    }

    Some(HostParts {
        subdomain: subdomain.to_string(),
        domain: domain.to_string(),
        tld: tld.to_string(),
    })
}

// =============================================================================
// Path Helpers
// =============================================================================

/// Strip `;`-delimited path parameters (`/search;_ylt=...` becomes `/search`).
#[inline]
pub fn clean_path(path: &str) -> &str {
    match path.find(';') {
        Some(pos) => &path[..pos],
        None => path,
    }
}

/// Join a host and a path into a match key.
///
/// Duplicate and trailing slashes collapse, `.` segments are dropped and `..`
/// removes the previous segment, so `("example.com", "/a//b/")` gives
/// `example.com/a/b` and `("example.com", "/")` gives `example.com`.
pub fn join_key(base: &str, path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut key = String::with_capacity(base.len() + path.len() + 1);
    key.push_str(base);
    for segment in segments {
        key.push('/');
        key.push_str(segment);
    }
    key
}

/// Whether `raw` carries a path after its authority.
///
/// The `url` crate reports `/` for `http://example.com`; the referrer keeps an
/// empty path in that case.
fn has_path(raw: &str) -> bool {
    let rest = match raw.split_once("://") {
        Some((_, rest)) => rest,
        None => return true,
    };
    match rest.find(&['/', '\\', '?', '#'][..]) {
        Some(pos) => matches!(rest.as_bytes()[pos], b'/' | b'\\'),
        None => false,
    }
}

// =============================================================================
// Parsed URL
// =============================================================================

/// A referrer URL that passed the validity gate.
#[derive(Debug, Clone)]
pub struct ParsedUrl {
    url: Url,
    host: String,
    parts: HostParts,
    path: String,
}

impl ParsedUrl {
    /// Parse a trimmed, non-empty referrer.
    ///
    /// The referrer must be absolute: `example.org/path` has no scheme and
    /// fails with [`UrlError::Syntax`]. A fully-qualified host
    /// (`example.com.`) loses its trailing dot.
    pub fn parse<L: SuffixLookup + ?Sized>(raw: &str, lookup: &L) -> Result<Self, UrlError> {
        let url = Url::parse(raw)?;

        let host = match url.host() {
            Some(Host::Domain(domain)) => domain.strip_suffix('.').unwrap_or(domain).to_ascii_lowercase(),
            Some(Host::Ipv4(addr)) => return Err(UrlError::IpHost(addr.to_string())),
            Some(Host::Ipv6(addr)) => return Err(UrlError::IpHost(addr.to_string())),
            None => return Err(UrlError::MissingHost),
        };
        if host.is_empty() {
            return Err(UrlError::MissingHost);
        }

        let parts = decompose_host(&host, lookup).ok_or_else(|| UrlError::NoPublicSuffix(host.clone()))?;
        let path = if has_path(raw) {
            clean_path(url.path()).to_string()
        } else {
            String::new()
        };

        Ok(Self {
            url,
            host,
            parts,
            path,
        })
    }

    /// Lowercase hostname, without port.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn parts(&self) -> &HostParts {
        &self.parts
    }

    /// Path with matrix parameters removed.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn registrable_domain(&self) -> String {
        self.parts.registrable_domain()
    }

    /// First value of a query string parameter.
    pub fn query_value(&self, name: &str) -> Option<Cow<'_, str>> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// First value of a parameter in the fragment, read as a query string.
    pub fn fragment_value(&self, name: &str) -> Option<Cow<'_, str>> {
        let fragment = self.url.fragment()?;
        form_urlencoded::parse(fragment.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Recover a search term.
    ///
    /// Parameters are tried in the given order against the query string, then
    /// against the fragment. The first non-empty value wins.
    pub fn search_term<S: AsRef<str>>(&self, parameters: &[S]) -> Option<String> {
        let from_query = parameters
            .iter()
            .filter_map(|name| self.query_value(name.as_ref()))
            .find(|value| !value.is_empty());
        if let Some(value) = from_query {
            return Some(value.into_owned());
        }

        parameters
            .iter()
            .filter_map(|name| self.fragment_value(name.as_ref()))
            .find(|value| !value.is_empty())
            .map(Cow::into_owned)
    }
}
