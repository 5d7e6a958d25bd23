//! Public Suffix List (PSL) lookup
//!
//! The classifier never decides on its own where the registrable part of a
//! hostname starts; it asks a [`SuffixLookup`]. The stock implementation is
//! [`publicsuffix::List`], loaded from a copy of the list supplied by the
//! caller.
//!
//! # Examples
//!
//! ```
//! use referrer_core::psl::{load_list, SuffixLookup};
//!
//! let list = load_list("// ===BEGIN ICANN DOMAINS===\nuk\nco.uk\n").unwrap();
//! assert_eq!(list.public_suffix("www.example.co.uk"), Some("co.uk"));
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use publicsuffix::{List, Psl};

/// Error type for loading a suffix list.
#[derive(Debug, thiserror::Error)]
pub enum PslError {
    #[error("Failed to read suffix list: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid suffix list: {0}")]
    Parse(String),
}

// =============================================================================
// Lookup Seam
// =============================================================================

/// Public suffix lookup.
///
/// Implementations must return the longest matching public suffix following
/// the standard algorithm, including wildcard and exception rules. Hosts under
/// an unknown TLD fall back to the implicit `*` rule, so `blapblap` yields
/// `blapblap`. The returned slice is always a suffix of `host`.
pub trait SuffixLookup: Send + Sync {
    fn public_suffix<'h>(&self, host: &'h str) -> Option<&'h str>;
}

impl SuffixLookup for List {
    fn public_suffix<'h>(&self, host: &'h str) -> Option<&'h str> {
        let suffix = self.suffix(host.as_bytes())?;
        let len = suffix.as_bytes().len();
        if len == 0 || len > host.len() {
            return None;
        }
        host.get(host.len() - len..)
    }
}

impl<T: SuffixLookup + ?Sized> SuffixLookup for &T {
    fn public_suffix<'h>(&self, host: &'h str) -> Option<&'h str> {
        (**self).public_suffix(host)
    }
}

impl<T: SuffixLookup + ?Sized> SuffixLookup for Arc<T> {
    fn public_suffix<'h>(&self, host: &'h str) -> Option<&'h str> {
        (**self).public_suffix(host)
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Parse a suffix list in the `public_suffix_list.dat` format.
pub fn load_list(text: &str) -> Result<List, PslError> {
    let list = text.parse::<List>().map_err(|e| PslError::Parse(e.to_string()))?;
    log::debug!("Loaded public suffix list ({} bytes)", text.len());
    Ok(list)
}

/// Read and parse a suffix list from disk.
pub fn load_list_file<P: AsRef<Path>>(path: P) -> Result<List, PslError> {
    let text = fs::read_to_string(path.as_ref())?;
    load_list(&text)
}

// =============================================================================
// Host Helpers
// =============================================================================

/// Get the parent domain (strip leftmost label).
pub fn parent_domain(host: &str) -> Option<&str> {
    match host.find('.') {
        Some(idx) if idx < host.len() - 1 => Some(&host[idx + 1..]),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) fn sample_list() -> List {
    load_list(include_str!("../tests/data/public_suffix_list.dat")).expect("fixture list should parse")
}
