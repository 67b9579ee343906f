//! Chunk names
//!
//! A chunk split into several fragments is published as `name.0`, `name.1`, ... while the
//! document only carries one anchor for the parent `name`.

use once_cell::sync::Lazy;
use regex::Regex;

static ORDINAL_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.-?[0-9]+$").unwrap());

/// The parent name of a fragment (`foo.2` → `foo`); other names are returned unchanged.
pub fn strip_ordinal(name: &str) -> &str {
    match ORDINAL_SUFFIX.find(name) {
        Some(suffix) => &name[..suffix.start()],
        None => name,
    }
}
