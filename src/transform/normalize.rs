use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NON_ALNUM_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Canonical surface normalization: trim, lowercase, collapse any run of
/// Unicode whitespace to a single ASCII space. Punctuation is kept.
///
/// This and [`slugify`] are the only surface-to-key transforms in the
/// pipeline; every index lookup goes through here.
pub fn normalize_surface(text: &str) -> String {
    WHITESPACE_RUN
        .replace_all(&text.trim().to_lowercase(), " ")
        .into_owned()
}

/// Identifier-safe slug: lowercase, runs of anything outside `[a-z0-9]`
/// become a single `_`, leading/trailing `_` stripped. An empty result
/// becomes the literal `"unknown"`.
pub fn slugify(text: &str) -> String {
    let normalized = normalize_surface(text);
    let slug = NON_ALNUM_RUN.replace_all(&normalized, "_");
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        "unknown".to_string()
    } else {
        slug.to_string()
    }
}
