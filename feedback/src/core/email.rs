//! Email address syntax check.
//!
//! Syntax only: no DNS or MX lookups. The accepted shape is the one common
//! web form validators use: a restricted local part, one `@`, dot-separated
//! domain labels and an alphabetic TLD of at least two characters.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@(?:[a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$")
        .expect("email regex should compile")
});

/// Returns true when `candidate` is a syntactically valid email address.
///
/// The caller is expected to trim first; surrounding whitespace is rejected.
pub fn is_valid_email(candidate: &str) -> bool {
    // The regex crate has no lookahead, so the dot rules are checked here.
    if candidate.starts_with('.') || candidate.contains("..") {
        return false;
    }
    EMAIL_RE.is_match(candidate)
}
