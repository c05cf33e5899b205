//! Tenant path prefixes and the prefix composition rules.
//!
//! # Responsibilities
//! - Enforce the canonical prefix shape (empty, or `/segment`)
//! - Validate clinic slugs before they become prefixes
//! - Compose prefixes with reversed paths (`apply`)
//! - Remove prefixes from incoming request paths (`strip`)
//!
//! # Design Decisions
//! - One boundary check shared by `apply` and `strip`: a prefix only counts
//!   as present when followed by `/` or end-of-string
//! - Absolute URLs (leading scheme) pass through untouched
//! - No regex; slug validation is a single byte scan

use std::fmt;

use url::Url;

/// A tenant's path fragment: either empty or `/segment`.
///
/// Canonical form is enforced at construction: a non-empty prefix starts
/// with exactly one `/`, never ends in `/`, and carries no query or
/// fragment. The empty prefix means "no prefix" and composes as identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantPrefix(String);

impl TenantPrefix {
    /// The empty prefix.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Build `/slug` after checking slug validity.
    pub fn for_slug(slug: &str) -> Option<Self> {
        if is_valid_slug(slug) {
            Some(Self(format!("/{slug}")))
        } else {
            None
        }
    }

    /// Parse an already-canonical prefix string (`""` or `/slug`).
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return Some(Self::empty());
        }
        raw.strip_prefix('/').and_then(Self::for_slug)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when `path` starts with this prefix at a path-segment boundary.
    ///
    /// A prefix that matches only as a substring does not count: `/ac` is
    /// not present in `/acme/x/`, only in `/ac`, `/ac/...` or `/ac?...`-free
    /// positions followed by `/` or end-of-string.
    pub fn starts_path(&self, path: &str) -> bool {
        if self.0.is_empty() {
            return false;
        }
        match path.strip_prefix(self.0.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// Compose this prefix with a reversed internal path.
    ///
    /// Rules, in order: an empty prefix and an absolute URL both pass the
    /// input through unchanged; a path already carrying the prefix at a
    /// segment boundary is returned as-is; anything else loses one leading
    /// `/` and is joined under the prefix. Query and fragment suffixes ride
    /// along untouched, and the join never produces `//`.
    pub fn apply(&self, internal: &str) -> String {
        if self.0.is_empty() || Url::parse(internal).is_ok() || self.starts_path(internal) {
            return internal.to_string();
        }
        let stripped = internal.strip_prefix('/').unwrap_or(internal);
        format!("{}/{}", self.0, stripped)
    }

    /// Remove this prefix from a request path, for the routing rewrite.
    ///
    /// Returns `None` when the prefix is empty or not present at a segment
    /// boundary. The bare prefix maps back to `/`; any other remainder gets
    /// its trailing slash restored, since routed paths end in `/`.
    pub fn strip(&self, path: &str) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        let rest = path.strip_prefix(self.0.as_str())?;
        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }
        if rest.is_empty() || rest == "/" {
            return Some("/".to_string());
        }
        if rest.ends_with('/') {
            Some(rest.to_string())
        } else {
            Some(format!("{rest}/"))
        }
    }
}

impl fmt::Display for TenantPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Slug rules carried over from tenant provisioning: 3-20 ASCII characters,
/// letters/digits/hyphens, starting with a letter and ending alphanumeric.
/// Three-character slugs must be fully alphanumeric.
pub fn is_valid_slug(slug: &str) -> bool {
    if !slug.is_ascii() {
        return false;
    }
    let bytes = slug.as_bytes();
    let len = bytes.len();
    if !(3..=20).contains(&len) {
        return false;
    }
    if len == 3 {
        return bytes.iter().all(u8::is_ascii_alphanumeric);
    }
    bytes[0].is_ascii_alphabetic()
        && bytes[len - 1].is_ascii_alphanumeric()
        && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
}
