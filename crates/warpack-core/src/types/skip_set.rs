//! Exact-name entry exclusion set.

use std::collections::HashSet;

/// Set of archive entry names excluded from an extraction pass.
///
/// Matching is exact and case-sensitive on the raw entry name, the same way
/// ZIP readers look entries up.
///
/// # Examples
///
/// ```
/// use warpack_core::SkipSet;
///
/// let skip = SkipSet::from_names(["META-INF/MANIFEST.MF"]);
/// assert!(skip.contains("META-INF/MANIFEST.MF"));
/// assert!(!skip.contains("meta-inf/manifest.mf"));
/// assert!(SkipSet::empty().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipSet(HashSet<String>);

impl SkipSet {
    /// Creates a set that skips nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a set from entry names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Returns `true` if the entry must be skipped.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Returns `true` if no entry is skipped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
