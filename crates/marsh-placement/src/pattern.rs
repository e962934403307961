//! Wildcard matching between names.
//!
//! Patterns are ordinary [`Name`] values with [`Segment::Wildcard`] at the
//! realm and/or swamp level. They select names for subscriptions and
//! filters, and are never placement targets.

use crate::name::{Name, Segment};

impl Segment {
    /// Check whether this segment satisfies `pattern`.
    ///
    /// A wildcard pattern accepts any segment. A literal pattern only
    /// accepts the identical literal.
    #[inline]
    #[must_use]
    pub fn matches(&self, pattern: &Segment) -> bool {
        match pattern {
            Segment::Wildcard => true,
            Segment::Literal(_) => self == pattern,
        }
    }
}

impl Name {
    /// Returns true if the realm or swamp is a wildcard.
    #[must_use]
    pub fn is_pattern(&self) -> bool {
        self.realm().is_wildcard() || self.swamp().is_wildcard()
    }

    /// Check whether this name satisfies `pattern`.
    ///
    /// The sanctuary must be identical. Realm and swamp follow
    /// [`Segment::matches`].
    #[must_use]
    pub fn matches(&self, pattern: &Name) -> bool {
        self.sanctuary_id() == pattern.sanctuary_id()
            && self.realm().matches(pattern.realm())
            && self.swamp().matches(pattern.swamp())
    }
}
