//! Hierarchical `sanctuary/realm/swamp` names.
//!
//! A [`Name`] is built through a typestate chain so that only complete
//! three-level names exist:
//!
//! ```text
//! NameBuilder<Empty> --sanctuary--> NameBuilder<HasSanctuary>
//!                    --realm------> NameBuilder<HasRealm>
//!                    --swamp------> Name
//! ```
//!
//! Each step borrows the previous builder and returns a new value, so a
//! realm-level builder can produce any number of swamps. Names are
//! immutable once built.
//!
//! The canonical path (`sanctuary/realm/swamp`) is the only text fed to the
//! directory hash. Segments must not contain `/`, which is the only way the
//! canonical form stays parseable.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::{PlacementError, Result};
use crate::placement::{PathMemo, ShardMemo};

/// Separator between levels of the canonical path.
pub const SEPARATOR: char = '/';

/// Textual form of [`Segment::Wildcard`] in canonical paths.
pub const WILDCARD: &str = "*";

/// Levels of the naming hierarchy, most general first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Top level, never a wildcard.
    Sanctuary,
    /// Second level.
    Realm,
    /// Leaf level, one swamp per stored unit.
    Swamp,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Sanctuary => "sanctuary",
            Self::Realm => "realm",
            Self::Swamp => "swamp",
        };
        f.write_str(s)
    }
}

/// A realm or swamp segment.
///
/// Wildcards are a distinct variant, so a literal segment spelled `*` is
/// still a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A concrete segment value.
    Literal(String),
    /// Matches any value at this level. Only meaningful in patterns.
    Wildcard,
}

impl Segment {
    /// Create a literal segment.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// Returns true for [`Segment::Wildcard`].
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }

    /// Textual form used in canonical paths.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(value) => value,
            Self::Wildcard => WILDCARD,
        }
    }

    fn validate(&self, level: Level) -> Result<()> {
        match self {
            Self::Literal(value) => validate_literal(level, value),
            Self::Wildcard => Ok(()),
        }
    }
}

impl From<&str> for Segment {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

impl From<String> for Segment {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn validate_literal(level: Level, value: &str) -> Result<()> {
    let reason = if value.is_empty() {
        "must not be empty"
    } else if value.contains(SEPARATOR) {
        "must not contain '/'"
    } else {
        return Ok(());
    };
    Err(PlacementError::InvalidSegment { level, value: value.to_string(), reason })
}

/// Builder state: nothing set yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

/// Builder state: sanctuary set.
#[derive(Debug, Clone)]
pub struct HasSanctuary {
    sanctuary: String,
}

/// Builder state: sanctuary and realm set.
#[derive(Debug, Clone)]
pub struct HasRealm {
    sanctuary: String,
    realm: Segment,
    canonical: String,
}

/// Typestate builder for [`Name`].
#[derive(Debug, Clone)]
pub struct NameBuilder<S> {
    state: S,
}

impl NameBuilder<Empty> {
    /// Set the sanctuary.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidSegment`] if `sanctuary_id` is empty
    /// or contains `/`.
    pub fn sanctuary(&self, sanctuary_id: impl Into<String>) -> Result<NameBuilder<HasSanctuary>> {
        let sanctuary = sanctuary_id.into();
        validate_literal(Level::Sanctuary, &sanctuary)?;
        Ok(NameBuilder { state: HasSanctuary { sanctuary } })
    }

    /// Canonical path built so far, always empty.
    #[must_use]
    pub fn canonical_path(&self) -> &str {
        ""
    }
}

impl NameBuilder<HasSanctuary> {
    /// Set the realm.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidSegment`] for an empty literal or one
    /// containing `/`.
    pub fn realm(&self, realm: impl Into<Segment>) -> Result<NameBuilder<HasRealm>> {
        let realm = realm.into();
        realm.validate(Level::Realm)?;
        let canonical = format!("{}{SEPARATOR}{}", self.state.sanctuary, realm);
        Ok(NameBuilder {
            state: HasRealm { sanctuary: self.state.sanctuary.clone(), realm, canonical },
        })
    }

    /// Set the realm to a wildcard.
    #[must_use]
    pub fn any_realm(&self) -> NameBuilder<HasRealm> {
        let canonical = format!("{}{SEPARATOR}{WILDCARD}", self.state.sanctuary);
        NameBuilder {
            state: HasRealm {
                sanctuary: self.state.sanctuary.clone(),
                realm: Segment::Wildcard,
                canonical,
            },
        }
    }

    /// Canonical path built so far (`sanctuary`).
    #[must_use]
    pub fn canonical_path(&self) -> &str {
        &self.state.sanctuary
    }
}

impl NameBuilder<HasRealm> {
    /// Set the swamp, completing the name.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidSegment`] for an empty literal or one
    /// containing `/`.
    pub fn swamp(&self, swamp: impl Into<Segment>) -> Result<Name> {
        let swamp = swamp.into();
        swamp.validate(Level::Swamp)?;
        Ok(self.complete(swamp))
    }

    /// Set the swamp to a wildcard, completing a pattern.
    #[must_use]
    pub fn any_swamp(&self) -> Name {
        self.complete(Segment::Wildcard)
    }

    /// Canonical path built so far (`sanctuary/realm`).
    #[must_use]
    pub fn canonical_path(&self) -> &str {
        &self.state.canonical
    }

    fn complete(&self, swamp: Segment) -> Name {
        let canonical = format!("{}{SEPARATOR}{}", self.state.canonical, swamp);
        Name {
            sanctuary: self.state.sanctuary.clone(),
            realm: self.state.realm.clone(),
            swamp,
            canonical,
            shard_memo: OnceLock::new(),
            path_memo: OnceLock::new(),
        }
    }
}

/// A complete `sanctuary/realm/swamp` name.
///
/// Besides its identifying segments a name carries two compute-once cells
/// used by [`Name::shard_index`] and [`Name::full_hashed_path`]. They do not
/// take part in equality or hashing.
#[derive(Debug, Clone)]
pub struct Name {
    sanctuary: String,
    realm: Segment,
    swamp: Segment,
    canonical: String,
    pub(crate) shard_memo: OnceLock<ShardMemo>,
    pub(crate) path_memo: OnceLock<PathMemo>,
}

impl Name {
    /// Start building a name.
    #[must_use]
    pub fn empty() -> NameBuilder<Empty> {
        NameBuilder { state: Empty }
    }

    /// Build a literal name from its three segments.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidSegment`] if any segment is empty or
    /// contains `/`.
    pub fn new(
        sanctuary_id: impl Into<String>,
        realm: impl Into<String>,
        swamp: impl Into<String>,
    ) -> Result<Self> {
        Self::empty()
            .sanctuary(sanctuary_id)?
            .realm(Segment::Literal(realm.into()))?
            .swamp(Segment::Literal(swamp.into()))
    }

    /// Parse a canonical path into a literal name.
    ///
    /// The input must have exactly three non-empty `/`-separated segments.
    /// Every segment is taken literally, including `*`.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::MalformedCanonicalPath`] for any other shape.
    pub fn parse(input: &str) -> Result<Self> {
        Self::parse_with(input, |token| Segment::literal(token))
    }

    /// Parse a canonical path into a pattern.
    ///
    /// Same shape rules as [`Name::parse`], but a realm or swamp spelled `*`
    /// becomes [`Segment::Wildcard`].
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::MalformedCanonicalPath`] if the input does
    /// not have exactly three non-empty segments.
    pub fn parse_pattern(input: &str) -> Result<Self> {
        Self::parse_with(input, |token| {
            if token == WILDCARD {
                Segment::Wildcard
            } else {
                Segment::from(token)
            }
        })
    }

    fn parse_with(input: &str, segment: impl Fn(&str) -> Segment) -> Result<Self> {
        let tokens: Vec<&str> = input.split(SEPARATOR).collect();
        let [sanctuary, realm, swamp] = tokens.as_slice() else {
            return Err(PlacementError::malformed(
                input,
                format!("expected 3 segments, found {}", tokens.len()),
            ));
        };
        if let Some(position) = tokens.iter().position(|token| token.is_empty()) {
            return Err(PlacementError::malformed(
                input,
                format!("segment {} is empty", position + 1),
            ));
        }

        Self::empty().sanctuary(*sanctuary)?.realm(segment(*realm))?.swamp(segment(*swamp))
    }

    /// The sanctuary segment.
    #[must_use]
    pub fn sanctuary_id(&self) -> &str {
        &self.sanctuary
    }

    /// The realm segment.
    #[must_use]
    pub fn realm(&self) -> &Segment {
        &self.realm
    }

    /// The swamp segment.
    #[must_use]
    pub fn swamp(&self) -> &Segment {
        &self.swamp
    }

    /// The realm segment as text (`*` for a wildcard).
    #[must_use]
    pub fn realm_name(&self) -> &str {
        self.realm.as_str()
    }

    /// The swamp segment as text (`*` for a wildcard).
    #[must_use]
    pub fn swamp_name(&self) -> &str {
        self.swamp.as_str()
    }

    /// The `/`-joined canonical path.
    ///
    /// This is hashing input and diagnostic output. Downstream code that
    /// needs the segments back should use [`Name::parse`] rather than
    /// splitting the string itself.
    #[must_use]
    pub fn canonical_path(&self) -> &str {
        &self.canonical
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.sanctuary == other.sanctuary && self.realm == other.realm && self.swamp == other.swamp
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sanctuary.hash(state);
        self.realm.hash(state);
        self.swamp.hash(state);
    }
}

impl FromStr for Name {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}
