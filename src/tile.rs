use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::{ALL_DIRECTIONS, Direction, SignatureProvider};

/// Opaque adjacency signature, typically a hash of sampled edge content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(pub u64);

/// Connection-type label, such as `street` or `blank`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionTag(pub String);

impl From<&str> for ConnectionTag {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for ConnectionTag {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which adjacency descriptor scheme a tile uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Per-direction [`Signature`] values.
    Signature,
    /// Per-direction [`ConnectionTag`] labels.
    Tags,
}

/// Per-direction adjacency descriptors, indexed by [`Direction::index`].
///
/// Two tiles may sit side by side across direction `d` when the first tile's
/// descriptor at `d` equals the second tile's descriptor at `d.opposite()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sockets {
    /// Signature scheme.
    Signature([Signature; 4]),
    /// Explicit connection-tag scheme.
    Tags([ConnectionTag; 4]),
}

impl Sockets {
    /// The scheme these descriptors belong to.
    pub fn scheme(&self) -> Scheme {
        match self {
            Sockets::Signature(_) => Scheme::Signature,
            Sockets::Tags(_) => Scheme::Tags,
        }
    }

    /// Whether a tile with these sockets may have a tile with `other` sockets
    /// on its `direction` side. Mixed schemes never match.
    pub fn matches(&self, direction: Direction, other: &Sockets) -> bool {
        let (d, o) = (direction.index(), direction.opposite().index());
        match (self, other) {
            (Sockets::Signature(a), Sockets::Signature(b)) => a[d] == b[o],
            (Sockets::Tags(a), Sockets::Tags(b)) => a[d] == b[o],
            _ => false,
        }
    }
}

/// A named catalog entry with its adjacency descriptors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    name: String,
    sockets: Sockets,
}

impl Tile {
    /// Construct a tile from explicit sockets.
    pub fn new(name: impl Into<String>, sockets: Sockets) -> Self {
        Self {
            name: name.into(),
            sockets,
        }
    }

    /// Signature-scheme tile, sockets listed as `[up, right, down, left]`.
    pub fn with_signatures(name: impl Into<String>, signatures: [u64; 4]) -> Self {
        Self::new(name, Sockets::Signature(signatures.map(Signature)))
    }

    /// Tag-scheme tile, sockets listed as `[up, right, down, left]`.
    pub fn with_tags(name: impl Into<String>, tags: [&str; 4]) -> Self {
        Self::new(name, Sockets::Tags(tags.map(ConnectionTag::from)))
    }

    /// Signature-scheme tile whose signatures come from `provider`.
    pub fn from_provider(name: impl Into<String>, provider: &impl SignatureProvider) -> Self {
        Self::new(
            name,
            Sockets::Signature(ALL_DIRECTIONS.map(|dir| provider.signature(dir))),
        )
    }

    /// Unique name of the tile within its catalog.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adjacency descriptors.
    pub fn sockets(&self) -> &Sockets {
        &self.sockets
    }
}

impl Display for Tile {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signatures_match_across_opposite_sides() {
        let a = Tile::with_signatures("a", [1, 2, 3, 4]);
        let b = Tile::with_signatures("b", [9, 9, 9, 2]);
        assert!(a.sockets().matches(Direction::Right, b.sockets()));
        assert!(b.sockets().matches(Direction::Left, a.sockets()));
        assert!(!a.sockets().matches(Direction::Up, b.sockets()));
    }

    #[test]
    fn tags_match_across_opposite_sides() {
        let road = Tile::with_tags("road", ["street", "blank", "street", "blank"]);
        let grass = Tile::with_tags("grass", ["blank", "blank", "blank", "blank"]);
        assert!(road.sockets().matches(Direction::Up, road.sockets()));
        assert!(road.sockets().matches(Direction::Right, grass.sockets()));
        assert!(!road.sockets().matches(Direction::Up, grass.sockets()));
    }

    #[test]
    fn mixed_schemes_never_match() {
        let a = Tile::with_signatures("a", [0, 0, 0, 0]);
        let b = Tile::with_tags("b", ["0", "0", "0", "0"]);
        assert!(!a.sockets().matches(Direction::Up, b.sockets()));
        assert_ne!(a.sockets().scheme(), b.sockets().scheme());
    }
}
