use std::hash::{DefaultHasher, Hash, Hasher};

use crate::{Direction, Signature};

/// Source of per-direction adjacency signatures for one tile.
///
/// Hosts implement this over whatever they derive signatures from (sprite edges,
/// hand-authored data); the solver only ever sees the resulting [`Signature`]s.
pub trait SignatureProvider {
    /// Signature of the tile's `direction` edge.
    fn signature(&self, direction: Direction) -> Signature;
}

impl SignatureProvider for [Signature; 4] {
    fn signature(&self, direction: Direction) -> Signature {
        self[direction.index()]
    }
}

/// Hash a run of sampled edge values into a single signature.
///
/// Samples must be listed in the same winding on every edge (for example
/// clockwise), so that touching edges of two tiles produce the same sequence.
pub fn edge_signature<T: Hash>(samples: &[T]) -> Signature {
    let mut hasher = DefaultHasher::new();
    samples.hash(&mut hasher);
    Signature(hasher.finish())
}
