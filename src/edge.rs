use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};
use unordered_pair::UnorderedPair;

use crate::location::Vertex;

/// Dense index of an edge in a [`GridGraph`](crate::GridGraph)'s canonical edge ordering.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug, Serialize, Deserialize)]
pub struct EdgeId(pub usize);

/// An undirected edge between two vertices.
///
/// The endpoints are stored sorted, so `Edge::new(a, b) == Edge::new(b, a)`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Edge {
    lo: Vertex,
    hi: Vertex,
}

impl Edge {
    /// The edge between `a` and `b`, in either order.
    pub fn new(a: Vertex, b: Vertex) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// The `(min, max)` ordered endpoints.
    pub fn canonical(&self) -> (Vertex, Vertex) {
        (self.lo, self.hi)
    }

    /// Whether `vertex` is an endpoint.
    pub fn touches(&self, vertex: Vertex) -> bool {
        self.lo == vertex || self.hi == vertex
    }
}

impl From<UnorderedPair<Vertex>> for Edge {
    fn from(value: UnorderedPair<Vertex>) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<(Vertex, Vertex)> for Edge {
    fn from(value: (Vertex, Vertex)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl Debug for Edge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Edge({:?}, {:?})", self.lo, self.hi)
    }
}

impl Display for Edge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.lo, self.hi)
    }
}

const WORD_BITS: usize = u64::BITS as usize;

/// Fixed-size bit vector over [`EdgeId`]s.
///
/// Two vectors built for the same graph always have the same number of words.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeBits {
    words: Vec<u64>,
}

impl EdgeBits {
    /// An empty vector able to hold `len` edges.
    pub fn with_len(len: usize) -> Self {
        Self { words: vec![0; len.div_ceil(WORD_BITS)] }
    }

    /// Number of backing `u64` words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Ids beyond the vector's length are never contained.
    #[inline]
    pub fn contains(&self, id: EdgeId) -> bool {
        self.words
            .get(id.0 / WORD_BITS)
            .is_some_and(|word| word & (1 << (id.0 % WORD_BITS)) != 0)
    }

    /// Panics if `id` is beyond the length this vector was built with.
    #[inline]
    pub fn insert(&mut self, id: EdgeId) {
        self.words[id.0 / WORD_BITS] |= 1 << (id.0 % WORD_BITS);
    }

    /// Clear `id`; no-op if out of range.
    #[inline]
    pub fn remove(&mut self, id: EdgeId) {
        if let Some(word) = self.words.get_mut(id.0 / WORD_BITS) {
            *word &= !(1 << (id.0 % WORD_BITS));
        }
    }

    /// Number of set edges.
    pub fn len(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Whether no edge is set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|word| *word == 0)
    }

    /// Whether any edge is set in both.
    pub fn intersects(&self, other: &Self) -> bool {
        self.words.iter().zip(&other.words).any(|(a, b)| a & b != 0)
    }

    /// Edges set in either.
    pub fn union(&self, other: &Self) -> Self {
        let mut words = self.words.clone();
        words.resize(words.len().max(other.words.len()), 0);
        for (word, theirs) in words.iter_mut().zip(&other.words) {
            *word |= theirs;
        }
        Self { words }
    }

    /// The set edges in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.words.iter().enumerate().flat_map(|(index, word)| {
            (0..WORD_BITS)
                .filter(move |bit| word & (1 << bit) != 0)
                .map(move |bit| EdgeId(index * WORD_BITS + bit))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_identity_ignores_order() {
        let a = Vertex(1, 2);
        let b = Vertex(1, 3);
        assert_eq!(Edge::new(a, b), Edge::new(b, a));
        assert_eq!(Edge::from(UnorderedPair(b, a)).canonical(), (a, b));
    }

    #[test]
    fn bits_across_word_boundary() {
        let mut bits = EdgeBits::with_len(130);
        assert_eq!(bits.word_count(), 3);
        bits.insert(EdgeId(3));
        bits.insert(EdgeId(64));
        bits.insert(EdgeId(129));
        assert_eq!(bits.iter().collect::<Vec<_>>(), vec![EdgeId(3), EdgeId(64), EdgeId(129)]);
        assert_eq!(bits.len(), 3);

        bits.remove(EdgeId(64));
        assert!(!bits.contains(EdgeId(64)));
        assert!(!bits.contains(EdgeId(1000)));

        let mut other = EdgeBits::with_len(130);
        other.insert(EdgeId(129));
        assert!(bits.intersects(&other));
        other.remove(EdgeId(129));
        assert!(!bits.intersects(&other));
        assert!(other.is_empty());
    }
}
