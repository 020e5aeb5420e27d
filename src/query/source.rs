//! Leaf pipeline sources.

use crate::common::Result;
use crate::query::Queryable;

impl<T: Clone + 'static> Queryable<T> {
    /// Creates a pipeline over the given elements. The vector is copied
    /// into the pipeline once; every traversal replays it from the
    /// first element.
    pub fn from_vec(elements: Vec<T>) -> Self {
        Self { source: Box::new(elements.into_iter().map(Ok as fn(T) -> Result<T>)) }
    }

    /// Creates a pipeline that emits nothing.
    pub fn empty() -> Self {
        Self { source: Box::new(std::iter::empty()) }
    }
}

impl<T: Clone + 'static> From<Vec<T>> for Queryable<T> {
    fn from(elements: Vec<T>) -> Self {
        Self::from_vec(elements)
    }
}

impl<T: Clone + 'static> FromIterator<T> for Queryable<T> {
    /// Drains an arbitrary iterator into a pipeline. An external lazy
    /// source is consumed once, here; traversals replay the copied
    /// elements rather than re-pulling the exhausted source.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}
