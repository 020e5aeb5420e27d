use crate::common::Result;
use dyn_clone::DynClone;

/// An element traversal.
pub type Elements<T> = Box<dyn ElementIterator<T>>;

/// An element iterator trait, which requires the iterator to be both
/// clonable and object-safe. Cloning is needed to be able to reset a
/// traversal back to an initial state, e.g. when a terminal operation
/// drives a pipeline a second time or a join re-scans its buffered
/// side. It has a blanket implementation for all matching iterators.
pub trait ElementIterator<T>: Iterator<Item = Result<T>> + DynClone {}
impl<T, I: Iterator<Item = Result<T>> + DynClone> ElementIterator<T> for I {}
dyn_clone::clone_trait_object!(<T> ElementIterator<T>);

/// A lazy, re-iterable query pipeline over elements of type `T`.
///
/// Every operator borrows the receiver and returns a new pipeline, so a
/// pipeline value is never invalidated by deriving others from it.
/// Nothing is evaluated until a terminal operation (`to_list`, `count`,
/// `sum`, or iteration) pulls elements through the chain, and the same
/// pipeline can be driven any number of times: each traversal clones
/// the pristine prototype below and advances the clone. Given pure
/// caller-supplied functions, every traversal yields the same elements
/// in the same order.
#[derive(Clone)]
pub struct Queryable<T> {
    /// The traversal prototype. Never advanced directly.
    pub(crate) source: Elements<T>,
}

impl<T: Clone + 'static> Queryable<T> {
    /// Returns a fresh traversal, starting from the first element.
    pub fn iter(&self) -> Elements<T> {
        self.source.clone()
    }

    /// Drives the pipeline to completion and collects its elements.
    pub fn to_list(&self) -> Result<Vec<T>> {
        self.iter().collect()
    }

    /// Drives the pipeline and counts its elements.
    pub fn count(&self) -> Result<usize> {
        let mut count = 0;
        for element in self.iter() {
            element?;
            count += 1;
        }
        Ok(count)
    }

    /// Drives the pipeline and sums the mapped values.
    pub fn sum<N: std::iter::Sum<N>>(&self, mapper: impl Fn(&T) -> Result<N>) -> Result<N> {
        self.iter().map(|element| element.and_then(|element| mapper(&element))).sum()
    }
}

impl<T: Clone + 'static> IntoIterator for &Queryable<T> {
    type Item = Result<T>;
    type IntoIter = Elements<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
