//! Projection and ordering operators.

use crate::common::Result;
use crate::errdata;
use crate::query::{Elements, Queryable};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::rc::Rc;

/// A sort direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Ascending,
    Descending,
}

/// A single sort key: a key extractor paired with a direction. A list
/// of these combines left-to-right into one composite comparator.
pub struct Order<T> {
    cmp: Rc<dyn Fn(&T, &T) -> Result<Ordering>>,
    direction: Direction,
}

impl<T> Clone for Order<T> {
    fn clone(&self) -> Self {
        Self { cmp: Rc::clone(&self.cmp), direction: self.direction }
    }
}

impl<T> Order<T> {
    /// Creates a sort key. Extracted keys only need a partial order; a
    /// key pair that refuses to compare (e.g. a NaN) surfaces as an
    /// error when the sort runs, not when the pipeline is built.
    pub fn new<K: PartialOrd>(extract: impl Fn(&T) -> K + 'static, direction: Direction) -> Self {
        let cmp: Rc<dyn Fn(&T, &T) -> Result<Ordering>> = Rc::new(move |a, b| {
            let (x, y) = (extract(a), extract(b));
            x.partial_cmp(&y).ok_or_else(|| errdata!("sort keys are not comparable"))
        });
        Self { cmp, direction }
    }

    /// An ascending sort key.
    pub fn asc<K: PartialOrd>(extract: impl Fn(&T) -> K + 'static) -> Self {
        Self::new(extract, Direction::Ascending)
    }

    /// A descending sort key.
    pub fn desc<K: PartialOrd>(extract: impl Fn(&T) -> K + 'static) -> Self {
        Self::new(extract, Direction::Descending)
    }

    /// Compares two elements under this key, honoring the direction.
    fn compare(&self, a: &T, b: &T) -> Result<Ordering> {
        let ordering = (self.cmp)(a, b)?;
        Ok(match self.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        })
    }
}

/// The ordering operator. Buffers the upstream elements on first pull
/// and emits them in stable-sorted order: elements whose keys all
/// compare equal keep their upstream relative order.
#[derive(Clone)]
pub(crate) struct Sort<T> {
    pub(crate) source: Elements<T>,
    pub(crate) orders: Vec<Order<T>>,
    pub(crate) sorted: Option<std::vec::IntoIter<T>>,
}

impl<T: Clone + 'static> Sort<T> {
    fn materialize(&mut self) -> Result<Vec<T>> {
        let mut elements = Vec::new();
        for element in &mut self.source {
            elements.push(element?);
        }
        debug!("sorting {} buffered elements", elements.len());

        // Vec::sort_by is stable but its comparator is infallible, so a
        // comparison failure is parked and the remaining comparisons
        // are collapsed to Equal until the sort unwinds.
        let orders = &self.orders;
        let mut failure = None;
        elements.sort_by(|a, b| {
            if failure.is_some() {
                return Ordering::Equal;
            }
            for order in orders {
                match order.compare(a, b) {
                    Ok(Ordering::Equal) => continue,
                    Ok(ordering) => return ordering,
                    Err(error) => {
                        failure = Some(error);
                        return Ordering::Equal;
                    }
                }
            }
            Ordering::Equal
        });
        match failure {
            Some(error) => Err(error),
            None => Ok(elements),
        }
    }
}

impl<T: Clone + 'static> Iterator for Sort<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.sorted.is_none() {
            match self.materialize() {
                Ok(elements) => self.sorted = Some(elements.into_iter()),
                Err(error) => {
                    self.sorted = Some(Vec::new().into_iter());
                    return Some(Err(error));
                }
            }
        }
        self.sorted.as_mut()?.next().map(Ok)
    }
}

impl<T: Clone + 'static> Queryable<T> {
    /// Keeps the elements for which the predicate holds. Lazy and
    /// order-preserving; a predicate failure surfaces when the affected
    /// element is pulled.
    pub fn filter(&self, predicate: impl Fn(&T) -> Result<bool> + Clone + 'static) -> Self {
        let filtered = self.source.clone().filter_map(move |element| {
            element
                .and_then(|element| Ok(predicate(&element)?.then_some(element)))
                .transpose()
        });
        Self { source: Box::new(filtered) }
    }

    /// Transforms each element with the mapper. Lazy, one-to-one, and
    /// order-preserving.
    pub fn select<U: Clone + 'static>(
        &self,
        mapper: impl Fn(&T) -> Result<U> + Clone + 'static,
    ) -> Queryable<U> {
        let mapped = self.source.clone().map(move |element| element.and_then(|element| mapper(&element)));
        Queryable { source: Box::new(mapped) }
    }

    /// Skips `offset` elements, then emits at most `size` elements, in
    /// the upstream order. An offset past the end of the pipeline
    /// yields nothing. Failures inside the skipped prefix still
    /// surface: they are failures, not elements.
    pub fn limit(&self, offset: usize, size: usize) -> Self {
        let mut skipped = 0;
        let limited = self
            .source
            .clone()
            .filter_map(move |element| match element {
                Ok(_) if skipped < offset => {
                    skipped += 1;
                    None
                }
                element => Some(element),
            })
            .take(size);
        Self { source: Box::new(limited) }
    }

    /// Emits the first `size` elements.
    pub fn take(&self, size: usize) -> Self {
        self.limit(0, size)
    }

    /// Stable-sorts the pipeline by the given keys, combined
    /// left-to-right. An empty key list returns the pipeline as is,
    /// without buffering anything. Otherwise the upstream is buffered
    /// when the sorted pipeline is first pulled, never at construction.
    pub fn order_by(&self, orders: Vec<Order<T>>) -> Self {
        if orders.is_empty() {
            return self.clone();
        }
        Self { source: Box::new(Sort { source: self.source.clone(), orders, sorted: None }) }
    }
}
