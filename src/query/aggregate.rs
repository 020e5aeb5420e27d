//! Grouping and aggregation operators.

use crate::common::Result;
use crate::errdata;
use crate::query::{Elements, Queryable};
use indexmap::IndexMap;
use log::debug;
use std::cmp::Ordering;
use std::hash::Hash;
use std::ops::Add;
use std::rc::Rc;

/// An opaque three-part fold reducing one group of elements to a single
/// value: a seed, a per-element step, and a finishing transform.
pub struct Aggregator<T, A, R> {
    seed: Rc<dyn Fn() -> A>,
    step: Rc<dyn Fn(A, &T) -> Result<A>>,
    finish: Rc<dyn Fn(A) -> Result<R>>,
}

impl<T, A, R> Clone for Aggregator<T, A, R> {
    fn clone(&self) -> Self {
        Self {
            seed: Rc::clone(&self.seed),
            step: Rc::clone(&self.step),
            finish: Rc::clone(&self.finish),
        }
    }
}

impl<T, A, R> Aggregator<T, A, R> {
    pub fn new(
        seed: impl Fn() -> A + 'static,
        step: impl Fn(A, &T) -> Result<A> + 'static,
        finish: impl Fn(A) -> Result<R> + 'static,
    ) -> Self {
        Self { seed: Rc::new(seed), step: Rc::new(step), finish: Rc::new(finish) }
    }
}

impl<T> Aggregator<T, usize, usize> {
    /// Counts the group's elements.
    pub fn count() -> Self {
        Self::new(|| 0, |count, _| Ok(count + 1), Ok)
    }
}

impl<T, N: Add<Output = N> + Default + 'static> Aggregator<T, N, N> {
    /// Sums the mapped values over the group.
    pub fn sum(map: impl Fn(&T) -> Result<N> + 'static) -> Self {
        Self::new(N::default, move |sum, element| Ok(sum + map(element)?), Ok)
    }
}

impl<T, N: PartialOrd + 'static> Aggregator<T, Option<N>, Option<N>> {
    /// The minimum mapped value, `None` for an empty group.
    pub fn min(map: impl Fn(&T) -> Result<N> + 'static) -> Self {
        Self::extremum(map, Ordering::Less)
    }

    /// The maximum mapped value, `None` for an empty group.
    pub fn max(map: impl Fn(&T) -> Result<N> + 'static) -> Self {
        Self::extremum(map, Ordering::Greater)
    }

    fn extremum(map: impl Fn(&T) -> Result<N> + 'static, keep: Ordering) -> Self {
        Self::new(
            || None,
            move |best, element| {
                let candidate = map(element)?;
                Ok(match best {
                    None => Some(candidate),
                    Some(best) => {
                        let ordering = candidate
                            .partial_cmp(&best)
                            .ok_or_else(|| errdata!("aggregated values are not comparable"))?;
                        if ordering == keep {
                            Some(candidate)
                        } else {
                            Some(best)
                        }
                    }
                })
            },
            Ok,
        )
    }
}

impl<T> Aggregator<T, (f64, usize), Option<f64>> {
    /// The arithmetic mean of the mapped values, `None` for an empty
    /// group.
    pub fn average(map: impl Fn(&T) -> Result<f64> + 'static) -> Self {
        Self::new(
            || (0.0, 0),
            move |(sum, count), element| Ok((sum + map(element)?, count + 1)),
            |(sum, count)| Ok((count > 0).then(|| sum / count as f64)),
        )
    }
}

impl<T: Clone + 'static> Aggregator<T, Vec<T>, Queryable<T>> {
    /// Keeps the group itself, as a nested pipeline over its members in
    /// encounter order.
    pub fn collect_group() -> Self {
        Self::new(
            Vec::new,
            |mut group, element| {
                group.push(element.clone());
                Ok(group)
            },
            |group| Ok(Queryable::from_vec(group)),
        )
    }
}

/// The grouping operator. Drains the upstream on first pull, folding
/// each element into its key's accumulator in encounter order, then
/// emits one `(key, result)` row per key, in first-encounter key order.
pub(crate) struct Aggregate<T, K, A, R, C> {
    pub(crate) source: Elements<T>,
    pub(crate) classifier: C,
    pub(crate) aggregator: Aggregator<T, A, R>,
    pub(crate) grouped: Option<std::vec::IntoIter<(K, R)>>,
}

impl<T, K: Clone, A, R: Clone, C: Clone> Clone for Aggregate<T, K, A, R, C> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            classifier: self.classifier.clone(),
            aggregator: self.aggregator.clone(),
            grouped: self.grouped.clone(),
        }
    }
}

impl<T, K, A, R, C> Aggregate<T, K, A, R, C>
where
    T: Clone + 'static,
    K: Clone + Eq + Hash + 'static,
    C: Fn(&T) -> Result<K>,
{
    fn materialize(&mut self) -> Result<Vec<(K, R)>> {
        // Accumulators are held in option slots so the step fold can
        // take them by value without re-seeding.
        let mut buckets: IndexMap<K, Option<A>> = IndexMap::new();
        for element in &mut self.source {
            let element = element?;
            let key = (self.classifier)(&element)?;
            let slot = buckets.entry(key).or_insert_with(|| Some((self.aggregator.seed)()));
            let accumulator = slot.take().unwrap();
            *slot = Some((self.aggregator.step)(accumulator, &element)?);
        }
        debug!("folded {} groups", buckets.len());
        let finish = &self.aggregator.finish;
        buckets
            .into_iter()
            .map(|(key, accumulator)| Ok((key, finish(accumulator.unwrap())?)))
            .collect()
    }
}

impl<T, K, A, R, C> Iterator for Aggregate<T, K, A, R, C>
where
    T: Clone + 'static,
    K: Clone + Eq + Hash + 'static,
    R: Clone + 'static,
    C: Fn(&T) -> Result<K>,
{
    type Item = Result<(K, R)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.grouped.is_none() {
            match self.materialize() {
                Ok(rows) => self.grouped = Some(rows.into_iter()),
                Err(error) => {
                    self.grouped = Some(Vec::new().into_iter());
                    return Some(Err(error));
                }
            }
        }
        self.grouped.as_mut()?.next().map(Ok)
    }
}

impl<T: Clone + 'static> Queryable<T> {
    /// Partitions the pipeline by the classifier and folds each group
    /// through the aggregator, emitting one `(key, result)` row per
    /// group. Members are folded in encounter order and keys are
    /// emitted in first-encounter order.
    pub fn group_by<K, A, R, C>(
        &self,
        classifier: C,
        aggregator: Aggregator<T, A, R>,
    ) -> Queryable<(K, R)>
    where
        K: Clone + Eq + Hash + 'static,
        A: 'static,
        R: Clone + 'static,
        C: Fn(&T) -> Result<K> + Clone + 'static,
    {
        Queryable {
            source: Box::new(Aggregate {
                source: self.source.clone(),
                classifier,
                aggregator,
                grouped: None,
            }),
        }
    }

    /// Groups without reducing: each key is paired with a nested
    /// pipeline over its members.
    pub fn groups<K, C>(&self, classifier: C) -> Queryable<(K, Queryable<T>)>
    where
        K: Clone + Eq + Hash + 'static,
        C: Fn(&T) -> Result<K> + Clone + 'static,
    {
        self.group_by(classifier, Aggregator::collect_group())
    }
}

impl<K: Clone + 'static, V: Clone + 'static> Queryable<(K, V)> {
    /// Drops grouped rows failing the predicate. Runs over the grouped
    /// or aggregated view, not over the raw upstream elements.
    pub fn having(&self, predicate: impl Fn(&K, &V) -> Result<bool> + Clone + 'static) -> Self {
        self.filter(move |(key, value)| predicate(key, value))
    }
}
