//! Join operators. All joins are nested loops built on one primitive:
//! buffer the right side, scan it once per left element.

use crate::common::Result;
use crate::query::{Elements, Queryable};
use crate::types::Pair;
use log::debug;

/// A predicate type for predicate-less joins; never called.
type NoPredicate<L, R> = fn(&L, &R) -> Result<bool>;

/// Joins two element streams by buffering the right side and iterating
/// over it for every left element, the predicate deciding which
/// pairings are emitted. One pair is emitted per match, in the right
/// side's order. When `outer` is true, a left element whose whole right
/// scan produced no match is emitted exactly once with an absent right
/// slot; consecutive non-matches never pad the output beyond that one
/// row. A `None` predicate pairs everything (a cross join).
#[derive(Clone)]
pub(crate) struct NestedLoopJoin<L, R, P> {
    left: Elements<L>,
    right: Elements<R>,
    predicate: Option<P>,
    outer: bool,
    buffer: Option<Vec<R>>,
    current: Option<L>,
    cursor: usize,
    matched: bool,
    errored: bool,
}

impl<L, R, P> NestedLoopJoin<L, R, P> {
    fn new(left: Elements<L>, right: Elements<R>, predicate: Option<P>, outer: bool) -> Self {
        Self {
            left,
            right,
            predicate,
            outer,
            buffer: None,
            current: None,
            cursor: 0,
            matched: false,
            errored: false,
        }
    }
}

impl<L, R, P> Iterator for NestedLoopJoin<L, R, P>
where
    L: Clone + 'static,
    R: Clone + 'static,
    P: Fn(&L, &R) -> Result<bool>,
{
    type Item = Result<Pair<L, R>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.errored {
            return None;
        }
        if self.buffer.is_none() {
            let mut buffer = Vec::new();
            for element in &mut self.right {
                match element {
                    Ok(element) => buffer.push(element),
                    Err(error) => {
                        self.errored = true;
                        return Some(Err(error));
                    }
                }
            }
            debug!("buffered {} right-side elements", buffer.len());
            self.buffer = Some(buffer);
        }
        loop {
            if self.current.is_none() {
                match self.left.next()? {
                    Err(error) => {
                        self.errored = true;
                        return Some(Err(error));
                    }
                    Ok(element) => {
                        self.current = Some(element);
                        self.cursor = 0;
                        self.matched = false;
                    }
                }
            }
            let left = self.current.as_ref().unwrap();
            let buffer = self.buffer.as_ref().unwrap();
            while self.cursor < buffer.len() {
                let right = &buffer[self.cursor];
                self.cursor += 1;
                let matches = match &self.predicate {
                    Some(predicate) => match predicate(left, right) {
                        Ok(matches) => matches,
                        Err(error) => {
                            self.errored = true;
                            return Some(Err(error));
                        }
                    },
                    None => true,
                };
                if matches {
                    self.matched = true;
                    return Some(Ok(Pair::both(left.clone(), right.clone())));
                }
            }
            // The right side is exhausted for this left element.
            let left = self.current.take().unwrap();
            if self.outer && !self.matched {
                return Some(Ok(Pair::left_only(left)));
            }
        }
    }
}

impl<T: Clone + 'static> Queryable<T> {
    /// Pairs every element of this pipeline with every matching element
    /// of `other`. Unmatched left elements emit nothing.
    pub fn inner_join<U, P>(&self, other: &Queryable<U>, predicate: P) -> Queryable<Pair<T, U>>
    where
        U: Clone + 'static,
        P: Fn(&T, &U) -> Result<bool> + Clone + 'static,
    {
        Queryable {
            source: Box::new(NestedLoopJoin::new(
                self.source.clone(),
                other.source.clone(),
                Some(predicate),
                false,
            )),
        }
    }

    /// Like `inner_join`, but a left element with no match is emitted
    /// once with an absent right slot, so every left element appears in
    /// the output at least once.
    pub fn left_join<U, P>(&self, other: &Queryable<U>, predicate: P) -> Queryable<Pair<T, U>>
    where
        U: Clone + 'static,
        P: Fn(&T, &U) -> Result<bool> + Clone + 'static,
    {
        Queryable {
            source: Box::new(NestedLoopJoin::new(
                self.source.clone(),
                other.source.clone(),
                Some(predicate),
                true,
            )),
        }
    }

    /// The mirror of `left_join`: every element of `other` appears at
    /// least once, in `other`'s order, with the pair slots kept in
    /// (this, other) order.
    pub fn right_join<U, P>(&self, other: &Queryable<U>, predicate: P) -> Queryable<Pair<T, U>>
    where
        U: Clone + 'static,
        P: Fn(&T, &U) -> Result<bool> + Clone + 'static,
    {
        let flipped = move |right: &U, left: &T| predicate(left, right);
        let joined = Queryable {
            source: Box::new(NestedLoopJoin::new(
                other.source.clone(),
                self.source.clone(),
                Some(flipped),
                true,
            )),
        };
        joined.select(|pair: &Pair<U, T>| Ok(pair.clone().swap()))
    }

    /// The left join unioned with the right join. Duplicate rows
    /// collapse, the way `union` always collapses them; use
    /// `full_join_all` to keep them.
    pub fn full_join<U, P>(&self, other: &Queryable<U>, predicate: P) -> Queryable<Pair<T, U>>
    where
        T: PartialEq,
        U: Clone + PartialEq + 'static,
        P: Fn(&T, &U) -> Result<bool> + Clone + 'static,
    {
        self.left_join(other, predicate.clone()).union(&self.right_join(other, predicate))
    }

    /// The left join concatenated with the right join, without the
    /// de-duplication pass.
    pub fn full_join_all<U, P>(&self, other: &Queryable<U>, predicate: P) -> Queryable<Pair<T, U>>
    where
        U: Clone + 'static,
        P: Fn(&T, &U) -> Result<bool> + Clone + 'static,
    {
        self.left_join(other, predicate.clone()).union_all(&self.right_join(other, predicate))
    }

    /// The full Cartesian product: every element of this pipeline
    /// paired with every element of `other`, both slots always filled.
    pub fn cross_join<U: Clone + 'static>(&self, other: &Queryable<U>) -> Queryable<Pair<T, U>> {
        Queryable {
            source: Box::new(NestedLoopJoin::new(
                self.source.clone(),
                other.source.clone(),
                None::<NoPredicate<T, U>>,
                false,
            )),
        }
    }
}
