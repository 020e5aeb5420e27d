//! Set algebra operators, keyed on value equality.
//!
//! Equality is structural (`PartialEq`), never identity, and nothing
//! here imposes a `Hash` or `Ord` bound: membership checks are plain
//! vector scans, O(n·m) in the worst case.

use crate::common::Result;
use crate::query::{Elements, Queryable};

/// The de-duplication operator. Streams elements, keeping the first
/// occurrence of each distinct value in encounter order.
#[derive(Clone)]
pub(crate) struct Distinct<T> {
    pub(crate) source: Elements<T>,
    pub(crate) seen: Vec<T>,
}

impl<T: Clone + PartialEq + 'static> Iterator for Distinct<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.source.next()? {
                Err(error) => return Some(Err(error)),
                Ok(element) if self.seen.contains(&element) => continue,
                Ok(element) => {
                    self.seen.push(element.clone());
                    return Some(Ok(element));
                }
            }
        }
    }
}

/// Whether a membership operator keeps or drops the elements found in
/// the other pipeline.
#[derive(Clone, Copy)]
pub(crate) enum Membership {
    Keep,
    Drop,
}

/// The intersect/minus operator. Buffers the other pipeline on first
/// pull, then streams this pipeline's elements, keeping or dropping
/// those with an equal element in the buffer. The output is distinct,
/// in this pipeline's encounter order.
#[derive(Clone)]
pub(crate) struct MembershipFilter<T> {
    pub(crate) source: Elements<T>,
    pub(crate) other: Elements<T>,
    pub(crate) membership: Membership,
    pub(crate) buffer: Option<Vec<T>>,
    pub(crate) seen: Vec<T>,
    pub(crate) errored: bool,
}

impl<T: Clone + PartialEq + 'static> Iterator for MembershipFilter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.errored {
            return None;
        }
        if self.buffer.is_none() {
            let mut buffer = Vec::new();
            for element in &mut self.other {
                match element {
                    Ok(element) => buffer.push(element),
                    Err(error) => {
                        self.errored = true;
                        return Some(Err(error));
                    }
                }
            }
            self.buffer = Some(buffer);
        }
        loop {
            match self.source.next()? {
                Err(error) => return Some(Err(error)),
                Ok(element) => {
                    let matched = self.buffer.as_ref().unwrap().contains(&element);
                    let keep = match self.membership {
                        Membership::Keep => matched,
                        Membership::Drop => !matched,
                    };
                    if keep && !self.seen.contains(&element) {
                        self.seen.push(element.clone());
                        return Some(Ok(element));
                    }
                }
            }
        }
    }
}

impl<T: Clone + 'static> Queryable<T> {
    /// Emits this pipeline's elements in full, then the other's.
    pub fn union_all(&self, other: &Queryable<T>) -> Self {
        Self { source: Box::new(self.source.clone().chain(other.source.clone())) }
    }
}

impl<T: Clone + PartialEq + 'static> Queryable<T> {
    /// De-duplicates the pipeline: the first occurrence of each
    /// distinct value is kept, in encounter order.
    pub fn distinct(&self) -> Self {
        Self { source: Box::new(Distinct { source: self.source.clone(), seen: Vec::new() }) }
    }

    /// Emits the distinct elements of both pipelines: `union_all`
    /// followed by `distinct`.
    pub fn union(&self, other: &Queryable<T>) -> Self {
        self.union_all(other).distinct()
    }

    /// Keeps the elements that equal at least one element of `other`.
    /// The result is distinct, in this pipeline's encounter order.
    pub fn intersect(&self, other: &Queryable<T>) -> Self {
        self.membership(other, Membership::Keep)
    }

    /// Keeps the elements that equal no element of `other`. The result
    /// is distinct, in this pipeline's encounter order.
    pub fn minus(&self, other: &Queryable<T>) -> Self {
        self.membership(other, Membership::Drop)
    }

    fn membership(&self, other: &Queryable<T>, membership: Membership) -> Self {
        Self {
            source: Box::new(MembershipFilter {
                source: self.source.clone(),
                other: other.source.clone(),
                membership,
                buffer: None,
                seen: Vec::new(),
                errored: false,
            }),
        }
    }
}
