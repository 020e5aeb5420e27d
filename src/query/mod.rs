//! The in-memory query pipeline and its operators.
//! Iterator plumbing follows Erik Grinaker's toydb
//! (https://github.com/erikgrinaker/toydb), covered under Apache license.
mod aggregate;
mod join;
mod queryable;
mod set;
mod source;
mod transform;

#[cfg(test)]
mod tests;

pub use aggregate::Aggregator;
pub use queryable::{ElementIterator, Elements, Queryable};
pub use transform::{Direction, Order};
