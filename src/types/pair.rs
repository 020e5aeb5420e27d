/// One side of a joined pair.
///
/// `Absent` marks the padded side of an outer join row. It is a marker
/// distinct from any element value, so a legitimate null-like element
/// (e.g. a `None` flowing through a pipeline of options) never collides
/// with it. Equality and hashing are structural, which lets joined rows
/// flow through the set operators like any other element.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Slot<T> {
    Filled(T),
    Absent,
}

impl<T> Slot<T> {
    /// Returns the contained value, or `None` for an absent slot.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Filled(value) => Some(value),
            Self::Absent => None,
        }
    }

    /// Consumes the slot, returning the contained value if any.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Filled(value) => Some(value),
            Self::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// A two-slot join row. Inner and cross joins fill both slots; outer
/// joins leave the unmatched side absent.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pair<L, R> {
    pub left: Slot<L>,
    pub right: Slot<R>,
}

impl<L, R> Pair<L, R> {
    /// A fully matched row.
    pub fn both(left: L, right: R) -> Self {
        Self { left: Slot::Filled(left), right: Slot::Filled(right) }
    }

    /// A left row with no right match.
    pub fn left_only(left: L) -> Self {
        Self { left: Slot::Filled(left), right: Slot::Absent }
    }

    /// A right row with no left match.
    pub fn right_only(right: R) -> Self {
        Self { left: Slot::Absent, right: Slot::Filled(right) }
    }

    /// Swaps the two slots, e.g. to restore slot order after a join ran
    /// with its inputs flipped.
    pub fn swap(self) -> Pair<R, L> {
        Pair { left: self.right, right: self.left }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_restores_slot_order() {
        let pair = Pair::both(1, "a").swap();
        assert_eq!(pair, Pair::both("a", 1));

        let padded: Pair<i32, &str> = Pair::left_only("b").swap();
        assert_eq!(padded, Pair::right_only("b"));
    }

    #[test]
    fn absent_is_not_a_null_valued_element() {
        // A pipeline of options can legitimately carry a None element;
        // the absent marker must not compare equal to it.
        let null_element: Pair<Option<i32>, i32> = Pair::both(None, 1);
        let unmatched: Pair<Option<i32>, i32> = Pair { left: Slot::Absent, right: Slot::Filled(1) };
        assert_ne!(null_element, unmatched);
        assert!(!null_element.left.is_absent());
        assert!(unmatched.left.is_absent());
    }

    #[test]
    fn slot_accessors() {
        assert_eq!(Slot::Filled(3).value(), Some(&3));
        assert_eq!(Slot::<i32>::Absent.value(), None);
        assert_eq!(Slot::Filled("x").into_value(), Some("x"));
    }
}
