/// A single optional configuration slot on a router, controller, or handler.
///
/// Distinguishes a value the layer configured itself ([`Slot::Explicit`]) from
/// one it picked up from an enclosing owner ([`Slot::Inherited`]) and from no
/// value at all ([`Slot::Unset`]). An unset slot is absent, which is not the
/// same thing as an explicitly configured empty collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<T> {
    Unset,
    Inherited(T),
    Explicit(T),
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot::Unset
    }
}

impl<T> Slot<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Slot::Unset)
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, Slot::Explicit(_))
    }

    pub fn is_inherited(&self) -> bool {
        matches!(self, Slot::Inherited(_))
    }

    /// The carried value, whether explicit or inherited.
    pub fn value(&self) -> Option<&T> {
        match self {
            Slot::Unset => None,
            Slot::Inherited(value) | Slot::Explicit(value) => Some(value),
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Slot::Unset => None,
            Slot::Inherited(value) | Slot::Explicit(value) => Some(value),
        }
    }

    pub fn as_ref(&self) -> Slot<&T> {
        match self {
            Slot::Unset => Slot::Unset,
            Slot::Inherited(value) => Slot::Inherited(value),
            Slot::Explicit(value) => Slot::Explicit(value),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Slot<U> {
        match self {
            Slot::Unset => Slot::Unset,
            Slot::Inherited(value) => Slot::Inherited(f(value)),
            Slot::Explicit(value) => Slot::Explicit(f(value)),
        }
    }

    /// Re-tag a value seen from an inner layer: anything set becomes inherited.
    pub fn inherited(self) -> Slot<T> {
        match self {
            Slot::Unset => Slot::Unset,
            Slot::Inherited(value) | Slot::Explicit(value) => Slot::Inherited(value),
        }
    }

    /// Keep this slot if it carries a value, otherwise inherit from `outer`.
    pub fn or_inherit(self, outer: Slot<T>) -> Slot<T> {
        match self {
            Slot::Unset => outer.inherited(),
            set => set,
        }
    }

    /// Mutable access to an explicit value, creating it with `init` first if
    /// this slot was unset or inherited.
    pub fn explicit_or_insert_with<F: FnOnce() -> T>(&mut self, init: F) -> &mut T {
        if !self.is_explicit() {
            *self = Slot::Explicit(init());
        }
        match self {
            Slot::Explicit(value) => value,
            Slot::Unset | Slot::Inherited(_) => unreachable!("slot was just made explicit"),
        }
    }
}

impl<T> From<Option<T>> for Slot<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Slot::Unset, Slot::Explicit)
    }
}
