//! Explicit "provided vs. absent" wrapper for partial updates.

/// A field of a partial update
///
/// `Absent` leaves the stored value untouched; `Set` replaces it. Front-ends
/// normalize their own optional-field conventions (field presence or
/// nullability) into this type before anything reaches a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// The field was not provided
    Absent,
    /// The field was provided with this value
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    /// Whether a value was provided
    pub fn is_set(&self) -> bool {
        matches!(self, Patch::Set(_))
    }

    /// Borrow the provided value, if any
    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Absent => Patch::Absent,
            Patch::Set(value) => Patch::Set(value),
        }
    }

    /// Provided value as an `Option`
    pub fn into_option(self) -> Option<T> {
        match self {
            Patch::Absent => None,
            Patch::Set(value) => Some(value),
        }
    }

    /// Overwrite `target` when a value was provided
    pub fn apply_to(self, target: &mut T) {
        if let Patch::Set(value) = self {
            *target = value;
        }
    }

    /// Map the provided value
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Patch<U> {
        match self {
            Patch::Absent => Patch::Absent,
            Patch::Set(value) => Patch::Set(f(value)),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Set(value),
            None => Patch::Absent,
        }
    }
}
