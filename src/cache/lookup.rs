//! Lookup Result Module
//!
//! Outcome of a cache read, with combinators for callers that prefer to chain
//! transformations over matching on presence.

// == Lookup ==
/// Result of a read: the value was served, or it was absent or expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use]
pub enum Lookup<T> {
    Hit(T),
    Miss,
}

impl<T> Lookup<T> {
    pub fn is_hit(&self) -> bool {
        matches!(self, Lookup::Hit(_))
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, Lookup::Miss)
    }

    /// Transforms the value of a hit.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Lookup<U> {
        match self {
            Lookup::Hit(value) => Lookup::Hit(f(value)),
            Lookup::Miss => Lookup::Miss,
        }
    }

    /// Chains a further lookup that may itself miss.
    pub fn and_then<U, F: FnOnce(T) -> Lookup<U>>(self, f: F) -> Lookup<U> {
        match self {
            Lookup::Hit(value) => f(value),
            Lookup::Miss => Lookup::Miss,
        }
    }

    /// Turns a hit into a miss when `predicate` rejects the value.
    pub fn filter<P: FnOnce(&T) -> bool>(self, predicate: P) -> Lookup<T> {
        match self {
            Lookup::Hit(value) if predicate(&value) => Lookup::Hit(value),
            _ => Lookup::Miss,
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Lookup::Hit(value) => value,
            Lookup::Miss => default,
        }
    }

    pub fn unwrap_or_else<F: FnOnce() -> T>(self, f: F) -> T {
        match self {
            Lookup::Hit(value) => value,
            Lookup::Miss => f(),
        }
    }

    pub fn as_ref(&self) -> Lookup<&T> {
        match self {
            Lookup::Hit(value) => Lookup::Hit(value),
            Lookup::Miss => Lookup::Miss,
        }
    }

    pub fn into_option(self) -> Option<T> {
        self.into()
    }
}

impl<T: Clone> Lookup<&T> {
    /// Clones the borrowed value out of the cache.
    pub fn cloned(self) -> Lookup<T> {
        self.map(T::clone)
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Lookup::Hit(value),
            None => Lookup::Miss,
        }
    }
}

impl<T> From<Lookup<T>> for Option<T> {
    fn from(lookup: Lookup<T>) -> Self {
        match lookup {
            Lookup::Hit(value) => Some(value),
            Lookup::Miss => None,
        }
    }
}
