//! Ordered fallback over legacy field aliases.
//!
//! Older rows store the same value under several column names
//! (`pickup_cost` vs `cost_pickup`). Each call site lists its aliases once,
//! in priority order, and the first present value wins.

/// Whether a stored value counts as set.
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for f64 {
    /// Zero is the legacy "not entered" marker for amounts.
    fn is_present(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

impl Presence for i64 {
    fn is_present(&self) -> bool {
        *self != 0
    }
}

impl Presence for &str {
    fn is_present(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl Presence for String {
    fn is_present(&self) -> bool {
        !self.trim().is_empty()
    }
}

/// First candidate that is non-null and present.
pub fn first_non_empty<T, I>(candidates: I) -> Option<T>
where
    T: Presence,
    I: IntoIterator<Item = Option<T>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|value| value.is_present())
}
