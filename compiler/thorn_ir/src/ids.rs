//! Opaque references to guard predicates and arm bodies.
//!
//! The pattern core never evaluates or inspects these — they are indices
//! into whatever expression store the embedding compiler uses, threaded
//! through to the decision tree unchanged.

use std::fmt;

/// Opaque reference to a guard predicate expression.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct GuardId(u32);

impl GuardId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        GuardId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for GuardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GuardId({})", self.0)
    }
}

/// Opaque reference to an arm body expression.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct BodyId(u32);

impl BodyId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        BodyId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BodyId({})", self.0)
    }
}
