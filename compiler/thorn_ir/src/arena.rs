//! Arena-allocated surface patterns.
//!
//! Patterns arrive from the parser/type checker as a tree of [`RawPattern`]
//! nodes addressed by [`PatId`] indices into a [`PatternArena`]. Indices
//! instead of nested ownership keep recursive types (lists, trees) free of
//! self-referential ownership: recursion is bounded by pattern depth, never
//! by type depth.
//!
//! Surface patterns may still contain sugar — `..` rest markers, record
//! field shorthand — which `thorn_match::normalize` eliminates.

use crate::{Lit, Name, Span};

/// Index of a pattern node in a [`PatternArena`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(transparent)]
pub struct PatId(u32);

impl PatId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        PatId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A surface pattern node, as produced by the parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawPattern {
    /// `_` — matches anything, binds nothing.
    Wildcard,
    /// `x` or `x @ sub` — matches via `sub` (anything when absent) and
    /// binds the whole matched value to `name`.
    Binding { name: Name, sub: Option<PatId> },
    /// A scalar literal.
    Literal(Lit),
    /// `lo..hi` / `lo..=hi` over an integer-like domain.
    Range { lo: i64, hi: i64, inclusive: bool },
    /// `Name(args…)` — a constructor of a finite (sum) type.
    Ctor { name: Name, args: Vec<PatId> },
    /// `(a, b, …)`.
    Tuple(Vec<PatId>),
    /// `{ field: pat, shorthand, .. }`. A `None` sub-pattern is field
    /// shorthand (binds the field under its own name); `rest` records a
    /// trailing `..`.
    Record {
        fields: Vec<(Name, Option<PatId>)>,
        rest: bool,
    },
    /// `a | b | …`.
    Or(Vec<PatId>),
    /// Positional `..` marker inside a `Ctor` or `Tuple` argument list.
    /// Eliminated during normalization; at most one per sibling list.
    Rest,
}

/// Arena of surface pattern nodes with parallel span storage.
#[derive(Clone, Debug, Default)]
pub struct PatternArena {
    kinds: Vec<RawPattern>,
    spans: Vec<Span>,
}

impl PatternArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a pattern node, returning its id.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` nodes are allocated.
    pub fn alloc(&mut self, kind: RawPattern, span: Span) -> PatId {
        let id = u32::try_from(self.kinds.len())
            .unwrap_or_else(|_| panic!("pattern arena exceeded capacity: {}", self.kinds.len()));
        self.kinds.push(kind);
        self.spans.push(span);
        PatId::from_raw(id)
    }

    /// Get the pattern node for an id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this arena.
    pub fn kind(&self, id: PatId) -> &RawPattern {
        &self.kinds[id.raw() as usize]
    }

    /// Get the span for an id.
    pub fn span(&self, id: PatId) -> Span {
        self.spans.get(id.raw() as usize).copied().unwrap_or(Span::DUMMY)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
