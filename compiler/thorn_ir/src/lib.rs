//! Shared pattern IR for the Thorn compiler.
//!
//! This crate holds the data model consumed and produced by `thorn_match`:
//!
//! - Surface patterns as handed over by the parser/type checker
//!   ([`PatternArena`], [`RawPattern`]) — arena-allocated, may still contain
//!   `..` rest markers and record shorthand.
//! - Canonical patterns ([`Pat`]) — self-contained, sugar-free, the
//!   representation the matrix algorithms operate on.
//! - Type descriptors ([`TypeDescriptor`]) describing the constructor space
//!   of a scrutinee, looked up through the read-only [`TypeResolver`]
//!   capability.
//! - Compiled decision trees ([`DecisionTree`]) for the backend.
//! - Structured findings ([`PatternProblem`]) for the diagnostic printer.
//!
//! # Pipeline Position
//!
//! ```text
//! Parse → Type Check → **thorn_match** (normalize / check / compile) → backend
//!                        └── everything here is its vocabulary
//! ```

mod arena;
mod ids;
mod interner;
mod name;
mod pat;
mod problem;
mod span;
mod tree;
mod types;

pub use arena::{PatId, PatternArena, RawPattern};
pub use ids::{BodyId, GuardId};
pub use interner::StringInterner;
pub use name::Name;
pub use pat::{Lit, Pat};
pub use problem::PatternProblem;
pub use span::Span;
pub use tree::{
    DecisionTree, PathInstruction, PatternMatrix, PatternRow, ScrutineePath, TestKind, TestValue,
};
pub use types::{Constructor, TypeDescriptor, TypeId, TypeResolver, TypeTable};

/// One arm of a match expression: a surface pattern plus opaque guard and
/// body references. Guards are never evaluated or inspected by this core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchArm {
    /// The arm's pattern, an index into the [`PatternArena`].
    pub pattern: PatId,
    /// Opaque reference to the guard predicate, if any.
    pub guard: Option<GuardId>,
    /// Opaque reference to the arm body.
    pub body: BodyId,
    /// Source span of the arm (for diagnostics).
    pub span: Span,
}

/// A complete match site: the scrutinee's type, its arms, and the arena the
/// arm patterns live in. Constructed once per match/conditional-binding site
/// and consumed immutably by `thorn_match`.
#[derive(Clone, Copy, Debug)]
pub struct MatchSpec<'a> {
    /// Arena holding the arm patterns.
    pub arena: &'a PatternArena,
    /// Resolved type of the scrutinee.
    pub scrutinee_ty: TypeId,
    /// The arms, in source order.
    pub arms: &'a [MatchArm],
    /// Span of the whole match expression.
    pub span: Span,
}
