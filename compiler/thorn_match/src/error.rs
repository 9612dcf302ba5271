//! Process errors of match analysis.
//!
//! These abort analysis of the match site they occur in — no partial tree
//! is produced. Coverage findings (non-exhaustiveness, unreachable arms)
//! are not errors of this kind; they are collected as
//! [`thorn_ir::PatternProblem`]s so the caller sees all of them in one pass.

use thiserror::Error;
use thorn_ir::{Name, Span};

/// A hard failure during normalization or analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// Explicit sub-pattern count conflicts with the descriptor's arity.
    #[error("pattern has {found} sub-patterns but the type declares {expected}")]
    ArityMismatch {
        expected: usize,
        found: usize,
        span: Span,
    },

    /// More than one `..` marker in the same sibling list.
    #[error("more than one `..` in the same pattern list")]
    AmbiguousRest { span: Span },

    /// A `..` marker outside a positional sibling list.
    #[error("`..` is only allowed inside a constructor, tuple, or record pattern")]
    MisplacedRest { span: Span },

    /// Or-pattern alternatives bind different name sets or types.
    #[error("or-pattern alternatives bind variable {name:?} inconsistently")]
    OrPatternBindingMismatch { name: Name, span: Span },

    /// Reversed (`lo > hi`) or empty (`lo..lo`) range pattern.
    #[error("range pattern {lo}..{hi} is reversed or empty")]
    InvalidRangePattern { lo: i64, hi: i64, span: Span },

    /// Constructor name not declared by the scrutinee's type.
    #[error("type has no constructor {name:?}")]
    UnknownConstructor { name: Name, span: Span },

    /// Record field not declared by the scrutinee's type.
    #[error("type has no field {name:?}")]
    UnknownField { name: Name, span: Span },

    /// Record field matched twice in one pattern.
    #[error("field {name:?} matched more than once")]
    DuplicateField { name: Name, span: Span },

    /// The externally configured step budget ran out mid-analysis.
    /// Distinct from the match being genuinely non-exhaustive.
    #[error("pattern analysis exceeded its step budget")]
    AnalysisBudgetExceeded,
}
