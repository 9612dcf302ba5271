//! Structured findings from match analysis.
//!
//! Problems are collected fully (all arms checked) before reporting, so a
//! caller sees every finding for a match site in one pass. Rendering to
//! printable diagnostics happens in `thorn_match::report`.

use crate::{Pat, Span};

/// A finding produced by exhaustiveness, reachability, or refutability
/// analysis of one match site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatternProblem {
    /// Some value of the scrutinee type is matched by no arm. Hard error.
    NonExhaustive {
        match_span: Span,
        /// Concrete example values with no matching arm, up to the
        /// configured bound.
        witnesses: Vec<Pat>,
        /// More witnesses exist beyond the reported ones.
        truncated: bool,
    },
    /// The arm can never match: every value it accepts is claimed by an
    /// earlier arm. Warning.
    UnreachableArm {
        match_span: Span,
        arm_span: Span,
        arm_index: usize,
    },
    /// A refutable pattern in a context that requires matching every value
    /// (a plain binding). Hard error.
    InvalidBindingContext { span: Span, pattern: Pat },
    /// An irrefutable pattern in a context built for conditional matching.
    /// Legal but likely a mistake. Warning.
    IrrefutableInConditional { span: Span, pattern: Pat },
}

impl PatternProblem {
    /// Whether this finding blocks compilation.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            PatternProblem::NonExhaustive { .. } | PatternProblem::InvalidBindingContext { .. }
        )
    }

    /// The primary source location of the finding.
    pub fn span(&self) -> Span {
        match self {
            PatternProblem::NonExhaustive { match_span, .. } => *match_span,
            PatternProblem::UnreachableArm { arm_span, .. } => *arm_span,
            PatternProblem::InvalidBindingContext { span, .. }
            | PatternProblem::IrrefutableInConditional { span, .. } => *span,
        }
    }
}
