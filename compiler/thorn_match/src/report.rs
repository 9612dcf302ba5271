//! Rendering of analysis findings into printable diagnostics.
//!
//! Findings stay structured ([`PatternProblem`], [`MatchError`]) until the
//! embedding compiler asks for output; this module is the only place
//! messages are worded. Witness patterns are rendered with
//! `Pat::display` so a non-exhaustive match names the concrete values
//! it misses.

use thorn_diagnostic::{Diagnostic, ErrorCode};
use thorn_ir::{PatternProblem, Span, StringInterner};

use crate::MatchError;

/// Render coverage findings for one match site, preserving their order.
pub fn problems_to_diagnostics(
    problems: &[PatternProblem],
    interner: &StringInterner,
) -> Vec<Diagnostic> {
    problems
        .iter()
        .map(|problem| problem_to_diagnostic(problem, interner))
        .collect()
}

fn problem_to_diagnostic(problem: &PatternProblem, interner: &StringInterner) -> Diagnostic {
    match problem {
        PatternProblem::NonExhaustive {
            match_span,
            witnesses,
            truncated,
        } => {
            let listed = witnesses
                .iter()
                .map(|w| format!("`{}`", w.display(interner)))
                .collect::<Vec<_>>()
                .join(", ");
            let mut diagnostic = Diagnostic::error(
                ErrorCode::E3001,
                format!("non-exhaustive match: {listed} not covered"),
                *match_span,
            )
            .with_note("ensure all possible values are matched, or add a wildcard arm");
            if *truncated {
                diagnostic = diagnostic.with_note("more uncovered values exist beyond those listed");
            }
            diagnostic
        }
        PatternProblem::UnreachableArm {
            arm_span,
            arm_index,
            ..
        } => Diagnostic::warning(
            ErrorCode::E3002,
            format!("unreachable match arm (arm {arm_index})"),
            *arm_span,
        )
        .with_note("earlier arms already match every value this arm accepts"),
        PatternProblem::InvalidBindingContext { span, pattern } => Diagnostic::error(
            ErrorCode::E3003,
            format!(
                "refutable pattern `{}` in binding position",
                pattern.display(interner)
            ),
            *span,
        )
        .with_note("a plain binding must match every possible value"),
        PatternProblem::IrrefutableInConditional { span, pattern } => Diagnostic::warning(
            ErrorCode::E3004,
            format!(
                "irrefutable pattern `{}` in conditional binding",
                pattern.display(interner)
            ),
            *span,
        )
        .with_note("this branch is always taken"),
    }
}

/// Render a process error at the match site it aborted.
pub fn error_to_diagnostic(
    error: &MatchError,
    span: Span,
    interner: &StringInterner,
) -> Diagnostic {
    let code = match error {
        MatchError::ArityMismatch { .. } => ErrorCode::E3005,
        MatchError::AmbiguousRest { .. } => ErrorCode::E3006,
        MatchError::MisplacedRest { .. } => ErrorCode::E3007,
        MatchError::OrPatternBindingMismatch { .. } => ErrorCode::E3008,
        MatchError::InvalidRangePattern { .. } => ErrorCode::E3009,
        MatchError::UnknownConstructor { .. } => ErrorCode::E3010,
        MatchError::UnknownField { .. } => ErrorCode::E3011,
        MatchError::DuplicateField { .. } => ErrorCode::E3012,
        MatchError::AnalysisBudgetExceeded => ErrorCode::E3013,
    };
    let span = error_span(error).unwrap_or(span);
    let message = match error {
        MatchError::OrPatternBindingMismatch { name, .. } => format!(
            "or-pattern alternatives bind variable `{}` inconsistently",
            interner.lookup(*name)
        ),
        MatchError::UnknownConstructor { name, .. } => {
            format!("type has no constructor `{}`", interner.lookup(*name))
        }
        MatchError::UnknownField { name, .. } => {
            format!("type has no field `{}`", interner.lookup(*name))
        }
        MatchError::DuplicateField { name, .. } => {
            format!("field `{}` matched more than once", interner.lookup(*name))
        }
        other => other.to_string(),
    };
    Diagnostic::error(code, message, span)
}

fn error_span(error: &MatchError) -> Option<Span> {
    match error {
        MatchError::ArityMismatch { span, .. }
        | MatchError::AmbiguousRest { span }
        | MatchError::MisplacedRest { span }
        | MatchError::OrPatternBindingMismatch { span, .. }
        | MatchError::InvalidRangePattern { span, .. }
        | MatchError::UnknownConstructor { span, .. }
        | MatchError::UnknownField { span, .. }
        | MatchError::DuplicateField { span, .. } => Some(*span),
        MatchError::AnalysisBudgetExceeded => None,
    }
}
