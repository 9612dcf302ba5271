//! Refutability classification for patterns outside `match`.
//!
//! A pattern is *irrefutable* when it matches every value of its type —
//! equivalently, when it is exhaustive as a one-arm match. Plain binding
//! contexts (`let`) demand irrefutable patterns; conditional contexts
//! (`if let`, `while let`) exist for refutable ones and warn when given a
//! pattern that always matches.

use thorn_ir::{Pat, PatternProblem, Span, TypeId, TypeResolver};

use crate::usefulness::{AnalysisConfig, UsefulnessCtx};
use crate::MatchError;

/// Whether a pattern can fail to match a value of its type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Refutability {
    /// Matches every value of the type.
    Irrefutable,
    /// Some value of the type is not matched.
    Refutable,
}

/// Classify a single normalized pattern against its scrutinee type.
pub fn classify(
    pat: &Pat,
    ty: TypeId,
    resolver: &dyn TypeResolver,
    config: &AnalysisConfig,
) -> Result<Refutability, MatchError> {
    let mut ctx = UsefulnessCtx::new(resolver, config);
    let report = ctx.check_exhaustiveness(std::slice::from_ref(pat), ty)?;
    Ok(if report.is_exhaustive() {
        Refutability::Irrefutable
    } else {
        Refutability::Refutable
    })
}

/// Check a pattern used in a plain binding context (`let`). Refutable
/// patterns are rejected there.
pub fn check_binding_context(
    pat: &Pat,
    ty: TypeId,
    span: Span,
    resolver: &dyn TypeResolver,
    config: &AnalysisConfig,
) -> Result<Option<PatternProblem>, MatchError> {
    Ok(match classify(pat, ty, resolver, config)? {
        Refutability::Irrefutable => None,
        Refutability::Refutable => Some(PatternProblem::InvalidBindingContext {
            span,
            pattern: pat.clone(),
        }),
    })
}

/// Check a pattern used in a conditional context (`if let`, `while let`).
/// An irrefutable pattern there always takes the branch, which is legal
/// but almost certainly not what was meant.
pub fn check_conditional_context(
    pat: &Pat,
    ty: TypeId,
    span: Span,
    resolver: &dyn TypeResolver,
    config: &AnalysisConfig,
) -> Result<Option<PatternProblem>, MatchError> {
    Ok(match classify(pat, ty, resolver, config)? {
        Refutability::Refutable => None,
        Refutability::Irrefutable => Some(PatternProblem::IrrefutableInConditional {
            span,
            pattern: pat.clone(),
        }),
    })
}
