//! Whole-match analysis: normalize, check coverage, compile.
//!
//! `analyze` is the one entry point the embedding compiler calls per
//! match site. It runs the full pipeline over a [`MatchSpec`]:
//!
//! 1. Normalize every arm pattern (any failure aborts the site).
//! 2. Exhaustiveness over the unguarded arms. Guarded arms are excluded
//!    from coverage entirely: a guard may fail at runtime, so it can
//!    never be credited with covering anything.
//! 3. Reachability of each arm against the unguarded arms above it.
//! 4. Decision tree compilation, guards and all.
//!
//! Coverage findings do not stop compilation — a non-exhaustive match
//! still gets a tree (with reachable `Fail` nodes) so downstream stages
//! keep working while diagnostics are reported.

use tracing::debug;

use thorn_ir::{
    DecisionTree, MatchSpec, Pat, PatternMatrix, PatternProblem, PatternRow, TypeResolver,
};

use crate::compile::compile;
use crate::normalize::NormalizeCtx;
use crate::usefulness::{AnalysisConfig, UsefulnessCtx};
use crate::MatchError;

/// Everything the analysis produces for one match site.
#[derive(Clone, Debug)]
pub struct MatchAnalysis {
    /// Compiled decision tree, in arm-priority order.
    pub tree: DecisionTree,
    /// Coverage findings, errors before warnings within the site.
    pub problems: Vec<PatternProblem>,
}

/// Analyze one match site end to end.
pub fn analyze(
    spec: &MatchSpec<'_>,
    resolver: &dyn TypeResolver,
    config: &AnalysisConfig,
) -> Result<MatchAnalysis, MatchError> {
    debug!(arms = spec.arms.len(), "analyzing match site");

    let normalizer = NormalizeCtx::new(spec.arena, resolver);
    let mut pats = Vec::with_capacity(spec.arms.len());
    for arm in spec.arms {
        pats.push(normalizer.normalize(arm.pattern, spec.scrutinee_ty)?);
    }

    let mut problems = Vec::new();
    let mut ctx = UsefulnessCtx::new(resolver, config);

    let unguarded: Vec<Pat> = spec
        .arms
        .iter()
        .zip(&pats)
        .filter(|(arm, _)| arm.guard.is_none())
        .map(|(_, pat)| pat.clone())
        .collect();
    let report = ctx.check_exhaustiveness(&unguarded, spec.scrutinee_ty)?;
    if !report.is_exhaustive() {
        problems.push(PatternProblem::NonExhaustive {
            match_span: spec.span,
            witnesses: report.witnesses,
            truncated: report.truncated,
        });
    }

    // An arm is unreachable when the unguarded arms above it already
    // claim every value it accepts. A guarded arm above proves nothing.
    let mut earlier: Vec<Pat> = Vec::new();
    for (arm_index, (arm, pat)) in spec.arms.iter().zip(&pats).enumerate() {
        if !ctx.is_useful(&earlier, pat, spec.scrutinee_ty)? {
            problems.push(PatternProblem::UnreachableArm {
                match_span: spec.span,
                arm_span: arm.span,
                arm_index,
            });
        }
        if arm.guard.is_none() {
            earlier.push(pat.clone());
        }
    }

    let matrix: PatternMatrix = spec
        .arms
        .iter()
        .zip(pats)
        .enumerate()
        .map(|(arm_index, (arm, pat))| PatternRow::new(pat, arm_index, arm.guard))
        .collect();
    let tree = compile(matrix, vec![Vec::new()]);

    Ok(MatchAnalysis { tree, problems })
}
