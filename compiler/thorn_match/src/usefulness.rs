//! Usefulness and exhaustiveness analysis over canonical patterns.
//!
//! Implements the matrix-based usefulness recursion from Maranget,
//! "Warnings for pattern matching" (2007). A pattern vector is *useful*
//! against a matrix if some value matches the vector and no row of the
//! matrix. Exhaustiveness is usefulness of the all-wildcard vector against
//! the matrix of unguarded arms; arm reachability is usefulness of the
//! arm's pattern against the rows above it.
//!
//! Two recursions share the specialization machinery:
//!
//! - a boolean one, memoized per subproblem, used for reachability and
//!   refutability queries;
//! - a witness-collecting one, used for exhaustiveness, which builds
//!   concrete uncovered example patterns bottom-up.
//!
//! Integer columns are handled by splitting the column's domain at every
//! range boundary the matrix mentions and treating each piece as one
//! constructor. Bound arithmetic is done in `i128` so `i64::MAX` domains
//! cannot overflow.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use thorn_ir::{Constructor, Lit, Name, Pat, TypeDescriptor, TypeId, TypeResolver};

use crate::MatchError;

/// Resource limits for one analysis run.
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    /// Upper bound on recursion steps across the whole match site.
    /// `None` means unbounded.
    pub step_budget: Option<u64>,
    /// Maximum number of witnesses reported for a non-exhaustive match.
    pub max_witnesses: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            step_budget: None,
            max_witnesses: 5,
        }
    }
}

/// Outcome of an exhaustiveness query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExhaustivenessReport {
    /// Example patterns no arm covers. Empty means exhaustive.
    pub witnesses: Vec<Pat>,
    /// True when more witnesses existed than the configured cap.
    pub truncated: bool,
}

impl ExhaustivenessReport {
    pub fn is_exhaustive(&self) -> bool {
        self.witnesses.is_empty()
    }
}

/// A pattern matrix: rows of equal width, one column per scrutinee slot.
type Matrix = Vec<Vec<Pat>>;

/// A boolean subproblem, keyed structurally so distinct subproblems can
/// never share a cache slot.
type MemoKey = (Matrix, Vec<Pat>, Vec<TypeId>);

/// Analysis state for one match site: the descriptor lookup, the step
/// budget countdown, and the boolean-query memo table.
///
/// The memo caches only the boolean recursion. The witness recursion runs
/// uncached so every piece of a split contributes its examples.
pub struct UsefulnessCtx<'a> {
    resolver: &'a dyn TypeResolver,
    steps: Option<u64>,
    max_witnesses: usize,
    memo: FxHashMap<MemoKey, bool>,
}

impl<'a> UsefulnessCtx<'a> {
    pub fn new(resolver: &'a dyn TypeResolver, config: &AnalysisConfig) -> Self {
        Self {
            resolver,
            steps: config.step_budget,
            max_witnesses: config.max_witnesses,
            memo: FxHashMap::default(),
        }
    }

    /// Check whether `arms` (unguarded, in source order) cover every value
    /// of `scrutinee`, collecting uncovered examples if not.
    pub fn check_exhaustiveness(
        &mut self,
        arms: &[Pat],
        scrutinee: TypeId,
    ) -> Result<ExhaustivenessReport, MatchError> {
        trace!(arms = arms.len(), "exhaustiveness query");
        let matrix: Matrix = arms.iter().map(|p| vec![p.clone()]).collect();
        // A non-exhaustive match always reports at least one witness,
        // whatever the configured cap.
        let cap = self.max_witnesses.max(1);
        let mut stacks = self.witnesses(&matrix, &[scrutinee], cap + 1)?;
        let truncated = stacks.len() > cap;
        stacks.truncate(cap);
        let witnesses = stacks
            .into_iter()
            .map(|stack| stack.into_iter().next().unwrap_or(Pat::Wildcard))
            .collect();
        Ok(ExhaustivenessReport {
            witnesses,
            truncated,
        })
    }

    /// Whether `pat` matches some value that none of `earlier` matches.
    pub fn is_useful(
        &mut self,
        earlier: &[Pat],
        pat: &Pat,
        scrutinee: TypeId,
    ) -> Result<bool, MatchError> {
        let matrix: Matrix = earlier.iter().map(|p| vec![p.clone()]).collect();
        self.useful(&matrix, &[pat.clone()], &[scrutinee])
    }

    fn step(&mut self) -> Result<(), MatchError> {
        if let Some(budget) = &mut self.steps {
            if *budget == 0 {
                return Err(MatchError::AnalysisBudgetExceeded);
            }
            *budget -= 1;
        }
        Ok(())
    }

    // --- boolean recursion ---

    fn useful(
        &mut self,
        matrix: &[Vec<Pat>],
        candidate: &[Pat],
        tys: &[TypeId],
    ) -> Result<bool, MatchError> {
        self.step()?;

        let Some((cand_head, cand_tail)) = candidate.split_first() else {
            // No columns left: useful iff no row survived.
            return Ok(matrix.is_empty());
        };
        let cand_head = peel(cand_head).clone();
        let (&head_ty, tail_tys) = match tys.split_first() {
            Some(split) => split,
            None => return Ok(matrix.is_empty()),
        };

        // An or-pattern candidate is useful iff any alternative is.
        if let Pat::Or(alts) = &cand_head {
            for alt in alts {
                let mut with_alt = Vec::with_capacity(candidate.len());
                with_alt.push(alt.clone());
                with_alt.extend_from_slice(cand_tail);
                if self.useful(matrix, &with_alt, tys)? {
                    return Ok(true);
                }
            }
            return Ok(false);
        }

        let key: MemoKey = (matrix.to_vec(), candidate.to_vec(), tys.to_vec());
        if let Some(&cached) = self.memo.get(&key) {
            return Ok(cached);
        }

        let matrix = expand_heads(matrix);
        let resolver = self.resolver;
        let result = match resolver.descriptor(head_ty) {
            TypeDescriptor::Finite(ctors) => {
                self.useful_finite(&matrix, &cand_head, cand_tail, ctors, tail_tys)?
            }
            TypeDescriptor::Tuple(elem_tys) => {
                let fields = match &cand_head {
                    Pat::Tuple(elems) => elems.clone(),
                    _ => vec![Pat::Wildcard; elem_tys.len()],
                };
                let spec = specialize_product(&matrix, elem_tys.len());
                let mut sub_candidate = fields;
                sub_candidate.extend_from_slice(cand_tail);
                let sub_tys = concat_tys(elem_tys, tail_tys);
                self.useful(&spec, &sub_candidate, &sub_tys)?
            }
            TypeDescriptor::Record(declared) => {
                let fields = match &cand_head {
                    Pat::Record { fields } => fields.iter().map(|(_, p)| p.clone()).collect(),
                    _ => vec![Pat::Wildcard; declared.len()],
                };
                let spec = specialize_product(&matrix, declared.len());
                let mut sub_candidate = fields;
                sub_candidate.extend_from_slice(cand_tail);
                let field_tys: Vec<TypeId> = declared.iter().map(|&(_, ty)| ty).collect();
                let sub_tys = concat_tys(&field_tys, tail_tys);
                self.useful(&spec, &sub_candidate, &sub_tys)?
            }
            TypeDescriptor::IntegerLike { .. } => {
                let Some(domain) = resolver.descriptor(head_ty).integer_domain() else {
                    return Ok(false);
                };
                self.useful_integer(&matrix, &cand_head, cand_tail, domain, tail_tys)?
            }
            TypeDescriptor::Opaque => {
                self.useful_opaque(&matrix, &cand_head, cand_tail, tail_tys)?
            }
        };

        self.memo.insert(key, result);
        Ok(result)
    }

    fn useful_finite(
        &mut self,
        matrix: &[Vec<Pat>],
        cand_head: &Pat,
        cand_tail: &[Pat],
        ctors: &[Constructor],
        tail_tys: &[TypeId],
    ) -> Result<bool, MatchError> {
        match cand_head {
            Pat::Variant { index, fields, .. } => {
                let Some(ctor) = ctors.get(*index as usize) else {
                    return Ok(false);
                };
                let spec = specialize_variant(matrix, *index, ctor.arity());
                let mut sub_candidate = fields.clone();
                sub_candidate.extend_from_slice(cand_tail);
                let sub_tys = concat_tys(&ctor.fields, tail_tys);
                self.useful(&spec, &sub_candidate, &sub_tys)
            }
            _ => {
                let present = present_tags(matrix);
                let complete = (0..ctors.len()).all(|i| present.contains(&tag(i)));
                if complete {
                    for (i, ctor) in ctors.iter().enumerate() {
                        let spec = specialize_variant(matrix, tag(i), ctor.arity());
                        let mut sub_candidate = vec![Pat::Wildcard; ctor.arity()];
                        sub_candidate.extend_from_slice(cand_tail);
                        let sub_tys = concat_tys(&ctor.fields, tail_tys);
                        if self.useful(&spec, &sub_candidate, &sub_tys)? {
                            return Ok(true);
                        }
                    }
                    Ok(false)
                } else {
                    // Some tag is absent from the column, so a wildcard
                    // candidate falls through to the default matrix.
                    let spec = default_matrix(matrix);
                    self.useful(&spec, cand_tail, tail_tys)
                }
            }
        }
    }

    fn useful_integer(
        &mut self,
        matrix: &[Vec<Pat>],
        cand_head: &Pat,
        cand_tail: &[Pat],
        domain: (i64, i64),
        tail_tys: &[TypeId],
    ) -> Result<bool, MatchError> {
        let full = (i128::from(domain.0), i128::from(domain.1));
        let cand_range = match int_range(cand_head) {
            Some(range) => range,
            None if matches!(cand_head, Pat::Wildcard) => full,
            None => return Ok(false),
        };
        let Some(domain) = intersect(cand_range, full) else {
            return Ok(false);
        };

        let heads = clipped_int_heads(matrix, domain);
        for piece in split_pieces(domain, &heads) {
            let spec = specialize_integer(matrix, piece);
            if self.useful(&spec, cand_tail, tail_tys)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn useful_opaque(
        &mut self,
        matrix: &[Vec<Pat>],
        cand_head: &Pat,
        cand_tail: &[Pat],
        tail_tys: &[TypeId],
    ) -> Result<bool, MatchError> {
        match cand_head {
            // Opaque literal columns are never complete: a wildcard
            // candidate always has the default matrix to fall through to.
            Pat::Wildcard => {
                let spec = default_matrix(matrix);
                self.useful(&spec, cand_tail, tail_tys)
            }
            constructed => {
                let spec = specialize_equal(matrix, constructed);
                self.useful(&spec, cand_tail, tail_tys)
            }
        }
    }

    // --- witness recursion ---

    /// Pattern stacks (one entry per column of `tys`) that are useful
    /// against `matrix`, at most `limit` of them.
    fn witnesses(
        &mut self,
        matrix: &[Vec<Pat>],
        tys: &[TypeId],
        limit: usize,
    ) -> Result<Vec<Vec<Pat>>, MatchError> {
        self.step()?;
        if limit == 0 {
            return Ok(Vec::new());
        }
        let Some((&head_ty, tail_tys)) = tys.split_first() else {
            return Ok(if matrix.is_empty() {
                vec![Vec::new()]
            } else {
                Vec::new()
            });
        };

        let matrix = expand_heads(matrix);
        let resolver = self.resolver;
        match resolver.descriptor(head_ty) {
            TypeDescriptor::Finite(ctors) => {
                self.witnesses_finite(&matrix, ctors, tail_tys, limit)
            }
            TypeDescriptor::Tuple(elem_tys) => {
                let spec = specialize_product(&matrix, elem_tys.len());
                let sub_tys = concat_tys(elem_tys, tail_tys);
                let subs = self.witnesses(&spec, &sub_tys, limit)?;
                Ok(subs
                    .into_iter()
                    .map(|stack| rebuild(stack, elem_tys.len(), Pat::Tuple))
                    .collect())
            }
            TypeDescriptor::Record(declared) => {
                let names: Vec<Name> = declared.iter().map(|&(n, _)| n).collect();
                let field_tys: Vec<TypeId> = declared.iter().map(|&(_, ty)| ty).collect();
                let spec = specialize_product(&matrix, field_tys.len());
                let sub_tys = concat_tys(&field_tys, tail_tys);
                let subs = self.witnesses(&spec, &sub_tys, limit)?;
                Ok(subs
                    .into_iter()
                    .map(|stack| {
                        rebuild(stack, names.len(), |fields| Pat::Record {
                            fields: names.iter().copied().zip(fields).collect(),
                        })
                    })
                    .collect())
            }
            TypeDescriptor::IntegerLike { .. } => {
                let Some(domain) = resolver.descriptor(head_ty).integer_domain() else {
                    return Ok(Vec::new());
                };
                let domain = (i128::from(domain.0), i128::from(domain.1));
                self.witnesses_integer(&matrix, domain, tail_tys, limit)
            }
            TypeDescriptor::Opaque => {
                let spec = default_matrix(&matrix);
                let subs = self.witnesses(&spec, tail_tys, limit)?;
                Ok(subs
                    .into_iter()
                    .map(|mut stack| {
                        stack.insert(0, Pat::Wildcard);
                        stack
                    })
                    .collect())
            }
        }
    }

    fn witnesses_finite(
        &mut self,
        matrix: &[Vec<Pat>],
        ctors: &[Constructor],
        tail_tys: &[TypeId],
        limit: usize,
    ) -> Result<Vec<Vec<Pat>>, MatchError> {
        let present = present_tags(matrix);
        let complete = (0..ctors.len()).all(|i| present.contains(&tag(i)));

        if complete {
            let mut out = Vec::new();
            for (i, ctor) in ctors.iter().enumerate() {
                if out.len() >= limit {
                    break;
                }
                let spec = specialize_variant(matrix, tag(i), ctor.arity());
                let sub_tys = concat_tys(&ctor.fields, tail_tys);
                let subs = self.witnesses(&spec, &sub_tys, limit - out.len())?;
                for stack in subs {
                    out.push(rebuild(stack, ctor.arity(), |fields| Pat::Variant {
                        name: ctor.name,
                        index: tag(i),
                        fields,
                    }));
                }
            }
            return Ok(out);
        }

        // Incomplete column: every missing tag is a witness head over
        // whatever the default matrix leaves uncovered in the tail.
        let tails = self.witnesses(&default_matrix(matrix), tail_tys, limit)?;

        // No row constrains the column at all: a single wildcard head
        // already describes the gap.
        if present.is_empty() {
            let mut out = Vec::new();
            for tail in tails {
                if out.len() >= limit {
                    break;
                }
                let mut stack = Vec::with_capacity(tail.len() + 1);
                stack.push(Pat::Wildcard);
                stack.extend(tail);
                out.push(stack);
            }
            return Ok(out);
        }

        let mut out = Vec::new();
        'missing: for (i, ctor) in ctors.iter().enumerate() {
            if present.contains(&tag(i)) {
                continue;
            }
            for tail in &tails {
                if out.len() >= limit {
                    break 'missing;
                }
                let mut stack = Vec::with_capacity(tail.len() + 1);
                stack.push(Pat::Variant {
                    name: ctor.name,
                    index: tag(i),
                    fields: vec![Pat::Wildcard; ctor.arity()],
                });
                stack.extend(tail.iter().cloned());
                out.push(stack);
            }
        }
        Ok(out)
    }

    fn witnesses_integer(
        &mut self,
        matrix: &[Vec<Pat>],
        domain: (i128, i128),
        tail_tys: &[TypeId],
        limit: usize,
    ) -> Result<Vec<Vec<Pat>>, MatchError> {
        let heads = clipped_int_heads(matrix, domain);
        let mut out = Vec::new();
        for piece in split_pieces(domain, &heads) {
            if out.len() >= limit {
                break;
            }
            let spec = specialize_integer(matrix, piece);
            let subs = self.witnesses(&spec, tail_tys, limit - out.len())?;
            for mut stack in subs {
                stack.insert(0, piece_pattern(piece));
                out.push(stack);
            }
        }
        Ok(out)
    }
}

/// Strip binding wrappers down to the structural pattern.
fn peel(pat: &Pat) -> &Pat {
    match pat {
        Pat::Binding { sub, .. } => peel(sub),
        other => other,
    }
}

/// The alternatives a row head stands for, bindings stripped and
/// or-patterns flattened.
fn head_alternatives(pat: &Pat) -> Vec<&Pat> {
    match peel(pat) {
        Pat::Or(alts) => alts.iter().flat_map(head_alternatives).collect(),
        other => vec![other],
    }
}

/// Rewrite a matrix so every row head is a plain structural pattern,
/// duplicating rows whose head is an or-pattern.
fn expand_heads(matrix: &[Vec<Pat>]) -> Matrix {
    let mut out = Vec::with_capacity(matrix.len());
    for row in matrix {
        let Some((head, tail)) = row.split_first() else {
            out.push(Vec::new());
            continue;
        };
        for alt in head_alternatives(head) {
            let mut expanded = Vec::with_capacity(row.len());
            expanded.push(alt.clone());
            expanded.extend(tail.iter().cloned());
            out.push(expanded);
        }
    }
    out
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "A descriptor holds at most u32::MAX constructors"
)]
fn tag(index: usize) -> u32 {
    index as u32
}

fn present_tags(matrix: &[Vec<Pat>]) -> FxHashSet<u32> {
    matrix
        .iter()
        .filter_map(|row| match row.first() {
            Some(Pat::Variant { index, .. }) => Some(*index),
            _ => None,
        })
        .collect()
}

/// `S_k(P)`: keep rows matching tag `k`, replacing the head column with
/// the constructor's fields.
fn specialize_variant(matrix: &[Vec<Pat>], index: u32, arity: usize) -> Matrix {
    let mut out = Vec::new();
    for row in matrix {
        let Some((head, tail)) = row.split_first() else {
            continue;
        };
        let fields = match head {
            Pat::Variant {
                index: row_index,
                fields,
                ..
            } if *row_index == index => fields.clone(),
            Pat::Wildcard => vec![Pat::Wildcard; arity],
            _ => continue,
        };
        let mut new_row = fields;
        new_row.extend(tail.iter().cloned());
        out.push(new_row);
    }
    out
}

/// Specialization for the single implicit constructor of tuples and
/// records.
fn specialize_product(matrix: &[Vec<Pat>], arity: usize) -> Matrix {
    let mut out = Vec::new();
    for row in matrix {
        let Some((head, tail)) = row.split_first() else {
            continue;
        };
        let fields = match head {
            Pat::Tuple(elems) => elems.clone(),
            Pat::Record { fields } => fields.iter().map(|(_, p)| p.clone()).collect(),
            Pat::Wildcard => vec![Pat::Wildcard; arity],
            _ => continue,
        };
        let mut new_row = fields;
        new_row.extend(tail.iter().cloned());
        out.push(new_row);
    }
    out
}

/// Keep rows whose head covers the whole `piece`, dropping the column.
/// Pieces are split at every boundary in the matrix, so a head either
/// covers a piece entirely or misses it entirely.
fn specialize_integer(matrix: &[Vec<Pat>], piece: (i128, i128)) -> Matrix {
    let mut out = Vec::new();
    for row in matrix {
        let Some((head, tail)) = row.split_first() else {
            continue;
        };
        let keep = match int_range(head) {
            Some((lo, hi)) => lo <= piece.0 && piece.1 <= hi,
            None => matches!(head, Pat::Wildcard),
        };
        if keep {
            out.push(tail.to_vec());
        }
    }
    out
}

/// Keep rows whose head equals `lit` structurally (or is a wildcard),
/// dropping the column. Used for opaque literal columns.
fn specialize_equal(matrix: &[Vec<Pat>], lit: &Pat) -> Matrix {
    let mut out = Vec::new();
    for row in matrix {
        let Some((head, tail)) = row.split_first() else {
            continue;
        };
        if head == lit || matches!(head, Pat::Wildcard) {
            out.push(tail.to_vec());
        }
    }
    out
}

/// `D(P)`: rows with a wildcard head, column dropped.
fn default_matrix(matrix: &[Vec<Pat>]) -> Matrix {
    matrix
        .iter()
        .filter_map(|row| match row.split_first() {
            Some((Pat::Wildcard, tail)) => Some(tail.to_vec()),
            _ => None,
        })
        .collect()
}

fn concat_tys(head: &[TypeId], tail: &[TypeId]) -> Vec<TypeId> {
    let mut out = Vec::with_capacity(head.len() + tail.len());
    out.extend_from_slice(head);
    out.extend_from_slice(tail);
    out
}

/// Fold the first `arity` entries of a witness stack into one pattern.
fn rebuild(mut stack: Vec<Pat>, arity: usize, build: impl FnOnce(Vec<Pat>) -> Pat) -> Vec<Pat> {
    let rest = stack.split_off(arity.min(stack.len()));
    let mut out = Vec::with_capacity(rest.len() + 1);
    out.push(build(stack));
    out.extend(rest);
    out
}

/// The inclusive integer interval a head pattern covers, if integral.
fn int_range(pat: &Pat) -> Option<(i128, i128)> {
    match pat {
        Pat::Lit(Lit::Int(n)) => Some((i128::from(*n), i128::from(*n))),
        Pat::Range { lo, hi, inclusive } => {
            let hi = if *inclusive {
                i128::from(*hi)
            } else {
                i128::from(*hi) - 1
            };
            Some((i128::from(*lo), hi))
        }
        _ => None,
    }
}

fn intersect(a: (i128, i128), b: (i128, i128)) -> Option<(i128, i128)> {
    let lo = a.0.max(b.0);
    let hi = a.1.min(b.1);
    (lo <= hi).then_some((lo, hi))
}

/// Integer intervals in the head column, clipped to `domain`.
fn clipped_int_heads(matrix: &[Vec<Pat>], domain: (i128, i128)) -> Vec<(i128, i128)> {
    matrix
        .iter()
        .filter_map(|row| int_range(row.first()?))
        .filter_map(|range| intersect(range, domain))
        .collect()
}

/// Partition `domain` at every interval boundary in `heads`. Each piece is
/// either fully inside or fully outside every head interval.
fn split_pieces(domain: (i128, i128), heads: &[(i128, i128)]) -> Vec<(i128, i128)> {
    let (dlo, dhi) = domain;
    let mut starts = vec![dlo];
    for &(lo, hi) in heads {
        if lo > dlo && lo <= dhi {
            starts.push(lo);
        }
        if hi + 1 > dlo && hi + 1 <= dhi {
            starts.push(hi + 1);
        }
    }
    starts.sort_unstable();
    starts.dedup();

    let mut pieces = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).map_or(dhi, |&next| next - 1);
        pieces.push((start, end));
    }
    pieces
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "Piece bounds come from clipping to an i64 domain"
)]
fn piece_pattern((lo, hi): (i128, i128)) -> Pat {
    if lo == hi {
        Pat::Lit(Lit::Int(lo as i64))
    } else {
        Pat::Range {
            lo: lo as i64,
            hi: hi as i64,
            inclusive: true,
        }
    }
}

#[cfg(test)]
mod tests;
