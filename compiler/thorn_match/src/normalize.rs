//! Pattern normalization — surface patterns to canonical form.
//!
//! Lowers an arena-allocated [`RawPattern`] tree into a self-contained
//! [`Pat`], using the type descriptor of the position each node occupies:
//!
//! - `..` rest markers expand to explicit wildcards for the remaining
//!   fields (at most one per sibling list).
//! - Record fields are reordered into the descriptor's declaration order
//!   and completed; shorthand fields become bindings.
//! - Explicit sub-pattern counts are checked against declared arities.
//! - Or-pattern alternatives must bind the same names at the same types.
//! - Range bounds are validated (`lo <= hi`, non-empty).
//!
//! Normalizing an already-canonical pattern is the identity. Any failure
//! aborts analysis of the match site; no partial output is produced.

use thorn_ir::{
    Name, Pat, PatId, PatternArena, RawPattern, Span, TypeDescriptor, TypeId, TypeResolver,
};

use crate::MatchError;

/// Immutable context for normalization: the arena the surface patterns live
/// in and the descriptor lookup, threaded through every recursive call.
pub struct NormalizeCtx<'a> {
    arena: &'a PatternArena,
    resolver: &'a dyn TypeResolver,
}

impl<'a> NormalizeCtx<'a> {
    pub fn new(arena: &'a PatternArena, resolver: &'a dyn TypeResolver) -> Self {
        Self { arena, resolver }
    }

    /// Normalize the pattern at `id`, which occupies a position of type `ty`.
    pub fn normalize(&self, id: PatId, ty: TypeId) -> Result<Pat, MatchError> {
        let span = self.arena.span(id);
        match self.arena.kind(id) {
            RawPattern::Wildcard => Ok(Pat::Wildcard),

            RawPattern::Rest => Err(MatchError::MisplacedRest { span }),

            RawPattern::Binding { name, sub } => {
                let sub = match sub {
                    Some(sub_id) => self.normalize(*sub_id, ty)?,
                    None => Pat::Wildcard,
                };
                Ok(Pat::Binding {
                    name: *name,
                    sub: Box::new(sub),
                })
            }

            RawPattern::Literal(lit) => Ok(Pat::Lit(*lit)),

            RawPattern::Range { lo, hi, inclusive } => {
                let empty = if *inclusive { lo > hi } else { lo >= hi };
                if empty {
                    return Err(MatchError::InvalidRangePattern {
                        lo: *lo,
                        hi: *hi,
                        span,
                    });
                }
                Ok(Pat::Range {
                    lo: *lo,
                    hi: *hi,
                    inclusive: *inclusive,
                })
            }

            RawPattern::Ctor { name, args } => {
                let descriptor = self.resolver.descriptor(ty);
                let Some((index, ctor)) = descriptor.constructor_by_name(*name) else {
                    return Err(MatchError::UnknownConstructor { name: *name, span });
                };
                let fields = self.expand_positional(args, &ctor.fields, span)?;
                Ok(Pat::Variant {
                    name: *name,
                    index,
                    fields,
                })
            }

            RawPattern::Tuple(args) => {
                let TypeDescriptor::Tuple(elem_tys) = self.resolver.descriptor(ty) else {
                    return Err(MatchError::ArityMismatch {
                        expected: 0,
                        found: args.len(),
                        span,
                    });
                };
                let elements = self.expand_positional(args, elem_tys, span)?;
                Ok(Pat::Tuple(elements))
            }

            RawPattern::Record { fields, rest } => self.normalize_record(fields, *rest, ty, span),

            RawPattern::Or(alts) => self.normalize_or(alts, ty, span),
        }
    }

    /// Expand a positional sibling list against declared field types,
    /// splicing wildcards in place of a single `..` marker.
    fn expand_positional(
        &self,
        args: &[PatId],
        field_tys: &[TypeId],
        span: Span,
    ) -> Result<Vec<Pat>, MatchError> {
        let rest_count = args
            .iter()
            .filter(|&&id| matches!(self.arena.kind(id), RawPattern::Rest))
            .count();
        if rest_count > 1 {
            return Err(MatchError::AmbiguousRest { span });
        }

        if rest_count == 0 {
            if args.len() != field_tys.len() {
                return Err(MatchError::ArityMismatch {
                    expected: field_tys.len(),
                    found: args.len(),
                    span,
                });
            }
            return args
                .iter()
                .zip(field_tys.iter())
                .map(|(&id, &fty)| self.normalize(id, fty))
                .collect();
        }

        // One `..`: the explicit sub-patterns around it anchor to the
        // leading and trailing fields; the gap becomes wildcards.
        let explicit = args.len() - 1;
        if explicit > field_tys.len() {
            return Err(MatchError::ArityMismatch {
                expected: field_tys.len(),
                found: explicit,
                span,
            });
        }
        let rest_pos = args
            .iter()
            .position(|&id| matches!(self.arena.kind(id), RawPattern::Rest))
            .unwrap_or(args.len());
        let before = &args[..rest_pos];
        let after = &args[rest_pos + 1..];

        let mut out = Vec::with_capacity(field_tys.len());
        for (i, &id) in before.iter().enumerate() {
            out.push(self.normalize(id, field_tys[i])?);
        }
        out.resize(field_tys.len() - after.len(), Pat::Wildcard);
        let tail_start = field_tys.len() - after.len();
        for (j, &id) in after.iter().enumerate() {
            out.push(self.normalize(id, field_tys[tail_start + j])?);
        }
        Ok(out)
    }

    /// Reorder record fields into declaration order, completing missing
    /// fields when `..` is present.
    fn normalize_record(
        &self,
        fields: &[(Name, Option<PatId>)],
        rest: bool,
        ty: TypeId,
        span: Span,
    ) -> Result<Pat, MatchError> {
        let TypeDescriptor::Record(declared) = self.resolver.descriptor(ty) else {
            return Err(MatchError::ArityMismatch {
                expected: 0,
                found: fields.len(),
                span,
            });
        };

        for (i, (name, _)) in fields.iter().enumerate() {
            if fields[..i].iter().any(|(n, _)| n == name) {
                return Err(MatchError::DuplicateField { name: *name, span });
            }
            if !declared.iter().any(|(n, _)| n == name) {
                return Err(MatchError::UnknownField { name: *name, span });
            }
        }

        let mut out = Vec::with_capacity(declared.len());
        for &(decl_name, decl_ty) in declared {
            let sub = match fields.iter().find(|(n, _)| *n == decl_name) {
                Some((_, Some(sub_id))) => self.normalize(*sub_id, decl_ty)?,
                // Shorthand `{ x }` binds the field under its own name.
                Some((_, None)) => Pat::binding(decl_name),
                None if rest => Pat::Wildcard,
                None => {
                    return Err(MatchError::ArityMismatch {
                        expected: declared.len(),
                        found: fields.len(),
                        span,
                    });
                }
            };
            out.push((decl_name, sub));
        }
        Ok(Pat::Record { fields: out })
    }

    /// Normalize or-pattern alternatives and check that every alternative
    /// binds exactly the same names at the same types.
    fn normalize_or(&self, alts: &[PatId], ty: TypeId, span: Span) -> Result<Pat, MatchError> {
        let normalized: Vec<Pat> = alts
            .iter()
            .map(|&id| self.normalize(id, ty))
            .collect::<Result<_, _>>()?;

        if let Some((first, rest)) = normalized.split_first() {
            let reference = self.binding_set(first, ty);
            for alt in rest {
                let set = self.binding_set(alt, ty);
                if let Some(name) = first_binding_difference(&reference, &set) {
                    return Err(MatchError::OrPatternBindingMismatch { name, span });
                }
            }
        }

        // A single-alternative or-pattern is just that alternative.
        if normalized.len() == 1 {
            let mut normalized = normalized;
            return Ok(normalized.swap_remove(0));
        }
        Ok(Pat::Or(normalized))
    }

    /// The `(name, type)` pairs a canonical pattern binds, sorted by name.
    fn binding_set(&self, pat: &Pat, ty: TypeId) -> Vec<(Name, TypeId)> {
        let mut out = Vec::new();
        self.collect_binding_types(pat, ty, &mut out);
        out.sort_unstable();
        out
    }

    fn collect_binding_types(&self, pat: &Pat, ty: TypeId, out: &mut Vec<(Name, TypeId)>) {
        match pat {
            Pat::Wildcard | Pat::Lit(_) | Pat::Range { .. } => {}
            Pat::Binding { name, sub } => {
                out.push((*name, ty));
                self.collect_binding_types(sub, ty, out);
            }
            Pat::Variant { index, fields, .. } => {
                if let Some(ctor) = self.resolver.descriptor(ty).constructor(*index) {
                    for (field, &fty) in fields.iter().zip(ctor.fields.iter()) {
                        self.collect_binding_types(field, fty, out);
                    }
                }
            }
            Pat::Tuple(elements) => {
                if let TypeDescriptor::Tuple(elem_tys) = self.resolver.descriptor(ty) {
                    for (elem, &ety) in elements.iter().zip(elem_tys.iter()) {
                        self.collect_binding_types(elem, ety, out);
                    }
                }
            }
            Pat::Record { fields } => {
                if let TypeDescriptor::Record(declared) = self.resolver.descriptor(ty) {
                    for ((_, sub), &(_, fty)) in fields.iter().zip(declared.iter()) {
                        self.collect_binding_types(sub, fty, out);
                    }
                }
            }
            Pat::Or(alts) => {
                // Alternatives bind identically; the first stands for all.
                if let Some(first) = alts.first() {
                    self.collect_binding_types(first, ty, out);
                }
            }
        }
    }
}

/// First name bound differently between two sorted binding sets, if any.
fn first_binding_difference(
    a: &[(Name, TypeId)],
    b: &[(Name, TypeId)],
) -> Option<Name> {
    let mut ia = a.iter();
    let mut ib = b.iter();
    loop {
        match (ia.next(), ib.next()) {
            (None, None) => return None,
            (Some(&(n, _)), None) | (None, Some(&(n, _))) => return Some(n),
            (Some(&(na, ta)), Some(&(nb, tb))) => {
                if na != nb {
                    return Some(na.min(nb));
                }
                if ta != tb {
                    return Some(na);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
