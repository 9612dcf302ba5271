//! Canonical patterns — the representation the matrix algorithms run on.
//!
//! A [`Pat`] is self-contained (owned sub-patterns, no arena indirection)
//! and sugar-free: rest markers are expanded, record fields are in
//! declaration order, every constructor application has exactly the arity
//! its descriptor declares. Produced by `thorn_match::normalize`, consumed
//! by the usefulness engine and the decision tree builder. Witnesses of
//! non-exhaustiveness are also `Pat`s (with no bindings).

use crate::tree::{PathInstruction, ScrutineePath};
use crate::{Name, StringInterner};

/// A scalar literal value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Lit {
    /// Integer (also chars, via their code point).
    Int(i64),
    /// Interned string.
    Str(Name),
    /// Float, by exact bit pattern.
    Float(u64),
}

/// A canonical pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Pat {
    /// Matches anything without binding.
    Wildcard,
    /// Matches via `sub`, additionally binding the whole value to `name`.
    /// A bare binding has a `Wildcard` sub-pattern.
    Binding { name: Name, sub: Box<Pat> },
    /// Matches one exact scalar.
    Lit(Lit),
    /// Matches integers in the interval. `lo <= hi` is guaranteed by
    /// normalization (`lo < hi` for exclusive ranges).
    Range { lo: i64, hi: i64, inclusive: bool },
    /// A constructor of a finite type, with one sub-pattern per field.
    Variant {
        name: Name,
        index: u32,
        fields: Vec<Pat>,
    },
    /// Positional product destructuring; arity equals the tuple's.
    Tuple(Vec<Pat>),
    /// Named product destructuring; fields are complete and in the
    /// descriptor's declaration order.
    Record { fields: Vec<(Name, Pat)> },
    /// Matches if any alternative matches. All alternatives bind the same
    /// name set (checked by normalization).
    Or(Vec<Pat>),
}

impl Pat {
    /// Shorthand for a bare binding.
    pub fn binding(name: Name) -> Pat {
        Pat::Binding {
            name,
            sub: Box::new(Pat::Wildcard),
        }
    }

    /// Returns `true` if this pattern matches any value of its type without
    /// inspecting it: a wildcard, a binding whose sub-pattern is
    /// wildcard-like, or an or-pattern with a wildcard-like alternative.
    pub fn is_wildcard_like(&self) -> bool {
        match self {
            Pat::Wildcard => true,
            Pat::Binding { sub, .. } => sub.is_wildcard_like(),
            Pat::Or(alts) => alts.iter().any(Pat::is_wildcard_like),
            _ => false,
        }
    }

    /// Collect variable bindings from this pattern at a given scrutinee
    /// path, appending `(name, path)` pairs to `out`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "field indices bounded by declared arity, far below u32::MAX"
    )]
    pub fn collect_bindings(&self, path: &ScrutineePath, out: &mut Vec<(Name, ScrutineePath)>) {
        match self {
            Pat::Wildcard | Pat::Lit(_) | Pat::Range { .. } => {}
            Pat::Binding { name, sub } => {
                out.push((*name, path.clone()));
                sub.collect_bindings(path, out);
            }
            Pat::Variant { fields, .. } => {
                for (i, field) in fields.iter().enumerate() {
                    let mut child = path.clone();
                    child.push(PathInstruction::TagPayload(i as u32));
                    field.collect_bindings(&child, out);
                }
            }
            Pat::Tuple(elements) => {
                for (i, elem) in elements.iter().enumerate() {
                    let mut child = path.clone();
                    child.push(PathInstruction::TupleIndex(i as u32));
                    elem.collect_bindings(&child, out);
                }
            }
            Pat::Record { fields } => {
                for (i, (_, sub)) in fields.iter().enumerate() {
                    let mut child = path.clone();
                    child.push(PathInstruction::RecordField(i as u32));
                    sub.collect_bindings(&child, out);
                }
            }
            Pat::Or(alts) => {
                // All alternatives bind the same names; the first one's
                // paths stand for the whole pattern.
                if let Some(first) = alts.first() {
                    first.collect_bindings(path, out);
                }
            }
        }
    }

    /// Render the pattern for diagnostics, e.g. `Some(None)`, `(1, _)`,
    /// `{ x: _, y: 3 }`, `1..=5`.
    pub fn display(&self, interner: &StringInterner) -> String {
        match self {
            Pat::Wildcard => "_".to_string(),
            Pat::Binding { name, sub } => {
                if sub.is_wildcard_like() {
                    interner.lookup(*name).to_string()
                } else {
                    format!("{} @ {}", interner.lookup(*name), sub.display(interner))
                }
            }
            Pat::Lit(Lit::Int(v)) => v.to_string(),
            Pat::Lit(Lit::Str(s)) => format!("\"{}\"", interner.lookup(*s)),
            Pat::Lit(Lit::Float(bits)) => f64::from_bits(*bits).to_string(),
            Pat::Range { lo, hi, inclusive } => {
                if *inclusive {
                    format!("{lo}..={hi}")
                } else {
                    format!("{lo}..{hi}")
                }
            }
            Pat::Variant { name, fields, .. } => {
                let name = interner.lookup(*name);
                if fields.is_empty() {
                    name.to_string()
                } else {
                    let parts: Vec<String> =
                        fields.iter().map(|f| f.display(interner)).collect();
                    format!("{name}({})", parts.join(", "))
                }
            }
            Pat::Tuple(elements) => {
                let parts: Vec<String> =
                    elements.iter().map(|e| e.display(interner)).collect();
                format!("({})", parts.join(", "))
            }
            Pat::Record { fields } => {
                let parts: Vec<String> = fields
                    .iter()
                    .map(|(n, p)| format!("{}: {}", interner.lookup(*n), p.display(interner)))
                    .collect();
                format!("{{ {} }}", parts.join(", "))
            }
            Pat::Or(alts) => {
                let parts: Vec<String> = alts.iter().map(|a| a.display(interner)).collect();
                parts.join(" | ")
            }
        }
    }
}
